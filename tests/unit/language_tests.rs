/*!
 * Tests for language code resolution
 */

use anyhow::Result;
use lexitra::language::language_name;

/// Tests that two-letter codes resolve beyond the configured defaults
#[test]
fn test_languageName_withOtherPart1Codes_shouldResolve() -> Result<()> {
    assert_eq!(language_name("de")?, "German");
    assert_eq!(language_name("es")?, "Spanish");
    Ok(())
}

/// Tests that three-letter codes of untranslated scripts resolve
#[test]
fn test_languageName_withScriptCodes_shouldResolve() -> Result<()> {
    assert_eq!(language_name("ara")?, "Arabic");
    assert!(language_name("arc")?.contains("Aramaic"), "arc should resolve to an Aramaic variant");
    Ok(())
}

/// Tests that the error message names the rejected code
#[test]
fn test_languageName_withUnknownCode_shouldNameItInError() -> Result<()> {
    let err = language_name("qqq").unwrap_err();
    assert!(err.to_string().contains("qqq"), "Error should mention the bad code");
    Ok(())
}

/// Tests that codes of the wrong length are rejected
#[test]
fn test_languageName_withWrongLength_shouldError() -> Result<()> {
    assert!(language_name("").is_err(), "Empty code should be rejected");
    assert!(language_name("e").is_err(), "One-letter code should be rejected");
    assert!(language_name("engl").is_err(), "Four-letter code should be rejected");
    Ok(())
}
