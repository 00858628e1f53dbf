/*!
 * Tests for script-stream alignment between original and translated text
 */

use anyhow::Result;
use lexitra::alignment::AlignmentChecker;
use lexitra::extraction::TextExtractor;
use lexitra::profile::ScriptProfile;
use crate::common;

/// Tests that the fixture translation aligns with the text extracted from
/// its original
#[test]
fn test_check_withExtractedFixture_shouldAlign() -> Result<()> {
    let extractor = TextExtractor::new();
    let source_text = extractor.extract(common::ENTRY_23_HTML);

    let checker = AlignmentChecker::new(&ScriptProfile::default());
    let issues = checker.check(&source_text, common::ENTRY_23_TXT);
    assert!(issues.is_empty(), "Fixture should align: {:?}", issues);
    Ok(())
}

/// Tests that a dropped trailing script run surfaces as extra tokens on the
/// original side
#[test]
fn test_check_withDroppedTrailingRun_shouldReportExtraOriginal() -> Result<()> {
    let extractor = TextExtractor::new();
    let source_text = extractor.extract(common::ENTRY_23_HTML);
    let truncated = common::ENTRY_23_TXT
        .replace(" \u{05D0}\u{05D1}\u{05DC}\u{05D0} et plus", " et plus");

    let checker = AlignmentChecker::new(&ScriptProfile::default());
    let issues = checker.check(&source_text, &truncated);
    assert!(
        issues.iter().any(|i| i.to_string().contains("original has 1 extra token(s)")),
        "Missing run should leave the original with an extra token: {:?}",
        issues
    );
    Ok(())
}

/// Tests that a heavily truncated translation trips the size band
#[test]
fn test_check_withTruncatedTranslation_shouldFlagSizeAnomaly() -> Result<()> {
    let extractor = TextExtractor::new();
    let source_text = extractor.extract(common::ENTRY_23_HTML);
    let truncated = "=== 23 ===\n[\u{05D0}\u{05D1}\u{05DC}]\n";

    let checker = AlignmentChecker::new(&ScriptProfile::default());
    let issues = checker.check(&source_text, truncated);
    assert!(
        issues.iter().any(|i| i.to_string().contains("size anomaly")),
        "Truncated translation should trip the ratio band: {:?}",
        issues
    );
    Ok(())
}
