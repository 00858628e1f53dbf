/*!
 * Tests for structural validation of translated entries
 */

use anyhow::Result;
use lexitra::split::EntrySplitter;
use lexitra::validation::EntryValidator;
use crate::common;

fn assembled_fixture() -> String {
    format!(
        "{}\n{}\n{}",
        common::ENTRY_23_FR_HEADER,
        common::ENTRY_23_FR_STEM_QAL,
        common::ENTRY_23_FR_STEM_HIPHIL
    )
}

/// Tests that the assembled fixture translation passes every check against
/// the whole original document
#[test]
fn test_validate_withAssembledFixture_shouldPass() -> Result<()> {
    let validator = EntryValidator::new();
    let issues = validator.validate(
        common::ENTRY_23_HTML,
        &assembled_fixture(),
        Some(common::ENTRY_23_TXT),
    );
    assert!(issues.is_empty(), "Clean assembly should validate: {:?}", issues);
    Ok(())
}

/// Tests that each fragment pair of the fixture validates on its own, the
/// property chunked assembly relies on
#[test]
fn test_validate_withFixtureFragmentPairs_shouldPassEach() -> Result<()> {
    let splitter = EntrySplitter::new();
    let markup = splitter.split_markup(common::ENTRY_23_HTML);
    let plain = splitter.split_plain(common::ENTRY_23_TXT);
    let translated = [
        common::ENTRY_23_FR_HEADER,
        common::ENTRY_23_FR_STEM_QAL,
        common::ENTRY_23_FR_STEM_HIPHIL,
    ];

    let validator = EntryValidator::new();
    for i in 0..3 {
        let issues =
            validator.validate(&markup[i].content, translated[i], Some(&plain[i].content));
        assert!(issues.is_empty(), "Fragment {} should validate: {:?}", i + 1, issues);
    }
    Ok(())
}

/// Tests that a stem which drops its script run and reference fails with
/// both findings named
#[test]
fn test_validate_withDegradedStem_shouldReportScriptAndRef() -> Result<()> {
    let splitter = EntrySplitter::new();
    let markup = splitter.split_markup(common::ENTRY_23_HTML);
    let plain = splitter.split_plain(common::ENTRY_23_TXT);
    let degraded = "<div class=\"stem\"><p>Qal. <descrip>mauvais</descrip></p></div>";

    let validator = EntryValidator::new();
    let issues = validator.validate(&markup[1].content, degraded, Some(&plain[1].content));

    assert!(
        issues.iter().any(|i| i.contains("missing Hebrew/Aramaic")),
        "Dropped script run should be reported: {:?}",
        issues
    );
    assert!(
        issues.iter().any(|i| i.contains("missing ref attribute: Isa 19:8")),
        "Dropped reference should be reported: {:?}",
        issues
    );
    assert!(
        issues.iter().any(|i| i.contains("translated text missing from HTML")),
        "Dropped plain line should be reported: {:?}",
        issues
    );
    Ok(())
}

/// Tests that surviving source-language function words are flagged
#[test]
fn test_validate_withRemnantPhrase_shouldFlagIt() -> Result<()> {
    let splitter = EntrySplitter::new();
    let markup = splitter.split_markup(common::ENTRY_23_HTML);
    // Same shape as the clean Qal stem, but "se lamenter" came out half
    // translated
    let half_translated = concat!(
        "<div class=\"stem\"><p>Qal. <descrip>mourn over the loss</descrip> ",
        "<ref ref=\"Isa 19:8\">Isa 19:8</ref> ",
        "<bdbheb>\u{05D0}\u{05D1}\u{05DC}\u{05D5}</bdbheb></p></div>",
    );

    let validator = EntryValidator::new();
    let issues = validator.validate(&markup[1].content, half_translated, None);
    assert!(
        issues.iter().any(|i| i.contains("possible untranslated remnant")),
        "English function words should be flagged: {:?}",
        issues
    );
    Ok(())
}

/// Tests that a reordered document structure fails the sequence check even
/// when every piece of content survives
#[test]
fn test_validate_withReorderedStems_shouldReportSequence() -> Result<()> {
    let reordered = format!(
        "{}\n{}\n{}",
        common::ENTRY_23_FR_HEADER,
        common::ENTRY_23_FR_STEM_HIPHIL,
        common::ENTRY_23_FR_STEM_QAL
    );
    let validator = EntryValidator::new();
    let issues = validator.validate(common::ENTRY_23_HTML, &reordered, None);
    assert!(
        issues.iter().any(|i| i.contains("tag sequence")),
        "Reordered stems should fail the sequence check: {:?}",
        issues
    );
    Ok(())
}

/// Tests that findings are attributed to the entry id
#[test]
fn test_validateEntry_withDegradedFixture_shouldPrefixId() -> Result<()> {
    let validator = EntryValidator::new();
    let degraded = common::ENTRY_23_FR_HEADER.replace(
        "<bdbheb>\u{05D0}\u{05D1}\u{05DC}</bdbheb>",
        "",
    );
    let issues = validator.validate_entry(
        "23",
        common::ENTRY_23_HTML,
        &degraded,
        None,
    );
    assert!(!issues.is_empty(), "Degraded header should fail");
    for issue in &issues {
        assert_eq!(issue.entry_id, "23");
        assert!(issue.to_string().starts_with("23: "), "Display should prefix the id");
    }
    Ok(())
}
