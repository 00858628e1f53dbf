/*!
 * Tests for plain-text extraction from entry markup
 */

use anyhow::Result;
use lexitra::extraction::TextExtractor;
use lexitra::split::EntrySplitter;
use crate::common;

/// Tests that the fixture entry extracts with header, markers and text
#[test]
fn test_extract_withFixtureEntry_shouldRenderHeaderMarkersAndText() -> Result<()> {
    let extractor = TextExtractor::new();
    let text = extractor.extract(common::ENTRY_23_HTML);

    assert!(text.starts_with("=== 23 ===\n"), "Header line should carry the entry id");
    assert_eq!(text.matches("@@SPLIT:stem@@").count(), 2, "One marker per stem boundary");

    // The headword loses its reconstruction brackets but keeps the script
    assert!(text.lines().any(|l| l == "\u{05D0}\u{05D1}\u{05DC}"));
    assert!(!text.contains('['), "No brackets should survive extraction of this entry");

    assert!(text.contains("vb. mourn BDB"));
    assert!(text.contains("Qal. lament Isa 19:8"));
    // Entity references come out decoded
    assert!(text.contains("& more"));
    assert!(!text.contains("&amp;"));
    Ok(())
}

/// Tests that extraction puts exactly one marker per markup boundary, so a
/// corrected copy of its output stays aligned with the original
#[test]
fn test_extract_withFixtureEntry_shouldStayAlignedWithMarkupSplit() -> Result<()> {
    let extractor = TextExtractor::new();
    let splitter = EntrySplitter::new();

    let text = extractor.extract(common::ENTRY_23_HTML);
    let markup_count = splitter.split_markup(common::ENTRY_23_HTML).len();
    let plain_count = splitter.split_plain(&text).len();

    assert_eq!(plain_count, markup_count, "Extraction output should split back into the same count");
    Ok(())
}

/// Tests that single-fragment extraction carries no header and no markers
#[test]
fn test_extractFragment_withStemFragment_shouldOmitHeaderAndMarkers() -> Result<()> {
    let splitter = EntrySplitter::new();
    let fragments = splitter.split_markup(common::ENTRY_23_HTML);
    let extractor = TextExtractor::new();

    let text = extractor.extract_fragment(&fragments[1].content);
    assert_eq!(text, "Qal. lament Isa 19:8 \u{05D0}\u{05D1}\u{05DC}\u{05D5}");
    Ok(())
}

/// Tests that the tidied output never stacks blank lines
#[test]
fn test_extract_withFixtureEntry_shouldCapBlankRuns() -> Result<()> {
    let extractor = TextExtractor::new();
    let text = extractor.extract(common::ENTRY_23_HTML);

    assert!(!text.contains("\n\n\n"), "Blank runs should collapse to a single empty line");
    assert!(text.ends_with('\n'), "Document should end with exactly one newline");
    assert!(!text.ends_with("\n\n"));
    Ok(())
}
