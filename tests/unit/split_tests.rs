/*!
 * Tests for entry splitting on the markup and plain-text sides
 */

use anyhow::Result;
use lexitra::split::{EntrySplitter, FragmentKind};
use crate::common;

/// Tests that the fixture entry splits into header and stem fragments
#[test]
fn test_splitMarkup_withFixtureEntry_shouldYieldHeaderAndStems() -> Result<()> {
    let splitter = EntrySplitter::new();
    let fragments = splitter.split_markup(common::ENTRY_23_HTML);

    assert_eq!(fragments.len(), 3, "Fixture should split into three fragments");
    assert_eq!(fragments[0].kind, FragmentKind::Header);
    assert_eq!(fragments[1].kind, FragmentKind::Stem);
    assert_eq!(fragments[2].kind, FragmentKind::Stem);

    // The document close travels with the last fragment
    assert!(fragments[2].content.ends_with("</body></html>\n"));
    Ok(())
}

/// Tests that markup splitting is lossless
#[test]
fn test_splitMarkup_withFixtureEntry_shouldConcatenateBackToInput() -> Result<()> {
    let splitter = EntrySplitter::new();
    let fragments = splitter.split_markup(common::ENTRY_23_HTML);

    let rebuilt: String = fragments.iter().map(|f| f.content.as_str()).collect();
    assert_eq!(rebuilt, common::ENTRY_23_HTML, "Fragments should concatenate back to the input");
    Ok(())
}

/// Tests that the plain text side splits at its markers
#[test]
fn test_splitPlain_withFixtureText_shouldCutAtMarkers() -> Result<()> {
    let splitter = EntrySplitter::new();
    let fragments = splitter.split_plain(common::ENTRY_23_TXT);

    assert_eq!(fragments.len(), 3, "Fixture text should split into three fragments");
    assert_eq!(fragments[0].kind, FragmentKind::Header);
    assert_eq!(fragments[1].kind, FragmentKind::Stem);
    assert_eq!(fragments[2].kind, FragmentKind::Stem);

    // Marker lines open their fragment
    assert!(fragments[1].content.starts_with("@@SPLIT:stem@@\n"));
    assert!(fragments[2].content.starts_with("@@SPLIT:stem@@\n"));

    let rebuilt: String = fragments.iter().map(|f| f.content.as_str()).collect();
    assert_eq!(rebuilt, common::ENTRY_23_TXT, "Fragments should concatenate back to the input");
    Ok(())
}

/// Tests that both sides of the fixture agree on the fragment count, the
/// precondition for chunked processing
#[test]
fn test_split_withFixtureEntry_shouldAgreeOnFragmentCount() -> Result<()> {
    let splitter = EntrySplitter::new();
    let markup = splitter.split_markup(common::ENTRY_23_HTML);
    let plain = splitter.split_plain(common::ENTRY_23_TXT);

    assert_eq!(markup.len(), plain.len(), "Markup and text sides should agree");
    assert!(markup.len() >= 2, "Fixture should qualify for chunked processing");
    for (m, p) in markup.iter().zip(plain.iter()) {
        assert_eq!(m.kind, p.kind, "Fragment kinds should line up pairwise");
    }
    Ok(())
}

/// Tests losslessness on a section-structured document with noise between
/// the blocks
#[test]
fn test_splitMarkup_withSectionsAndGaps_shouldStayLossless() -> Result<()> {
    let html = concat!(
        "<html><body>\n",
        "<div class=\"section\"><p>I. first</p></div>\n",
        "<!-- gap -->\n",
        "<div class=\"section\"><p>II. second</p></div>\n",
        "</body></html>\n",
    );
    let splitter = EntrySplitter::new();
    let fragments = splitter.split_markup(html);

    assert!(fragments.len() >= 3, "Header and two sections expected");
    assert_eq!(fragments[1].kind, FragmentKind::Section);
    let rebuilt: String = fragments.iter().map(|f| f.content.as_str()).collect();
    assert_eq!(rebuilt, html);
    Ok(())
}

/// Tests that every fragment kind survives its marker spelling
#[test]
fn test_fragmentKind_markerSpelling_shouldRoundTrip() -> Result<()> {
    for kind in [
        FragmentKind::Header,
        FragmentKind::Stem,
        FragmentKind::Sense,
        FragmentKind::Section,
        FragmentKind::Footer,
        FragmentKind::Whole,
    ] {
        assert_eq!(FragmentKind::from_marker(kind.as_str()), Some(kind));
    }
    Ok(())
}
