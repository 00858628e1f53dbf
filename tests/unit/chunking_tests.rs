/*!
 * Tests for chunk wrapping, unwrapping and response cleanup
 */

use anyhow::Result;
use lexitra::pipeline::chunking::{
    parse_errata, strip_code_fence, unwrap_chunk, wrap_chunk, WRAPPER_HEAD, WRAPPER_TAIL,
};
use lexitra::split::EntrySplitter;
use crate::common;

/// Tests that each fixture fragment wraps into a self-contained document
#[test]
fn test_wrapChunk_withFixtureFragments_shouldBalanceEach() -> Result<()> {
    let splitter = EntrySplitter::new();
    let fragments = splitter.split_markup(common::ENTRY_23_HTML);

    // The header opens html and body without closing them
    let (wrapped, wrap) = wrap_chunk(&fragments[0].content);
    assert!(!wrap.is_balanced());
    assert!(wrapped.ends_with("</body>\n</html>"), "Missing closes belong after the tail");

    // A stem block is already balanced
    let (wrapped, wrap) = wrap_chunk(&fragments[1].content);
    assert!(wrap.is_balanced());
    assert!(wrapped.starts_with(WRAPPER_HEAD));
    assert!(wrapped.ends_with(WRAPPER_TAIL));

    // The trailing fragment closes body and html it never opened
    let (wrapped, wrap) = wrap_chunk(&fragments[2].content);
    assert!(!wrap.is_balanced());
    assert!(wrapped.starts_with("<html>\n<body>\n"), "Missing opens belong before the head");
    Ok(())
}

/// Tests that a response echoing the wrap recovers the fragment body
#[test]
fn test_unwrapChunk_withEchoedWrap_shouldRecoverFragment() -> Result<()> {
    let splitter = EntrySplitter::new();
    for fragment in splitter.split_markup(common::ENTRY_23_HTML) {
        let (wrapped, wrap) = wrap_chunk(&fragment.content);
        let body = unwrap_chunk(&wrapped, &wrap);
        assert_eq!(body, fragment.content.trim(), "Unwrap should recover the trimmed body");
    }
    Ok(())
}

/// Tests the cleanup chain on a fenced reply, the way the assembler applies
/// it
#[test]
fn test_stripAndUnwrap_withFencedReply_shouldRecoverFragment() -> Result<()> {
    let splitter = EntrySplitter::new();
    let fragments = splitter.split_markup(common::ENTRY_23_HTML);
    let (wrapped, wrap) = wrap_chunk(&fragments[1].content);

    let reply = format!("```html\n{}\n```", wrapped);
    let body = unwrap_chunk(&strip_code_fence(&reply), &wrap);
    assert_eq!(body, fragments[1].content.trim());
    Ok(())
}

/// Tests that an errata declaration is found after ordinary markup lines
#[test]
fn test_parseErrata_withMarkupBeforeMarker_shouldStillMatch() -> Result<()> {
    let reply = "<div class=\"stem\"><p>broken</p></div>\n>>> ERRATA: duplicated stem in source";
    assert_eq!(parse_errata(reply), Some("duplicated stem in source".to_string()));
    Ok(())
}
