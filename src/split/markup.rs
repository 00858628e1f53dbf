/*!
 * Markup-side splitting.
 *
 * Boundaries are structural `div` elements. The scanner finds each
 * boundary-class opening tag, then walks forward counting every `div`
 * open against every `</div>` until the matching close; an unclosed div
 * extends to end of input. Fragments are then cut so that every byte of
 * the input lands in exactly one fragment: leading material becomes a
 * header fragment when it has visible content, the gap between two
 * boundaries travels with the following fragment, and trailing material
 * is folded into the last fragment.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Fragment, FragmentKind};

static STEM_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div\s+class="stem"[^>]*>"#).unwrap());
static SENSE_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div\s+class="sense"[^>]*>"#).unwrap());
static POINT_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div\s+class="point"[^>]*>"#).unwrap());
static SECTION_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div\s+class="section"[^>]*>"#).unwrap());
static ANY_DIV_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<div\b[^>]*>").unwrap());
static DIV_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</div>").unwrap());

/// Byte span `[start, end)` of one boundary div, opening tag included
type Span = (usize, usize);

/// Find the span of every match of `open_re`, closing each by depth
/// counting over all div opens and closes.
fn find_div_spans(html: &str, open_re: &Regex) -> Vec<Span> {
    let mut spans = Vec::new();
    for m in open_re.find_iter(html) {
        let mut depth = 1usize;
        let mut pos = m.end();
        let end = loop {
            let Some(close) = DIV_CLOSE_RE.find_at(html, pos) else {
                // Unclosed div runs to end of input
                break html.len();
            };
            match ANY_DIV_OPEN_RE.find_at(html, pos) {
                Some(open) if open.start() < close.start() => {
                    depth += 1;
                    pos = open.end();
                }
                _ => {
                    depth -= 1;
                    pos = close.end();
                    if depth == 0 {
                        break pos;
                    }
                }
            }
        };
        spans.push((m.start(), end));
    }
    spans
}

/// Drop spans strictly contained in another span
fn top_level(spans: &[Span]) -> Vec<Span> {
    spans
        .iter()
        .copied()
        .filter(|&(s, e)| !spans.iter().any(|&(s2, e2)| s2 < s && e <= e2))
        .collect()
}

/// Cut the input into fragments along the given spans (sorted by start)
fn build_chunks(html: &str, spans: &[Span], kind: FragmentKind) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let first_start = spans[0].0;
    let mut prev_end = 0usize;

    let header = &html[..first_start];
    if !header.trim().is_empty() {
        fragments.push(Fragment::new(FragmentKind::Header, header));
        prev_end = first_start;
    }

    for &(_, end) in spans {
        // Overlapping spans (malformed nesting) yield an empty fragment
        // rather than losing or duplicating bytes
        let end = end.max(prev_end);
        fragments.push(Fragment::new(kind, &html[prev_end..end]));
        prev_end = end;
    }

    if prev_end < html.len() {
        if let Some(last) = fragments.last_mut() {
            last.content.push_str(&html[prev_end..]);
        }
    }

    fragments
}

/// Split an entry's markup on structural boundaries.
/// Priority: stem divs, then top-level sense and point divs, then section
/// divs, then the whole entry as a single fragment.
pub fn split_markup(html: &str) -> Vec<Fragment> {
    let stem_spans = find_div_spans(html, &STEM_OPEN_RE);
    if !stem_spans.is_empty() {
        return build_chunks(html, &stem_spans, FragmentKind::Stem);
    }

    let mut sense_spans = find_div_spans(html, &SENSE_OPEN_RE);
    sense_spans.extend(find_div_spans(html, &POINT_OPEN_RE));
    sense_spans.sort();
    let sense_spans = top_level(&sense_spans);
    if !sense_spans.is_empty() {
        return build_chunks(html, &sense_spans, FragmentKind::Sense);
    }

    let section_spans = find_div_spans(html, &SECTION_OPEN_RE);
    if !section_spans.is_empty() {
        return build_chunks(html, &section_spans, FragmentKind::Section);
    }

    vec![Fragment::new(FragmentKind::Whole, html)]
}
