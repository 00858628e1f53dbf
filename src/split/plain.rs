/*!
 * Plain-text-side splitting.
 *
 * The extractor injects `@@SPLIT:type@@` marker lines at the boundaries
 * the markup split found, so a marked file splits into exactly the same
 * fragment sequence. Files produced before markers existed fall back to
 * layout heuristics: stem-heading lines preceded by a blank line, then
 * `N.` sense lines preceded by a blank line, with a special case for a
 * first sense that follows the header with no blank line. Each fragment
 * is cut at line starts, so concatenating fragments reproduces the input
 * byte for byte.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Fragment, FragmentKind};

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@@SPLIT:(\w+)@@$").unwrap());
static SENSE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.(\s|$)").unwrap());

/// Whether a (stripped) line is a split marker with a known kind
pub fn marker_kind(line: &str) -> Option<FragmentKind> {
    MARKER_RE
        .captures(line.trim())
        .and_then(|cap| FragmentKind::from_marker(&cap[1]))
}

/// Byte offsets of every line start
fn line_starts(txt: &str) -> (Vec<usize>, Vec<&str>) {
    let mut starts = Vec::new();
    let mut lines = Vec::new();
    let mut pos = 0usize;
    for line in txt.split('\n') {
        starts.push(pos);
        lines.push(line);
        pos += line.len() + 1;
    }
    (starts, lines)
}

/// Cut the input at the given (line index, kind) positions, sorted by line.
/// Leading text becomes a header fragment when it has visible content,
/// otherwise it travels with the first fragment.
fn cut_at(txt: &str, starts: &[usize], cuts: &[(usize, FragmentKind)]) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let first_cut = starts[cuts[0].0];
    let mut chunk_start = 0usize;

    let head = &txt[..first_cut];
    if !head.trim().is_empty() {
        fragments.push(Fragment::new(FragmentKind::Header, head));
        chunk_start = first_cut;
    }

    for (k, &(line_idx, kind)) in cuts.iter().enumerate() {
        let start = if k == 0 { chunk_start } else { starts[line_idx] };
        let end = if k + 1 < cuts.len() { starts[cuts[k + 1].0] } else { txt.len() };
        fragments.push(Fragment::new(kind, &txt[start..end]));
    }

    fragments
}

/// Split a plain-text entry. Markers win over heuristics.
pub fn split_plain(txt: &str, stem_line_re: &Regex) -> Vec<Fragment> {
    let (starts, lines) = line_starts(txt);

    // Marker pass
    let markers: Vec<(usize, FragmentKind)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| marker_kind(line).map(|kind| (i, kind)))
        .collect();
    if !markers.is_empty() {
        return cut_at(txt, &starts, &markers);
    }

    // Stem-heading heuristic: a vocabulary line opening a paragraph
    let stem_cuts: Vec<(usize, FragmentKind)> = (1..lines.len())
        .filter(|&i| lines[i - 1].trim().is_empty() && stem_line_re.is_match(lines[i].trim()))
        .map(|i| (i, FragmentKind::Stem))
        .collect();
    if !stem_cuts.is_empty() {
        return cut_at(txt, &starts, &stem_cuts);
    }

    // Numbered-sense heuristic
    let mut sense_cuts: Vec<(usize, u32)> = Vec::new();
    for i in 1..lines.len() {
        if !lines[i - 1].trim().is_empty() {
            continue;
        }
        if let Some(cap) = SENSE_LINE_RE.captures(lines[i].trim()) {
            if let Ok(n) = cap[1].parse::<u32>() {
                sense_cuts.push((i, n));
            }
        }
    }
    // Sense 1 often follows the header directly with no blank line; when
    // later senses were found but no sense 1, look for it above them
    if !sense_cuts.is_empty() && !sense_cuts.iter().any(|&(_, n)| n == 1) {
        let first = sense_cuts[0].0;
        for (i, line) in lines.iter().enumerate().take(first) {
            if let Some(cap) = SENSE_LINE_RE.captures(line.trim()) {
                if cap[1].parse::<u32>() == Ok(1) {
                    sense_cuts.insert(0, (i, 1));
                    break;
                }
            }
        }
    }
    if !sense_cuts.is_empty() {
        let cuts: Vec<(usize, FragmentKind)> =
            sense_cuts.iter().map(|&(i, _)| (i, FragmentKind::Sense)).collect();
        return cut_at(txt, &starts, &cuts);
    }

    vec![Fragment::new(FragmentKind::Whole, txt)]
}
