/*!
 * Stem-heading vocabulary.
 *
 * A verb entry's plain text opens each morphological block with a stem
 * name (Qal, Niph`al, Hiph`il, ...) at the start of a line, optionally
 * followed by a period and a homonym index like `_2_`. The vocabulary
 * comes from the profile; the alternation is ordered longest-first so
 * `Qal Passive` wins over `Qal` and `Po`el.` over `Po`.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile;

/// Compiled matcher for the default vocabulary
pub static DEFAULT_STEM_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    let profile = profile::ScriptProfile::default();
    stem_line_regex(&profile.stem_names)
});

/// Build the stem-heading line matcher for a vocabulary.
/// Matches at line start: a stem name, an optional trailing period, an
/// optional `_N_` homonym index, then whitespace or end of line.
pub fn stem_line_regex(names: &[String]) -> Regex {
    if names.is_empty() {
        // Empty vocabulary disables stem detection entirely
        return Regex::new(r"[^\s\S]").unwrap();
    }
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = sorted
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"^(?:{})\.?(?:_\d+_)?(?:\s|$)", alternation);
    // The pattern is built from escaped literals, compilation cannot fail
    Regex::new(&pattern).unwrap()
}
