/*!
 * Entry splitting: carve a dictionary entry into translation-sized
 * fragments, in two parallel forms.
 *
 * `split_markup` segments the HTML form on structural `div` boundaries.
 * `split_plain` segments the plain-text derivative, preferring explicit
 * `@@SPLIT:type@@` marker lines and falling back to layout heuristics for
 * files produced before markers existed. Both splits are total functions:
 * any input yields at least one fragment, and concatenating the fragment
 * contents in order reproduces the input byte for byte.
 */

pub mod markup;
pub mod plain;
pub mod stems;

use std::fmt;

use regex::Regex;

use crate::profile::ScriptProfile;

/// Structural role of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Leading material before the first boundary
    Header,
    /// Morphological stem block of a verb entry
    Stem,
    /// Numbered sense block
    Sense,
    /// Section block of a long article
    Section,
    /// Trailing material after the last block
    Footer,
    /// The entire entry, when no boundary was found
    Whole,
}

impl FragmentKind {
    /// Marker-line spelling of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::Header => "header",
            FragmentKind::Stem => "stem",
            FragmentKind::Sense => "sense",
            FragmentKind::Section => "section",
            FragmentKind::Footer => "footer",
            FragmentKind::Whole => "whole",
        }
    }

    /// Parse a marker-line kind word. Unknown words return None and the
    /// line is then treated as ordinary text, so a corrupted marker stays
    /// visible instead of silently relabeling a fragment.
    pub fn from_marker(word: &str) -> Option<FragmentKind> {
        match word {
            "header" => Some(FragmentKind::Header),
            "stem" => Some(FragmentKind::Stem),
            "sense" => Some(FragmentKind::Sense),
            "section" => Some(FragmentKind::Section),
            "footer" => Some(FragmentKind::Footer),
            "whole" => Some(FragmentKind::Whole),
            _ => None,
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fragment of a split entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Structural role
    pub kind: FragmentKind,
    /// Exact byte slice of the input covered by this fragment
    pub content: String,
}

impl Fragment {
    /// Create a fragment
    pub fn new(kind: FragmentKind, content: impl Into<String>) -> Self {
        Fragment { kind, content: content.into() }
    }
}

/// Splitter configured for one corpus profile
pub struct EntrySplitter {
    stem_line_re: Regex,
}

impl EntrySplitter {
    /// Splitter with the default corpus vocabulary
    pub fn new() -> Self {
        EntrySplitter { stem_line_re: stems::DEFAULT_STEM_LINE_RE.clone() }
    }

    /// Splitter with a custom profile's stem vocabulary
    pub fn with_profile(profile: &ScriptProfile) -> Self {
        EntrySplitter { stem_line_re: stems::stem_line_regex(&profile.stem_names) }
    }

    /// Split the markup form on structural boundaries.
    /// Boundary priority: stem divs, then top-level sense (and point) divs,
    /// then section divs, then the whole entry as one fragment.
    pub fn split_markup(&self, html: &str) -> Vec<Fragment> {
        markup::split_markup(html)
    }

    /// Split the plain-text form. Marker lines win; stem-heading and
    /// numbered-sense layout heuristics cover unmarked files.
    pub fn split_plain(&self, txt: &str) -> Vec<Fragment> {
        plain::split_plain(txt, &self.stem_line_re)
    }

    /// Whether a (stripped) line is a stem heading
    pub fn is_stem_heading(&self, line: &str) -> bool {
        self.stem_line_re.is_match(line.trim())
    }
}

impl Default for EntrySplitter {
    fn default() -> Self {
        EntrySplitter::new()
    }
}
