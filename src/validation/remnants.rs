/*!
 * Residual source-language detection.
 *
 * A heuristic safety net: the translated markup's visible prose (tags
 * stripped, opaque-script runs removed, whitespace collapsed, lowercased)
 * is scanned for a short list of source-language function words and stock
 * phrases in context. A hit means a passage probably survived
 * untranslated. False positives are expected and tolerated downstream.
 */

use std::fmt;

use regex::Regex;

use crate::markup::text::{collapse_whitespace, strip_tags};
use crate::profile::ScriptProfile;

/// One remnant finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemnantIssue {
    /// A source-language marker phrase was found in the prose
    PossibleRemnant { marker: String },
}

impl fmt::Display for RemnantIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemnantIssue::PossibleRemnant { marker } => {
                write!(f, "possible untranslated remnant: '{}'", marker)
            }
        }
    }
}

/// Validator scanning for untranslated source-language phrases
pub struct RemnantValidator {
    markers: Vec<String>,
    opaque_run_re: Regex,
}

impl RemnantValidator {
    pub fn new(profile: &ScriptProfile) -> Self {
        let mut class = String::new();
        for range in &profile.opaque_ranges {
            class.push_str(&format!(r"\x{{{:X}}}-\x{{{:X}}}", range.start, range.end));
        }
        let opaque_run_re =
            Regex::new(&format!(r"[{}]+", class)).expect("Invalid opaque run regex");
        RemnantValidator { markers: profile.remnant_markers.clone(), opaque_run_re }
    }

    /// Scan the translated markup's prose for marker phrases
    pub fn check(&self, translated_markup: &str) -> Vec<RemnantIssue> {
        let stripped = strip_tags(translated_markup);
        let without_script = self.opaque_run_re.replace_all(&stripped, "");
        let prose = collapse_whitespace(&without_script).to_lowercase();

        self.markers
            .iter()
            .filter(|marker| prose.contains(marker.as_str()))
            .map(|marker| RemnantIssue::PossibleRemnant { marker: marker.trim().to_string() })
            .collect()
    }
}
