/*!
 * Source/translation alignment checks for extracted plain text.
 *
 * Both sides of a translated entry carry the same opaque-script runs and
 * the same boundary marker lines. Reducing each file to that token stream
 * and comparing the streams catches dropped or duplicated chunks long
 * before validation of the assembled markup runs. A size-ratio check
 * flags translations that are suspiciously short or long for the corpus
 * language pair.
 */

use std::fmt;

use regex::Regex;

use crate::profile::ScriptProfile;
use crate::split::plain::marker_kind;

/// Which side of the pair carries surplus tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Original,
    Translated,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => write!(f, "original"),
            Side::Translated => write!(f, "translated"),
        }
    }
}

/// One alignment finding for an entry pair
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentIssue {
    /// The translated file has no content at all
    EmptyTranslation,
    /// Character-count ratio outside the configured band
    SizeAnomaly { ratio: f64, min: f64, max: f64 },
    /// Token streams differ at a position present on both sides
    StreamDiverges { index: usize, original: String, translated: String },
    /// One stream is a prefix of the other
    StreamExtra { side: Side, count: usize, first: String },
}

impl fmt::Display for AlignmentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentIssue::EmptyTranslation => write!(f, "translated file is empty"),
            AlignmentIssue::SizeAnomaly { ratio, min, max } => write!(
                f,
                "size anomaly: translated/original ratio {ratio:.2} outside [{min:.2}, {max:.2}]"
            ),
            AlignmentIssue::StreamDiverges { index, original, translated } => write!(
                f,
                "script stream diverges at token {index}: original '{original}' vs translated '{translated}'"
            ),
            AlignmentIssue::StreamExtra { side, count, first } => {
                write!(f, "{side} has {count} extra token(s) starting with '{first}'")
            }
        }
    }
}

/// Compares extracted plain-text pairs by opaque-script and marker tokens
pub struct AlignmentChecker {
    run_re: Regex,
    size_ratio_min: f64,
    size_ratio_max: f64,
}

impl AlignmentChecker {
    pub fn new(profile: &ScriptProfile) -> Self {
        let mut class = String::from("[");
        for range in &profile.opaque_ranges {
            class.push_str(&format!("\\x{{{:X}}}-\\x{{{:X}}}", range.start, range.end));
        }
        class.push_str("]+");
        AlignmentChecker {
            // Ranges are fixed at compile time or validated on config load
            run_re: Regex::new(&class).unwrap(),
            size_ratio_min: profile.size_ratio_min,
            size_ratio_max: profile.size_ratio_max,
        }
    }

    /// Marker lines and opaque-script runs, in document order. Marker
    /// lines contribute the trimmed line so a rewritten marker word shows
    /// up as a token mismatch rather than a silent drop.
    pub fn token_stream(&self, txt: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for line in txt.lines() {
            let trimmed = line.trim();
            if marker_kind(trimmed).is_some() {
                tokens.push(trimmed.to_string());
                continue;
            }
            for run in self.run_re.find_iter(line) {
                tokens.push(run.as_str().to_string());
            }
        }
        tokens
    }

    /// First point where the two token streams disagree, if any
    pub fn compare_streams(&self, original: &str, translated: &str) -> Option<AlignmentIssue> {
        let orig = self.token_stream(original);
        let trans = self.token_stream(translated);

        for (i, (o, t)) in orig.iter().zip(trans.iter()).enumerate() {
            if o != t {
                return Some(AlignmentIssue::StreamDiverges {
                    index: i,
                    original: o.clone(),
                    translated: t.clone(),
                });
            }
        }
        if orig.len() > trans.len() {
            return Some(AlignmentIssue::StreamExtra {
                side: Side::Original,
                count: orig.len() - trans.len(),
                first: orig[trans.len()].clone(),
            });
        }
        if trans.len() > orig.len() {
            return Some(AlignmentIssue::StreamExtra {
                side: Side::Translated,
                count: trans.len() - orig.len(),
                first: trans[orig.len()].clone(),
            });
        }
        None
    }

    /// Empty-translation and size-band findings
    pub fn check_sizes(&self, original: &str, translated: &str) -> Vec<AlignmentIssue> {
        let mut issues = Vec::new();
        if translated.trim().is_empty() {
            issues.push(AlignmentIssue::EmptyTranslation);
            return issues;
        }
        let orig_len = original.chars().count();
        if orig_len > 0 {
            let ratio = translated.chars().count() as f64 / orig_len as f64;
            if ratio < self.size_ratio_min || ratio > self.size_ratio_max {
                issues.push(AlignmentIssue::SizeAnomaly {
                    ratio,
                    min: self.size_ratio_min,
                    max: self.size_ratio_max,
                });
            }
        }
        issues
    }

    /// All alignment findings for one entry pair
    pub fn check(&self, original: &str, translated: &str) -> Vec<AlignmentIssue> {
        let mut issues = self.check_sizes(original, translated);
        if let Some(issue) = self.compare_streams(original, translated) {
            issues.push(issue);
        }
        issues
    }
}

impl Default for AlignmentChecker {
    fn default() -> Self {
        Self::new(&ScriptProfile::default())
    }
}
