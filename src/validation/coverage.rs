/*!
 * Translated-text coverage: every meaningful line of the translated
 * plain-text document must appear in the translated markup's visible text.
 *
 * Comparison strips all whitespace on both sides, because whitespace
 * placement between tags is not meaningful, and searches anywhere in the
 * document rather than walking forward, so a stock phrase repeated across
 * senses never false-flags a later line. Ampersands are normalized to the
 * target-language word on both sides before comparison.
 */

use std::fmt;

use regex::Regex;

use crate::markup::text::strip_tags;
use crate::profile::ScriptProfile;
use crate::split::plain::marker_kind;

/// One coverage finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageIssue {
    /// A plain-text line has no counterpart in the markup's visible text
    MissingText { line: String },
}

impl fmt::Display for CoverageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageIssue::MissingText { line } => {
                write!(f, "translated text missing from HTML: '{}'", line)
            }
        }
    }
}

/// Validator for plain-text-to-markup coverage
pub struct CoverageValidator {
    ampersand_word: String,
    /// Lines consisting only of opaque script, citation punctuation and
    /// whitespace carry nothing translatable
    opaque_only_re: Regex,
    /// Placeholder notation injected during extraction
    placeholder_note_re: Regex,
}

fn opaque_class(profile: &ScriptProfile) -> String {
    let mut class = String::new();
    for range in &profile.opaque_ranges {
        class.push_str(&format!(r"\x{{{:X}}}-\x{{{:X}}}", range.start, range.end));
    }
    class
}

impl CoverageValidator {
    pub fn new(profile: &ScriptProfile) -> Self {
        let class = opaque_class(profile);
        let opaque_only_re = Regex::new(&format!(r"^[{}\s\[\]:./,]+$", class))
            .expect("Invalid opaque-only line regex");
        let placeholder_note_re = Regex::new(&format!(
            r"\[{}\d+:[^\]]*\]",
            regex::escape(&profile.placeholder_prefix)
        ))
        .expect("Invalid placeholder notation regex");
        CoverageValidator {
            ampersand_word: profile.ampersand_word.clone(),
            opaque_only_re,
            placeholder_note_re,
        }
    }

    /// Normalize one side of the comparison: ampersands become the
    /// target-language word, then all whitespace is removed
    fn normalize(&self, text: &str) -> String {
        let with_word = text.replace('&', &format!(" {} ", self.ampersand_word));
        let mut out = String::with_capacity(with_word.len());
        for c in with_word.chars() {
            if !c.is_whitespace() && c != '_' && c != '^' {
                out.push(c);
            }
        }
        out
    }

    /// Whether the line carries no content this check should look for
    fn is_skippable(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty()
            || trimmed.starts_with("===")
            || trimmed == "---"
            || marker_kind(trimmed).is_some()
            || self.opaque_only_re.is_match(trimmed)
    }

    /// Check every line of the plain text against the markup document
    pub fn check(&self, translated_markup: &str, translated_plain: &str) -> Vec<CoverageIssue> {
        let haystack = self.normalize(&strip_tags(translated_markup));
        let mut issues = Vec::new();

        for line in translated_plain.lines() {
            if self.is_skippable(line) {
                continue;
            }
            let without_notes = self.placeholder_note_re.replace_all(line, "");
            let needle = self.normalize(&without_notes);
            if needle.is_empty() {
                continue;
            }
            if !haystack.contains(&needle) {
                issues.push(CoverageIssue::MissingText { line: excerpt(line.trim(), 80) });
            }
        }

        issues
    }
}

/// Truncate to at most `max` characters on a char boundary
fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}
