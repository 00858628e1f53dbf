/*!
 * Entry validation service.
 *
 * Orchestrates every check over one entry: preservation of opaque script,
 * placeholders, references, abbreviations and entry identifiers, coverage
 * of the translated plain text, empty translatable tags, residual
 * source-language phrases, and raw tag-sequence preservation. All checks
 * run unconditionally over the inputs they have; a missing plain-text
 * document skips the coverage check silently. The service never fails on
 * malformed input, it reports whatever violations the degraded parse
 * surfaces.
 */

use std::fmt;

use log::debug;

use crate::profile::ScriptProfile;

use super::coverage::CoverageValidator;
use super::extract;
use super::preservation::PreservationValidator;
use super::remnants::RemnantValidator;
use super::tags::TagValidator;

/// One validation finding, attributed to an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Entry the finding belongs to
    pub entry_id: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl ValidationIssue {
    pub fn new(entry_id: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue { entry_id: entry_id.into(), message: message.into() }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entry_id, self.message)
    }
}

/// Validator running every check over one entry
pub struct EntryValidator {
    profile: ScriptProfile,
    preservation: PreservationValidator,
    coverage: CoverageValidator,
    remnants: RemnantValidator,
    tags: TagValidator,
}

impl EntryValidator {
    /// Validator with the default corpus profile
    pub fn new() -> Self {
        Self::with_profile(ScriptProfile::default())
    }

    /// Validator with a custom profile
    pub fn with_profile(profile: ScriptProfile) -> Self {
        let coverage = CoverageValidator::new(&profile);
        let remnants = RemnantValidator::new(&profile);
        let tags = TagValidator::new(&profile);
        EntryValidator {
            profile,
            preservation: PreservationValidator::new(),
            coverage,
            remnants,
            tags,
        }
    }

    /// The profile this validator was built from
    pub fn profile(&self) -> &ScriptProfile {
        &self.profile
    }

    /// Validate a translated document against its original.
    /// `translated_plain` is optional; without it the coverage check is
    /// skipped. Returns every violation message, in deterministic order.
    pub fn validate(
        &self,
        original_markup: &str,
        translated_markup: &str,
        translated_plain: Option<&str>,
    ) -> Vec<String> {
        let original = extract::collect(&self.profile, original_markup);
        let translated = extract::collect(&self.profile, translated_markup);

        let mut messages = Vec::new();

        for issue in self.preservation.check(&original, &translated) {
            messages.push(issue.message(&self.profile.script_label));
        }

        if let Some(plain) = translated_plain {
            for issue in self.coverage.check(translated_markup, plain) {
                messages.push(issue.to_string());
            }
        }

        for issue in self.tags.check_empty_translatables(&original, &translated) {
            messages.push(issue.to_string());
        }

        for issue in self.remnants.check(translated_markup) {
            messages.push(issue.to_string());
        }

        for issue in self.tags.check_sequence(&original, &translated) {
            messages.push(issue.to_string());
        }

        debug!(
            "Validation: {} issue(s) over {} original / {} translated bytes",
            messages.len(),
            original_markup.len(),
            translated_markup.len()
        );

        messages
    }

    /// Validate and attribute every finding to `entry_id`
    pub fn validate_entry(
        &self,
        entry_id: &str,
        original_markup: &str,
        translated_markup: &str,
        translated_plain: Option<&str>,
    ) -> Vec<ValidationIssue> {
        self.validate(original_markup, translated_markup, translated_plain)
            .into_iter()
            .map(|message| ValidationIssue::new(entry_id, message))
            .collect()
    }
}

impl Default for EntryValidator {
    fn default() -> Self {
        Self::new()
    }
}
