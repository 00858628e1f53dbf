/*!
 * Prompt templates for entry assembly.
 *
 * The generation service receives the original markup of one entry (or one
 * fragment of it) together with the authoritative translated plain text,
 * and is asked to merge the two: same structure, translated visible text.
 * Retries quote the previous attempt's validation findings and output so
 * the service can correct them.
 */

use std::path::Path;

use anyhow::{Context, Result};

/// Maximum validation messages quoted per rejected attempt
pub const MAX_HISTORY_ERRORS: usize = 5;

/// Prompt template with substitution placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default prompt for merging a translation into entry markup.
    pub const ENTRY_TRANSLATOR: &'static str = r#"You are producing the {target_language} edition of a lexicographic dictionary entry, translated from {source_language}.

You are given the original HTML of the entry and the authoritative {target_language} translation of its visible text.

## Your Task
Produce the {target_language} HTML: the exact structure of the original with its visible {source_language} text replaced by the provided translation.

## Rules
- Keep every tag and attribute exactly as in the original, in the same order.
- Keep all Hebrew and Aramaic characters byte for byte, in their original positions.
- Keep placeholder tags, reference attributes, and entry IDs untouched.
- Use the provided {target_language} text verbatim; never retranslate, paraphrase, or omit any of it.
- Keep HTML comments exactly where they appear.
- Output only the HTML, with no commentary and no code fences.
- If the original entry itself is defective (truncated, garbled, mismatched tags), reply instead with one line starting with ">>> ERRATA: " that describes the defect.

## Original HTML
{{ORIGINAL_HTML}}

## {target_language} text
{{FRENCH_TXT}}"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self { template: template.to_string() }
    }

    /// Create the default entry translator template.
    pub fn entry_translator() -> Self {
        Self::new(Self::ENTRY_TRANSLATOR)
    }

    /// Load a template from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let template = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt template: {}", path.display()))?;
        Ok(Self::new(&template))
    }

    /// Substitute the language placeholders, leaving the per-entry ones.
    pub fn with_languages(self, source_language: &str, target_language: &str) -> Self {
        Self {
            template: self
                .template
                .replace("{source_language}", source_language)
                .replace("{target_language}", target_language),
        }
    }

    /// Render the template for one entry or fragment.
    pub fn render(&self, original_html: &str, translated_txt: &str) -> String {
        self.template
            .replace("{{ORIGINAL_HTML}}", original_html)
            .replace("{{FRENCH_TXT}}", translated_txt)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::entry_translator()
    }
}

/// One rejected attempt, quoted in the next prompt
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// Validation messages the attempt was rejected for
    pub errors: Vec<String>,
    /// The markup the attempt produced; empty when the request itself failed
    pub output: String,
}

impl AttemptRecord {
    pub fn new(errors: Vec<String>, output: impl Into<String>) -> Self {
        AttemptRecord { errors, output: output.into() }
    }
}

/// Builder for the full per-attempt prompt.
#[derive(Debug)]
pub struct PromptBuilder<'a> {
    template: &'a PromptTemplate,
    original_html: &'a str,
    translated_txt: &'a str,
    chunk_mode: bool,
    history: &'a [AttemptRecord],
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for one entry or fragment.
    pub fn new(
        template: &'a PromptTemplate,
        original_html: &'a str,
        translated_txt: &'a str,
    ) -> Self {
        Self { template, original_html, translated_txt, chunk_mode: false, history: &[] }
    }

    /// Mark the document as a fragment of a larger entry.
    pub fn chunk_mode(mut self, on: bool) -> Self {
        self.chunk_mode = on;
        self
    }

    /// Attach the rejected attempts to quote.
    pub fn with_history(mut self, history: &'a [AttemptRecord]) -> Self {
        self.history = history;
        self
    }

    /// Build the prompt text.
    pub fn build(&self) -> String {
        let mut prompt = self.template.render(self.original_html, self.translated_txt);

        if self.chunk_mode {
            prompt.push_str(
                "\n\nNote: the document above is one fragment of a larger entry. \
                 Translate exactly this fragment, keep the wrapper comments where they \
                 appear, and do not add structure beyond what is shown.",
            );
        }

        for (i, attempt) in self.history.iter().enumerate() {
            prompt.push_str(&format!("\n\n--- Attempt {} was rejected ---\n", i + 1));
            for error in attempt.errors.iter().take(MAX_HISTORY_ERRORS) {
                prompt.push_str(&format!("- {}\n", error));
            }
            if attempt.errors.len() > MAX_HISTORY_ERRORS {
                prompt.push_str(&format!(
                    "... and {} more issues\n",
                    attempt.errors.len() - MAX_HISTORY_ERRORS
                ));
            }
            if !attempt.output.is_empty() {
                prompt.push_str(&format!("It produced:\n```html\n{}\n```\n", attempt.output));
            }
        }
        if !self.history.is_empty() {
            prompt.push_str("\nProduce a corrected translation that fixes every issue listed above.");
        }

        prompt
    }
}
