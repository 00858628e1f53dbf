/*!
 * Per-entry assembly.
 *
 * An entry is processed in chunked mode when the markup split and the
 * plain-text split agree on the fragment count (and there are at least
 * two fragments); otherwise the whole entry is one unit of work. Each
 * unit is prompted, validated, and retried with the findings quoted back
 * until it passes or the attempt budget runs out. Passing fragments are
 * concatenated and the assembled entry is validated once more as a whole.
 */

use log::{debug, warn};

use crate::errors::ProviderError;
use crate::pipeline::chunking::{parse_errata, strip_code_fence, unwrap_chunk, wrap_chunk, ChunkWrap};
use crate::pipeline::prompts::{AttemptRecord, PromptBuilder, PromptTemplate};
use crate::pipeline::EntryStatus;
use crate::profile::ScriptProfile;
use crate::providers::Provider;
use crate::split::EntrySplitter;
use crate::validation::EntryValidator;

/// Default generation attempts per fragment
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Outputs larger than 1.2x the original are not quoted back in retry
/// prompts; small fragments get an absolute floor instead
const STALE_OUTPUT_FLOOR: usize = 5120;

/// One entry's inputs
#[derive(Debug, Clone)]
pub struct EntryWork {
    /// Entry identifier (file stem)
    pub id: String,
    /// Original markup
    pub original_html: String,
    /// Authoritative translated plain text
    pub translated_txt: String,
    /// Output of a previous run, for warm start
    pub previous_output: Option<String>,
}

/// One entry's result
#[derive(Debug, Clone)]
pub struct EntryOutcome {
    /// Entry identifier
    pub id: String,
    /// Final status
    pub status: EntryStatus,
    /// Assembled markup; absent only when nothing could be produced
    pub output: Option<String>,
    /// Remaining validation or processing findings
    pub issues: Vec<String>,
    /// Errata log lines (`id:i/n html reason`)
    pub errata: Vec<String>,
    /// Generation requests made for this entry
    pub attempts: u32,
}

enum ChunkState {
    Clean(String),
    Failed { issues: Vec<String> },
    Errata(String),
    Overflow(String),
}

struct FragmentResult {
    state: ChunkState,
    calls: u32,
}

/// Drives the generation service for one entry at a time
pub struct Assembler<P: Provider> {
    provider: P,
    template: PromptTemplate,
    splitter: EntrySplitter,
    validator: EntryValidator,
    max_attempts: u32,
}

impl<P: Provider> Assembler<P> {
    /// Assembler with the default corpus profile
    pub fn new(provider: P, template: PromptTemplate) -> Self {
        Self::with_profile(provider, template, ScriptProfile::default(), DEFAULT_MAX_ATTEMPTS)
    }

    /// Assembler with a custom profile and attempt budget
    pub fn with_profile(
        provider: P,
        template: PromptTemplate,
        profile: ScriptProfile,
        max_attempts: u32,
    ) -> Self {
        let splitter = EntrySplitter::with_profile(&profile);
        let validator = EntryValidator::with_profile(profile);
        Assembler { provider, template, splitter, validator, max_attempts: max_attempts.max(1) }
    }

    /// The provider this assembler drives
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Whether an output is small enough to quote back in a retry prompt
    fn usable_history(output: &str, original: &str) -> bool {
        output.len() <= (original.len() * 12 / 10).max(STALE_OUTPUT_FLOOR)
    }

    /// Generate one fragment (or the whole entry when `chunked` is false),
    /// retrying rejected attempts with the findings quoted back.
    async fn generate_fragment(
        &self,
        entry_id: &str,
        index: usize,
        total: usize,
        original_fragment: &str,
        translated_chunk: &str,
        chunked: bool,
        warm: Option<(String, Vec<String>)>,
    ) -> FragmentResult {
        let (prompt_doc, wrap) = if chunked {
            wrap_chunk(original_fragment)
        } else {
            (original_fragment.to_string(), ChunkWrap::default())
        };

        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut last_issues: Vec<String> = Vec::new();
        if let Some((previous, issues)) = warm {
            last_issues = issues.clone();
            let quoted = if Self::usable_history(&previous, original_fragment) {
                previous
            } else {
                String::new()
            };
            history.push(AttemptRecord::new(issues, quoted));
        }

        let mut calls = 0u32;
        for attempt in 0..self.max_attempts {
            let prompt = PromptBuilder::new(&self.template, &prompt_doc, translated_chunk)
                .chunk_mode(chunked)
                .with_history(&history)
                .build();
            let request = self.provider.build_request(&prompt);
            calls += 1;

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(ProviderError::ContextOverflow(reason)) => {
                    return FragmentResult { state: ChunkState::Overflow(reason), calls };
                }
                Err(e) => {
                    warn!(
                        "{}: fragment {}/{} attempt {} failed: {}",
                        entry_id,
                        index + 1,
                        total,
                        attempt + 1,
                        e
                    );
                    last_issues = vec![e.to_string()];
                    history.push(AttemptRecord::new(last_issues.clone(), String::new()));
                    continue;
                }
            };

            let cleaned = strip_code_fence(&P::extract_text(&response));
            if let Some(reason) = parse_errata(&cleaned) {
                return FragmentResult { state: ChunkState::Errata(reason), calls };
            }

            let candidate =
                if chunked { unwrap_chunk(&cleaned, &wrap) } else { cleaned };
            let issues =
                self.validator.validate(original_fragment, &candidate, Some(translated_chunk));
            if issues.is_empty() {
                return FragmentResult { state: ChunkState::Clean(candidate), calls };
            }

            debug!(
                "{}: fragment {}/{} attempt {} rejected with {} issue(s)",
                entry_id,
                index + 1,
                total,
                attempt + 1,
                issues.len()
            );
            let quoted = if Self::usable_history(&candidate, original_fragment) {
                candidate
            } else {
                String::new()
            };
            history.push(AttemptRecord::new(issues.clone(), quoted));
            last_issues = issues;
        }

        FragmentResult { state: ChunkState::Failed { issues: last_issues }, calls }
    }

    /// Process one entry end to end.
    pub async fn process_entry(&self, work: &EntryWork) -> EntryOutcome {
        let markup_fragments = self.splitter.split_markup(&work.original_html);
        let txt_fragments = self.splitter.split_plain(&work.translated_txt);
        let total = markup_fragments.len();
        let chunked = total == txt_fragments.len() && total >= 2;

        if total != txt_fragments.len() {
            debug!(
                "{}: fragment counts differ (markup {}, text {}), processing whole entry",
                work.id,
                total,
                txt_fragments.len()
            );
        }

        if !chunked {
            return self.process_whole(work).await;
        }

        // Reuse fragments of a previous output when its structure still
        // matches the original's
        let previous_fragments = work
            .previous_output
            .as_ref()
            .map(|previous| self.splitter.split_markup(previous))
            .filter(|fragments| fragments.len() == total);

        let mut outputs: Vec<Option<String>> = vec![None; total];
        let mut issues: Vec<String> = Vec::new();
        let mut errata: Vec<String> = Vec::new();
        let mut attempts = 0u32;
        let mut any_failed = false;

        for (i, fragment) in markup_fragments.iter().enumerate() {
            let translated_chunk = txt_fragments[i].content.as_str();

            let mut warm = None;
            if let Some(previous) = &previous_fragments {
                let candidate = previous[i].content.as_str();
                let previous_issues =
                    self.validator.validate(&fragment.content, candidate, Some(translated_chunk));
                if previous_issues.is_empty() {
                    debug!("{}: fragment {}/{} reused from previous output", work.id, i + 1, total);
                    outputs[i] = Some(candidate.to_string());
                    continue;
                }
                warm = Some((candidate.to_string(), previous_issues));
            }

            let result = self
                .generate_fragment(
                    &work.id,
                    i,
                    total,
                    &fragment.content,
                    translated_chunk,
                    true,
                    warm,
                )
                .await;
            attempts += result.calls;

            match result.state {
                ChunkState::Clean(output) => outputs[i] = Some(output),
                ChunkState::Errata(reason) => {
                    errata.push(format!("{}:{}/{} html {}", work.id, i + 1, total, reason));
                    issues.push(format!("fragment {}/{}: errata: {}", i + 1, total, reason));
                }
                ChunkState::Overflow(reason) => {
                    any_failed = true;
                    issues.push(format!("fragment {}/{}: context overflow: {}", i + 1, total, reason));
                }
                ChunkState::Failed { issues: fragment_issues } => {
                    any_failed = true;
                    for issue in fragment_issues {
                        issues.push(format!("fragment {}/{}: {}", i + 1, total, issue));
                    }
                }
            }
        }

        // Failed and errata fragments keep the original text so the
        // assembled file stays structurally complete for the next run
        let pieces: Vec<&str> = (0..total)
            .map(|i| outputs[i].as_deref().unwrap_or(markup_fragments[i].content.as_str()))
            .collect();
        let assembled = pieces.join("\n");

        let mut status = if any_failed {
            EntryStatus::Failed
        } else if !errata.is_empty() {
            EntryStatus::Errata
        } else {
            EntryStatus::Clean
        };

        if status == EntryStatus::Clean {
            // Fragment-local passes do not imply whole-document passes for
            // the windowed scans (a remnant marker can straddle a join)
            let whole_issues =
                self.validator.validate(&work.original_html, &assembled, Some(&work.translated_txt));
            if !whole_issues.is_empty() {
                status = EntryStatus::Failed;
                issues.extend(whole_issues);
            }
        }

        EntryOutcome {
            id: work.id.clone(),
            status,
            output: Some(assembled),
            issues,
            errata,
            attempts,
        }
    }

    async fn process_whole(&self, work: &EntryWork) -> EntryOutcome {
        let mut warm = None;
        if let Some(previous) = &work.previous_output {
            let previous_issues =
                self.validator.validate(&work.original_html, previous, Some(&work.translated_txt));
            if previous_issues.is_empty() {
                debug!("{}: previous output still validates clean", work.id);
                return EntryOutcome {
                    id: work.id.clone(),
                    status: EntryStatus::Clean,
                    output: Some(previous.clone()),
                    issues: Vec::new(),
                    errata: Vec::new(),
                    attempts: 0,
                };
            }
            warm = Some((previous.clone(), previous_issues));
        }

        let result = self
            .generate_fragment(
                &work.id,
                0,
                1,
                &work.original_html,
                &work.translated_txt,
                false,
                warm,
            )
            .await;

        let (status, output, issues, errata) = match result.state {
            ChunkState::Clean(output) => (EntryStatus::Clean, Some(output), Vec::new(), Vec::new()),
            ChunkState::Failed { issues } => (EntryStatus::Failed, None, issues, Vec::new()),
            ChunkState::Errata(reason) => (
                EntryStatus::Errata,
                None,
                vec![format!("errata: {}", reason)],
                vec![format!("{}:1/1 html {}", work.id, reason)],
            ),
            ChunkState::Overflow(reason) => (
                EntryStatus::Skipped,
                None,
                vec![format!("context overflow: {}", reason)],
                Vec::new(),
            ),
        };

        EntryOutcome { id: work.id.clone(), status, output, issues, errata, attempts: result.calls }
    }
}
