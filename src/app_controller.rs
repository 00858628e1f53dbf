/*!
 * Application controller.
 *
 * Wires the configuration into the extraction, splitting, validation,
 * alignment and pipeline services and exposes one method per command.
 * Methods log their findings as they go and return counts the binary
 * turns into an exit code.
 */

use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::alignment::AlignmentChecker;
use crate::app_config::Config;
use crate::extraction::TextExtractor;
use crate::file_utils::FileManager;
use crate::pipeline::{Assembler, PipelineRunner, PromptTemplate, RunSummary, RunnerOptions};
use crate::providers::{ChatApi, Provider};
use crate::split::EntrySplitter;
use crate::validation::EntryValidator;

/// Per-run knobs the command line may override
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Process at most this many entries
    pub limit: Option<usize>,
    /// Restrict the run to these entry ids
    pub only_ids: Vec<String>,
    /// Reprocess entries the clean cache would skip
    pub force: bool,
    /// Override the configured parallelism
    pub parallel: Option<usize>,
    /// Override the configured shuffle setting
    pub shuffle: Option<bool>,
}

/// Counts of one validation scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub clean: usize,
    pub dirty: usize,
    /// Entries with no output to validate
    pub missing: usize,
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} clean, {} dirty, {} without output", self.clean, self.dirty, self.missing)
    }
}

/// Counts of one alignment check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignSummary {
    pub aligned: usize,
    pub divergent: usize,
    /// Entries with no translated text to compare
    pub missing: usize,
}

impl fmt::Display for AlignSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} aligned, {} divergent, {} without translated text",
            self.aligned, self.divergent, self.missing
        )
    }
}

fn corpus_progress(total: u64) -> ProgressBar {
    let progress = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style.progress_chars("█▓▒░"));
    progress
}

/// Main application controller
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Controller { config })
    }

    /// The configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn validator(&self) -> EntryValidator {
        EntryValidator::with_profile(self.config.profile.clone())
    }

    fn extractor(&self) -> TextExtractor {
        TextExtractor::with_profile(self.config.profile.clone())
    }

    /// Prompt template from the configured file, or the built-in one,
    /// rendered with the configured language pair
    fn prompt_template(&self) -> Result<PromptTemplate> {
        let template = match &self.config.pipeline.prompt_template {
            Some(path) => PromptTemplate::from_file(path)?,
            None => PromptTemplate::entry_translator(),
        };
        Ok(template
            .with_languages(&self.config.source_language_name()?, &self.config.target_language_name()?))
    }

    fn provider(&self) -> ChatApi {
        let p = &self.config.provider;
        ChatApi::new_with_config(
            &p.endpoint,
            &p.model,
            p.max_tokens,
            p.max_retries,
            p.retry_delay_ms,
        )
    }

    /// Extract the translatable plain text of every original entry into
    /// `out_dir`, one `{id}.txt` per entry.
    pub fn extract(&self, out_dir: Option<PathBuf>) -> Result<usize> {
        let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("extracted"));
        FileManager::ensure_dir(&out_dir)?;

        let ids = FileManager::list_entry_ids(&self.config.paths.original_dir, "html")?;
        if ids.is_empty() {
            return Err(anyhow!(
                "No entries found in {:?}",
                self.config.paths.original_dir
            ));
        }

        let extractor = self.extractor();
        let progress = corpus_progress(ids.len() as u64);
        let mut written = 0usize;
        for id in &ids {
            let source = FileManager::entry_path(&self.config.paths.original_dir, id, "html");
            let html = FileManager::read_to_string(&source)?;
            let text = extractor.extract(&html);
            FileManager::write_to_file(FileManager::entry_path(&out_dir, id, "txt"), &text)?;
            written += 1;
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!("Extracted {} entr(ies) into {:?}", written, out_dir);
        Ok(written)
    }

    /// Print the fragment structure of one entry on both sides.
    pub fn split_dump(&self, entry_id: &str) -> Result<()> {
        let original_path =
            FileManager::entry_path(&self.config.paths.original_dir, entry_id, "html");
        let html = FileManager::read_to_string(&original_path)?;

        let splitter = EntrySplitter::with_profile(&self.config.profile);
        let markup_fragments = splitter.split_markup(&html);
        info!("{}: {} markup fragment(s)", entry_id, markup_fragments.len());
        for (i, fragment) in markup_fragments.iter().enumerate() {
            info!("  [{}] {} ({} bytes)", i + 1, fragment.kind, fragment.content.len());
        }

        let text_path = FileManager::entry_path(&self.config.paths.text_dir, entry_id, "txt");
        if FileManager::file_exists(&text_path) {
            let txt = FileManager::read_to_string(&text_path)?;
            let text_fragments = splitter.split_plain(&txt);
            info!("{}: {} text fragment(s)", entry_id, text_fragments.len());
            for (i, fragment) in text_fragments.iter().enumerate() {
                info!("  [{}] {} ({} bytes)", i + 1, fragment.kind, fragment.content.len());
            }
            if markup_fragments.len() == text_fragments.len() && markup_fragments.len() >= 2 {
                info!("{}: counts agree, entry would be processed in fragments", entry_id);
            } else {
                info!("{}: entry would be processed whole", entry_id);
            }
        } else {
            info!("{}: no translated text at {:?}", entry_id, text_path);
        }

        Ok(())
    }

    /// Validate every assembled output against its original and translated
    /// text, without touching the provider.
    pub fn scan(&self) -> Result<ScanSummary> {
        let ids = FileManager::list_entry_ids(&self.config.paths.original_dir, "html")?;
        if ids.is_empty() {
            return Err(anyhow!("No entries found in {:?}", self.config.paths.original_dir));
        }

        let validator = self.validator();
        let progress = corpus_progress(ids.len() as u64);
        let mut summary = ScanSummary::default();

        for id in &ids {
            let output_path = FileManager::entry_path(&self.config.paths.output_dir, id, "html");
            if !FileManager::file_exists(&output_path) {
                summary.missing += 1;
                progress.inc(1);
                continue;
            }
            let original = FileManager::read_to_string(FileManager::entry_path(
                &self.config.paths.original_dir,
                id,
                "html",
            ))?;
            let output = FileManager::read_to_string(&output_path)?;
            let text_path = FileManager::entry_path(&self.config.paths.text_dir, id, "txt");
            let text = if FileManager::file_exists(&text_path) {
                Some(FileManager::read_to_string(&text_path)?)
            } else {
                None
            };

            let issues = validator.validate(&original, &output, text.as_deref());
            if issues.is_empty() {
                summary.clean += 1;
            } else {
                summary.dirty += 1;
                for issue in &issues {
                    warn!("{}: {}", id, issue);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!("Scan finished: {}", summary);
        Ok(summary)
    }

    /// Compare the opaque-script token stream and marker structure of each
    /// translated text document against the one extracted from its
    /// original.
    pub fn check_alignment(&self) -> Result<AlignSummary> {
        let ids = FileManager::list_entry_ids(&self.config.paths.original_dir, "html")?;
        if ids.is_empty() {
            return Err(anyhow!("No entries found in {:?}", self.config.paths.original_dir));
        }

        let extractor = self.extractor();
        let checker = AlignmentChecker::new(&self.config.profile);
        let progress = corpus_progress(ids.len() as u64);
        let mut summary = AlignSummary::default();

        for id in &ids {
            let text_path = FileManager::entry_path(&self.config.paths.text_dir, id, "txt");
            if !FileManager::file_exists(&text_path) {
                summary.missing += 1;
                progress.inc(1);
                continue;
            }
            let original = FileManager::read_to_string(FileManager::entry_path(
                &self.config.paths.original_dir,
                id,
                "html",
            ))?;
            let source_text = extractor.extract(&original);
            let translated_text = FileManager::read_to_string(&text_path)?;

            let issues = checker.check(&source_text, &translated_text);
            if issues.is_empty() {
                summary.aligned += 1;
            } else {
                summary.divergent += 1;
                for issue in &issues {
                    warn!("{}: {}", id, issue);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!("Alignment check finished: {}", summary);
        Ok(summary)
    }

    /// Run the assembly pipeline over the corpus.
    pub async fn run_pipeline(&self, overrides: RunOverrides) -> Result<RunSummary> {
        // Probe the provider in the background; a dead endpoint surfaces
        // here before the first entry fails
        let probe = self.provider();
        tokio::spawn(async move {
            if let Err(e) = probe.test_connection().await {
                warn!("Provider probe failed: {}", e);
            }
        });

        let template = self.prompt_template()?;
        let assembler = Assembler::with_profile(
            self.provider(),
            template,
            self.config.profile.clone(),
            self.config.pipeline.max_attempts,
        );

        let paths = &self.config.paths;
        let options = RunnerOptions {
            original_dir: paths.original_dir.clone(),
            text_dir: paths.text_dir.clone(),
            output_dir: paths.output_dir.clone(),
            ledger_path: paths.ledger_path.clone(),
            clean_cache_path: paths.clean_cache_path.clone(),
            errata_path: paths.errata_path.clone(),
            parallel: overrides.parallel.unwrap_or(self.config.pipeline.parallel),
            limit: overrides.limit,
            shuffle: overrides.shuffle.unwrap_or(self.config.pipeline.shuffle),
            only_ids: overrides.only_ids,
            force: overrides.force,
        };

        info!(
            "🚀 {} -> {} via {} ({})",
            self.config.source_language_name()?,
            self.config.target_language_name()?,
            self.config.provider.endpoint,
            self.config.provider.model
        );
        PipelineRunner::new(assembler, options).run().await
    }
}
