/*!
 * Corpus runner.
 *
 * Walks the original-entry directory, pairs each entry with its translated
 * plain text and any output of a previous run, and drives the assembler
 * over the set with bounded concurrency. Results land in three places per
 * entry: the output file, a ledger row, and errata log lines. Entries whose
 * inputs are unchanged since they last validated clean are skipped through
 * the clean cache.
 *
 * A first interrupt stops dispatching new entries and lets in-flight ones
 * finish; a second interrupt aborts the process.
 */

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::fmt;

use anyhow::Result;
use futures::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use rand::seq::SliceRandom;

use crate::file_utils::FileManager;
use crate::ledger::{entry_hash, CleanCache, RunLedger, RunRecord};
use crate::pipeline::assembler::{Assembler, EntryWork};
use crate::pipeline::EntryStatus;
use crate::providers::Provider;

/// Everything one corpus run needs to know
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Directory of original entry markup (`{id}.html`)
    pub original_dir: PathBuf,
    /// Directory of translated plain text (`{id}.txt`)
    pub text_dir: PathBuf,
    /// Directory the assembled output is written to (`{id}.html`)
    pub output_dir: PathBuf,
    /// Ledger file recording per-entry results
    pub ledger_path: PathBuf,
    /// Clean-cache file
    pub clean_cache_path: PathBuf,
    /// Errata log file
    pub errata_path: PathBuf,
    /// Entries processed concurrently
    pub parallel: usize,
    /// Process at most this many entries
    pub limit: Option<usize>,
    /// Shuffle entries before applying the limit
    pub shuffle: bool,
    /// Restrict the run to these entry ids; empty means all
    pub only_ids: Vec<String>,
    /// Reprocess entries the clean cache would skip
    pub force: bool,
}

/// Counts of one finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub clean: usize,
    pub failed: usize,
    pub errata: usize,
    pub skipped: usize,
    /// Entries skipped through the clean cache
    pub cached: usize,
    /// Entries that could not be read or written
    pub errors: usize,
    /// Whether the run was interrupted before dispatching every entry
    pub interrupted: bool,
}

impl RunSummary {
    /// Entries that went through the assembler
    pub fn processed(&self) -> usize {
        self.clean + self.failed + self.errata + self.skipped
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} clean, {} failed, {} errata, {} skipped, {} cached, {} error(s)",
            self.clean, self.failed, self.errata, self.skipped, self.cached, self.errors
        )?;
        if self.interrupted {
            write!(f, ", interrupted")?;
        }
        Ok(())
    }
}

enum EntryResult {
    Done(EntryStatus),
    Cached,
    Stopped,
    Faulted,
}

/// Duration as `XhYYm` above an hour, `XmYYs` below
pub(crate) fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}

/// Runs the assembler over a corpus directory
pub struct PipelineRunner<P: Provider> {
    assembler: Arc<Assembler<P>>,
    options: Arc<RunnerOptions>,
}

impl<P: Provider> PipelineRunner<P> {
    pub fn new(assembler: Assembler<P>, options: RunnerOptions) -> Self {
        PipelineRunner { assembler: Arc::new(assembler), options: Arc::new(options) }
    }

    /// Select and order the entries this run will process
    fn select_entries(&self) -> Result<Vec<String>> {
        let mut ids = FileManager::list_entry_ids(&self.options.original_dir, "html")?;
        if !self.options.only_ids.is_empty() {
            ids.retain(|id| self.options.only_ids.contains(id));
        }
        if self.options.shuffle {
            ids.shuffle(&mut rand::rng());
        }
        if let Some(limit) = self.options.limit {
            ids.truncate(limit);
        }
        Ok(ids)
    }

    /// Process the corpus. Returns counts; per-entry results are written
    /// as they complete.
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        FileManager::ensure_dir(&self.options.output_dir)?;

        let ids = self.select_entries()?;
        if ids.is_empty() {
            info!("No entries to process in {:?}", self.options.original_dir);
            return Ok(RunSummary::default());
        }
        let total = ids.len();
        info!("Processing {} entr(ies), {} in parallel", total, self.options.parallel.max(1));

        let ledger = Arc::new(RunLedger::new(&self.options.ledger_path));
        let cache = Arc::new(CleanCache::load(&self.options.clean_cache_path));

        let running = Arc::new(AtomicBool::new(true));
        let watcher = {
            let running = running.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, finishing in-flight entries (interrupt again to abort)");
                    running.store(false, Ordering::SeqCst);
                    if tokio::signal::ctrl_c().await.is_ok() {
                        warn!("Second interrupt, aborting");
                        std::process::exit(130);
                    }
                }
            })
        };

        let progress = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));

        let completed = Arc::new(AtomicUsize::new(0));
        // The first entry pays for provider warmup; the ETA averages over
        // the entries after it
        let post_warmup: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));

        let results = stream::iter(ids.into_iter())
            .map(|id| {
                let assembler = self.assembler.clone();
                let options = self.options.clone();
                let ledger = ledger.clone();
                let cache = cache.clone();
                let running = running.clone();
                let progress = progress.clone();
                let completed = completed.clone();
                let post_warmup = post_warmup.clone();

                async move {
                    if !running.load(Ordering::SeqCst) {
                        return EntryResult::Stopped;
                    }
                    let result = process_one(id, assembler, options, ledger, cache).await;

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress.inc(1);
                    let mut warmup = post_warmup.lock();
                    match *warmup {
                        None => *warmup = Some(Instant::now()),
                        Some(since) if done > 1 && done < total => {
                            let avg = since.elapsed() / (done - 1) as u32;
                            let remaining = avg * (total - done) as u32;
                            progress.set_message(format!("ETA {}", format_duration(remaining)));
                        }
                        _ => {}
                    }
                    result
                }
            })
            .buffer_unordered(self.options.parallel.max(1))
            .collect::<Vec<_>>()
            .await;

        watcher.abort();
        progress.finish_and_clear();

        let mut summary = RunSummary { interrupted: !running.load(Ordering::SeqCst), ..Default::default() };
        for result in results {
            match result {
                EntryResult::Done(EntryStatus::Clean) => summary.clean += 1,
                EntryResult::Done(EntryStatus::Failed) => summary.failed += 1,
                EntryResult::Done(EntryStatus::Errata) => summary.errata += 1,
                EntryResult::Done(EntryStatus::Skipped) => summary.skipped += 1,
                // The assembler never returns an in-flight status
                EntryResult::Done(EntryStatus::Pending) => {}
                EntryResult::Cached => summary.cached += 1,
                EntryResult::Faulted => summary.errors += 1,
                EntryResult::Stopped => {}
            }
        }

        info!("Run finished in {}: {}", format_duration(started.elapsed()), summary);
        Ok(summary)
    }
}

async fn process_one<P: Provider>(
    id: String,
    assembler: Arc<Assembler<P>>,
    options: Arc<RunnerOptions>,
    ledger: Arc<RunLedger>,
    cache: Arc<CleanCache>,
) -> EntryResult {
    let original_path = FileManager::entry_path(&options.original_dir, &id, "html");
    let text_path = FileManager::entry_path(&options.text_dir, &id, "txt");
    let output_path = FileManager::entry_path(&options.output_dir, &id, "html");

    if !FileManager::file_exists(&text_path) {
        warn!("{}: no translated text document at {:?}", id, text_path);
        return EntryResult::Faulted;
    }
    let original_html = match FileManager::read_to_string(&original_path) {
        Ok(content) => content,
        Err(e) => {
            error!("{}: {}", id, e);
            return EntryResult::Faulted;
        }
    };
    let translated_txt = match FileManager::read_to_string(&text_path) {
        Ok(content) => content,
        Err(e) => {
            error!("{}: {}", id, e);
            return EntryResult::Faulted;
        }
    };
    let previous_output = if FileManager::file_exists(&output_path) {
        FileManager::read_to_string(&output_path).ok()
    } else {
        None
    };

    let input_hash =
        entry_hash(&original_html, &translated_txt, previous_output.as_deref().unwrap_or(""));
    if !options.force && cache.contains(&id, &input_hash) {
        debug!("{}: unchanged since last clean result", id);
        return EntryResult::Cached;
    }

    let work = EntryWork {
        id: id.clone(),
        original_html: original_html.clone(),
        translated_txt: translated_txt.clone(),
        previous_output,
    };
    let outcome = assembler.process_entry(&work).await;

    if let Some(output) = &outcome.output {
        if let Err(e) = FileManager::write_to_file(&output_path, output) {
            error!("{}: failed to write output: {}", id, e);
            return EntryResult::Faulted;
        }
    }
    for line in &outcome.errata {
        if let Err(e) = FileManager::append_line(&options.errata_path, line) {
            warn!("{}: failed to append errata line: {}", id, e);
        }
    }

    let severity = (!outcome.issues.is_empty()).then_some(outcome.issues.len());
    let note = (!outcome.issues.is_empty()).then(|| outcome.issues.join("; "));
    let result_hash =
        entry_hash(&original_html, &translated_txt, outcome.output.as_deref().unwrap_or(""));
    let record = RunRecord::new(&id, outcome.status, severity, &result_hash, note);
    if let Err(e) = ledger.append(&record) {
        error!("{}: failed to append ledger row: {}", id, e);
    }

    match outcome.status {
        EntryStatus::Clean => {
            info!("{}: CLEAN after {} request(s)", id, outcome.attempts);
            if let Err(e) = cache.insert(&id, &result_hash) {
                warn!("{}: failed to update clean cache: {}", id, e);
            }
        }
        EntryStatus::Failed => {
            warn!("{}: FAILED with {} issue(s)", id, outcome.issues.len());
        }
        EntryStatus::Errata => {
            info!("{}: ERRATA ({} line(s))", id, outcome.errata.len());
        }
        EntryStatus::Skipped => {
            warn!("{}: SKIPPED (entry does not fit the provider context)", id);
        }
        EntryStatus::Pending => {}
    }

    EntryResult::Done(outcome.status)
}
