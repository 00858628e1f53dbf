/*!
 * Assembly pipeline: turn translated plain text back into entry markup.
 *
 * For each entry the pipeline has the original HTML and the authoritative
 * translated plain text. It splits both into aligned fragments, asks the
 * generation service to merge each pair, validates every generated
 * fragment, retries rejected ones with the findings quoted back, and
 * concatenates the passing fragments into the translated entry. It is
 * split into several submodules:
 *
 * - `prompts`: prompt templates and the per-attempt prompt builder
 * - `chunking`: fragment wrapping/unwrapping and response cleanup
 * - `assembler`: per-entry processing with retries and warm start
 * - `runner`: bounded-parallel processing of the work list
 */

use std::fmt;

// Re-export main types for easier usage
pub use self::assembler::{Assembler, EntryOutcome, EntryWork};
pub use self::prompts::{AttemptRecord, PromptBuilder, PromptTemplate};
pub use self::runner::{PipelineRunner, RunSummary, RunnerOptions};

// Submodules
pub mod assembler;
pub mod chunking;
pub mod prompts;
pub mod runner;

/// Final state of one processed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    /// Output produced and every check passed
    Clean,
    /// Output produced but at least one check still fails
    Failed,
    /// The generation service declared the source entry defective
    Errata,
    /// Not processed; the entry exceeds the service's context window
    Skipped,
    /// Not yet processed
    Pending,
}

impl EntryStatus {
    /// Ledger spelling of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Clean => "CLEAN",
            EntryStatus::Failed => "FAILED",
            EntryStatus::Errata => "ERRATA",
            EntryStatus::Skipped => "SKIPPED",
            EntryStatus::Pending => "PENDING",
        }
    }

    /// Parse a ledger status field
    pub fn parse(s: &str) -> Option<EntryStatus> {
        match s {
            "CLEAN" => Some(EntryStatus::Clean),
            "FAILED" => Some(EntryStatus::Failed),
            "ERRATA" => Some(EntryStatus::Errata),
            "SKIPPED" => Some(EntryStatus::Skipped),
            "PENDING" => Some(EntryStatus::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
