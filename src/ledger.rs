/*!
 * Run ledger and clean cache.
 *
 * The ledger is an append-only CSV of per-entry results; re-processing an
 * entry appends a new row rather than rewriting history, and loading keeps
 * the newest row per entry. Rows carry the entry id, status, an optional
 * issue count, a UTC timestamp, a short input hash and an optional quoted
 * note. Older ledgers wrote rows without the issue-count column; both
 * shapes load.
 *
 * The clean cache records which entries already validated clean against
 * which inputs, keyed by the same short hash, so unchanged entries are not
 * re-validated run after run. The cache discards itself when the running
 * executable is newer than the cache file.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::file_utils::FileManager;
use crate::pipeline::EntryStatus;

/// Timestamp format used in ledger rows
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Notes longer than this are truncated before writing
const NOTE_MAX_CHARS: usize = 16384;

/// One ledger row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    /// Entry identifier (file stem)
    pub entry_id: String,
    /// Result status
    pub status: EntryStatus,
    /// Number of outstanding issues, written for non-clean rows
    pub severity: Option<usize>,
    /// UTC timestamp of the run that produced the row
    pub timestamp: String,
    /// Short hash of the inputs the result was computed over
    pub hash: String,
    /// Free-form detail, quoted in the file
    pub note: Option<String>,
}

impl RunRecord {
    /// Record stamped with the current UTC time
    pub fn new(
        entry_id: impl Into<String>,
        status: EntryStatus,
        severity: Option<usize>,
        hash: impl Into<String>,
        note: Option<String>,
    ) -> Self {
        RunRecord {
            entry_id: entry_id.into(),
            status,
            severity,
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            hash: hash.into(),
            note,
        }
    }
}

/// Short hash identifying one entry's input state: the original markup,
/// the translated plain text and the current output
pub fn entry_hash(original_html: &str, translated_txt: &str, output: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(original_html.as_bytes());
    hasher.update(translated_txt.as_bytes());
    hasher.update(output.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..8].to_string()
}

fn sanitize_note(note: &str) -> String {
    let cleaned: String = note
        .chars()
        .map(|c| match c {
            '"' => '\'',
            '\n' | '\r' | '\t' => ' ',
            c => c,
        })
        .collect();
    if cleaned.chars().count() > NOTE_MAX_CHARS {
        cleaned.chars().take(NOTE_MAX_CHARS).collect()
    } else {
        cleaned
    }
}

fn format_record(record: &RunRecord) -> String {
    let mut line = format!(
        "{:<9} {:<8}",
        format!("{},", record.entry_id),
        format!("{},", record.status.as_str())
    );
    if let Some(severity) = record.severity {
        line.push_str(&format!(" {:>3},", severity));
    }
    line.push_str(&format!(" {}, {}", record.timestamp, record.hash));
    if let Some(note) = &record.note {
        line.push_str(&format!(", \"{}\"", sanitize_note(note)));
    }
    line
}

fn parse_line(line: &str) -> Option<RunRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    // The note is the only field that may contain commas; split it off
    // by its opening quote before splitting the rest
    let (head, note) = match trimmed.find(", \"") {
        Some(pos) if trimmed.ends_with('"') && pos + 3 < trimmed.len() => {
            let note = trimmed[pos + 3..trimmed.len() - 1].to_string();
            (&trimmed[..pos], Some(note))
        }
        _ => (trimmed, None),
    };

    let fields: Vec<&str> = head.split(',').map(str::trim).collect();
    if fields.len() < 4 {
        return None;
    }

    let entry_id = fields[0].to_string();
    let status = EntryStatus::parse(fields[1])?;

    // Rows without the issue-count column put the timestamp third;
    // timestamps never parse as a bare integer
    let (severity, rest): (Option<usize>, &[&str]) = match fields[2].parse::<usize>() {
        Ok(severity) if fields.len() >= 5 => (Some(severity), &fields[3..]),
        _ => (None, &fields[2..]),
    };
    if rest.len() < 2 {
        return None;
    }

    Some(RunRecord {
        entry_id,
        status,
        severity,
        timestamp: rest[0].to_string(),
        hash: rest[1].to_string(),
        note,
    })
}

/// Append-only record of per-entry results
pub struct RunLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RunLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        RunLedger { path: path.as_ref().to_path_buf(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the newest record per entry. A missing ledger is an empty one.
    pub fn load(&self) -> Result<HashMap<String, RunRecord>> {
        let mut records = HashMap::new();
        if !FileManager::file_exists(&self.path) {
            return Ok(records);
        }
        let content = FileManager::read_to_string(&self.path)?;
        for line in content.lines() {
            if let Some(record) = parse_line(line) {
                records.insert(record.entry_id.clone(), record);
            } else if !line.trim().is_empty() && !line.trim_start().starts_with('#') {
                warn!("Skipping unparseable ledger row: {}", line.trim());
            }
        }
        debug!("Loaded {} ledger record(s) from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Append one record. The header comment is written when the file is
    /// first created.
    pub fn append(&self, record: &RunRecord) -> Result<()> {
        let _guard = self.write_lock.lock();
        if !FileManager::file_exists(&self.path) {
            FileManager::append_line(&self.path, "# entry, status, issues, timestamp, hash, note")?;
        }
        FileManager::append_line(&self.path, &format_record(record))
    }
}

/// Entries known to validate clean against a given input hash
pub struct CleanCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl CleanCache {
    /// Load the cache, discarding it when the running executable is newer
    /// than the cache file (the validation rules may have changed).
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let exe_mtime = std::env::current_exe()
            .ok()
            .and_then(|exe| FileManager::modified_time(exe).ok());
        Self::load_guarded(path, exe_mtime)
    }

    pub(crate) fn load_guarded<P: AsRef<Path>>(
        path: P,
        invalidate_after: Option<SystemTime>,
    ) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut entries = HashMap::new();

        if FileManager::file_exists(&path) {
            let stale = match (invalidate_after, FileManager::modified_time(&path)) {
                (Some(exe_mtime), Ok(cache_mtime)) => cache_mtime <= exe_mtime,
                _ => false,
            };
            if stale {
                info!("Clean cache {:?} predates this executable, discarding it", path);
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!("Failed to remove stale clean cache {:?}: {}", path, e);
                }
            } else if let Ok(content) = FileManager::read_to_string(&path) {
                for line in content.lines() {
                    let mut parts = line.split_whitespace();
                    if let (Some(id), Some(hash)) = (parts.next(), parts.next()) {
                        entries.insert(id.to_string(), hash.to_string());
                    }
                }
                debug!("Loaded {} clean-cache entr(ies) from {:?}", entries.len(), path);
            }
        }

        CleanCache { path, entries: Mutex::new(entries) }
    }

    /// Whether the entry is cached clean against exactly this hash
    pub fn contains(&self, entry_id: &str, hash: &str) -> bool {
        self.entries.lock().get(entry_id).is_some_and(|cached| cached == hash)
    }

    /// Record an entry as clean against this hash
    pub fn insert(&self, entry_id: &str, hash: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        if entries.get(entry_id).is_some_and(|cached| cached == hash) {
            return Ok(());
        }
        entries.insert(entry_id.to_string(), hash.to_string());
        FileManager::append_line(&self.path, &format!("{} {}", entry_id, hash))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
