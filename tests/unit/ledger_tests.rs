/*!
 * Tests for the run ledger and the clean cache
 */

use anyhow::Result;
use lexitra::ledger::{entry_hash, CleanCache, RunLedger, RunRecord};
use lexitra::pipeline::EntryStatus;
use crate::common;

/// Tests that the newest row wins even across the two row formats
#[test]
fn test_load_withMixedRowFormats_shouldKeepNewestPerEntry() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir_path = temp_dir.path().to_path_buf();

    // An old-style four-field row for entry 23 and one for entry 7
    let ledger_path = common::create_test_file(
        &dir_path,
        "results.csv",
        concat!(
            "# entry, status, issues, timestamp, hash, note\n",
            "23,       FAILED,   2026-01-02T10:00:00, aaaa1111\n",
            "7,        CLEAN,    2026-01-02T10:00:01, bbbb2222\n",
        ),
    )?;

    // A newer full row for entry 23 supersedes the old one
    let ledger = RunLedger::new(&ledger_path);
    ledger.append(&RunRecord::new("23", EntryStatus::Clean, None, "cccc3333", None))?;

    let records = ledger.load()?;
    assert_eq!(records.len(), 2);
    assert_eq!(records["23"].status, EntryStatus::Clean);
    assert_eq!(records["23"].hash, "cccc3333");
    // The legacy row parses without an issue count
    assert_eq!(records["7"].severity, None);
    assert_eq!(records["7"].hash, "bbbb2222");
    Ok(())
}

/// Tests that notes keep their commas through a write/read cycle
#[test]
fn test_append_withCommaInNote_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let ledger = RunLedger::new(temp_dir.path().join("results.csv"));

    let note = "fragment 2/3: missing ref, missing Hebrew/Aramaic";
    ledger.append(&RunRecord::new(
        "23",
        EntryStatus::Failed,
        Some(2),
        "aaaa1111",
        Some(note.to_string()),
    ))?;

    let records = ledger.load()?;
    assert_eq!(records["23"].note.as_deref(), Some(note));
    assert_eq!(records["23"].severity, Some(2));
    Ok(())
}

/// Tests that the header comment is written once, on file creation
#[test]
fn test_append_calledTwice_shouldWriteOneHeader() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let ledger_path = temp_dir.path().join("results.csv");
    let ledger = RunLedger::new(&ledger_path);

    ledger.append(&RunRecord::new("1", EntryStatus::Clean, None, "aaaa1111", None))?;
    ledger.append(&RunRecord::new("2", EntryStatus::Clean, None, "bbbb2222", None))?;

    let content = std::fs::read_to_string(&ledger_path)?;
    assert!(content.starts_with("# entry, status, issues, timestamp, hash, note\n"));
    assert_eq!(content.lines().filter(|l| l.starts_with('#')).count(), 1);
    Ok(())
}

/// Tests that the input hash reacts to each of its three inputs
#[test]
fn test_entryHash_withEachInputChanged_shouldDiffer() -> Result<()> {
    let base = entry_hash("orig", "txt", "out");
    assert_eq!(base.len(), 8);
    assert!(base.chars().all(|c| c.is_ascii_hexdigit()));

    assert_ne!(base, entry_hash("orig2", "txt", "out"));
    assert_ne!(base, entry_hash("orig", "txt2", "out"));
    assert_ne!(base, entry_hash("orig", "txt", "out2"));
    // No previous output hashes differently from some previous output
    assert_ne!(entry_hash("orig", "txt", ""), base);
    Ok(())
}

/// Tests that cache hits require the exact recorded hash
#[test]
fn test_cleanCache_contains_shouldRequireExactHash() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let cache_path = temp_dir.path().join("clean.txt");

    let cache = CleanCache::load(&cache_path);
    assert!(cache.is_empty());
    cache.insert("23", "aaaa1111")?;

    assert!(cache.contains("23", "aaaa1111"));
    assert!(!cache.contains("23", "bbbb2222"), "A different hash must miss");
    assert!(!cache.contains("24", "aaaa1111"), "A different entry must miss");
    assert_eq!(cache.len(), 1);
    Ok(())
}
