/*!
 * Integration tests for the chunked assembly workflow
 */

use std::fs;
use anyhow::Result;

use lexitra::ledger::RunLedger;
use lexitra::pipeline::{Assembler, EntryStatus, PipelineRunner, PromptTemplate};
use lexitra::profile::ScriptProfile;
use lexitra::providers::MockProvider;
use crate::common;

fn assembler_with(provider: MockProvider, max_attempts: u32) -> Assembler<MockProvider> {
    Assembler::with_profile(
        provider,
        PromptTemplate::entry_translator().with_languages("English", "French"),
        ScriptProfile::default(),
        max_attempts,
    )
}

/// Tests the full chunked path: split, generate per fragment, validate,
/// assemble, and record the clean result
#[tokio::test]
async fn test_chunkedRun_withCompliantProvider_shouldAssembleCleanEntry() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::seed_entry_23(&root)?;

    // 1. Run the pipeline with a provider that returns each fragment wrapped
    let provider = MockProvider::scripted(common::entry_23_clean_script());
    let runner =
        PipelineRunner::new(assembler_with(provider.clone(), 3), common::runner_options(&root));
    let summary = runner.run().await?;

    // 2. One clean entry, one request per fragment
    assert_eq!(summary.clean, 1, "Summary was: {}", summary);
    assert_eq!(summary.errors, 0);
    assert_eq!(provider.request_count(), 3, "Three fragments, no retries");

    // 3. The output file carries the translated fragments in order
    let output = fs::read_to_string(root.join("fr").join("23.html"))?;
    assert!(output.contains("<primary>pleurer</primary>"));
    assert!(output.contains("se lamenter"));
    assert!(output.contains("provoquer le deuil"));
    assert!(output.contains("\u{05D0}\u{05D1}\u{05DC}"), "Script runs must survive assembly");
    assert!(output.ends_with("</body></html>"));

    // 4. The ledger row is CLEAN with no issue count
    let records = RunLedger::new(root.join("results.csv")).load()?;
    assert_eq!(records["23"].status, EntryStatus::Clean);
    assert_eq!(records["23"].severity, None);

    // 5. The clean cache holds the entry against the result hash
    let cache = fs::read_to_string(root.join("clean.txt"))?;
    assert_eq!(cache.lines().count(), 1);
    assert!(cache.starts_with("23 "));
    Ok(())
}

/// Tests that a rerun over an unchanged corpus resolves from the clean
/// cache, with the multi-fragment output hashing back to the cached value
#[tokio::test]
async fn test_chunkedRun_secondRun_shouldResolveFromCleanCache() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::seed_entry_23(&root)?;

    // 1. First run assembles the entry clean
    let first = MockProvider::scripted(common::entry_23_clean_script());
    PipelineRunner::new(assembler_with(first, 3), common::runner_options(&root)).run().await?;

    // 2. Nothing changed on disk, so a second run must not call the provider
    let second = MockProvider::failing();
    let summary =
        PipelineRunner::new(assembler_with(second.clone(), 3), common::runner_options(&root))
            .run()
            .await?;

    assert_eq!(summary.cached, 1, "Summary was: {}", summary);
    assert_eq!(summary.processed(), 0);
    assert_eq!(second.request_count(), 0, "Cached entries bypass the provider");
    Ok(())
}

/// Tests that a fragment which keeps failing validation is retried, then
/// replaced by its original markup in the assembled file
#[tokio::test]
async fn test_chunkedRun_withDegradedFragment_shouldKeepOriginalAndRecordFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::seed_entry_23(&root)?;

    // The middle fragment loses its reference and script run on both tries
    let bad = common::wrapped("<div class=\"stem\"><p>Qal. <descrip>mauvais</descrip></p></div>");
    let provider = MockProvider::scripted(vec![
        common::wrapped(common::ENTRY_23_FR_HEADER),
        bad.clone(),
        bad,
        common::wrapped(common::ENTRY_23_FR_STEM_HIPHIL),
    ]);
    let runner =
        PipelineRunner::new(assembler_with(provider.clone(), 2), common::runner_options(&root));
    let summary = runner.run().await?;

    assert_eq!(summary.failed, 1, "Summary was: {}", summary);
    assert_eq!(provider.request_count(), 4, "The degraded fragment is retried once");

    // The failed slot falls back to the original stem; the rest stays
    // translated
    let output = fs::read_to_string(root.join("fr").join("23.html"))?;
    assert!(output.contains("<descrip>lament</descrip>"), "Original stem should survive");
    assert!(output.contains("<primary>pleurer</primary>"));
    assert!(output.contains("provoquer le deuil"));

    // The ledger row names the fragment and the findings
    let records = RunLedger::new(root.join("results.csv")).load()?;
    assert_eq!(records["23"].status, EntryStatus::Failed);
    assert!(records["23"].severity.unwrap_or(0) >= 1);
    let note = records["23"].note.clone().unwrap_or_default();
    assert!(note.contains("fragment 2/3"), "Note was: {}", note);
    assert!(note.contains("missing Hebrew/Aramaic"), "Note was: {}", note);

    // Nothing lands in the clean cache
    assert!(!root.join("clean.txt").exists());
    Ok(())
}

/// Tests that an errata declaration is logged verbatim and does not fail
/// the run
#[tokio::test]
async fn test_chunkedRun_withErrataFragment_shouldLogDefectAndKeepOriginal() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::seed_entry_23(&root)?;

    // 1. The provider declares the middle fragment defective
    let provider = MockProvider::scripted(vec![
        common::wrapped(common::ENTRY_23_FR_HEADER),
        ">>> ERRATA: stem block garbled in source".to_string(),
        common::wrapped(common::ENTRY_23_FR_STEM_HIPHIL),
    ]);
    let runner =
        PipelineRunner::new(assembler_with(provider.clone(), 3), common::runner_options(&root));
    let summary = runner.run().await?;

    // 2. Errata is a deliberate verdict, not a failure to retry
    assert_eq!(summary.errata, 1, "Summary was: {}", summary);
    assert_eq!(summary.failed, 0);
    assert_eq!(provider.request_count(), 3, "A declared defect is not retried");

    // 3. The defect lands in the errata log with its fragment position
    let errata = fs::read_to_string(root.join("errata.log"))?;
    assert_eq!(errata, "23:2/3 html stem block garbled in source\n");

    // 4. The ledger records the verdict; the file keeps the original stem
    let records = RunLedger::new(root.join("results.csv")).load()?;
    assert_eq!(records["23"].status, EntryStatus::Errata);

    let output = fs::read_to_string(root.join("fr").join("23.html"))?;
    assert!(output.contains("<descrip>lament</descrip>"));
    assert!(output.contains("<primary>pleurer</primary>"));
    Ok(())
}
