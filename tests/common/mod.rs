/*!
 * Common test utilities for the lexitra test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use lexitra::app_config::Config;
use lexitra::pipeline::chunking::{WRAPPER_HEAD, WRAPPER_TAIL};
use lexitra::pipeline::RunnerOptions;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

// Fixture entry 23: a small but structurally complete dictionary entry.
// It splits into three fragments (header plus two stem blocks) on both
// sides, so the pipeline processes it in chunks. The Hebrew runs are
// aleph-bet-lamed and two derived spellings.

/// Original HTML of fixture entry 23
pub const ENTRY_23_HTML: &str = concat!(
    "<html><head><title>BDB 23</title></head><body>\n",
    "<entry>23</entry>\n",
    "<h1>[<bdbheb>\u{05D0}\u{05D1}\u{05DC}</bdbheb>]</h1>\n",
    "<p><pos>vb.</pos> <primary>mourn</primary> <lookup>BDB</lookup></p>\n",
    "<div class=\"stem\"><p>Qal. <descrip>lament</descrip> <ref ref=\"Isa 19:8\">Isa 19:8</ref> ",
    "<bdbheb>\u{05D0}\u{05D1}\u{05DC}\u{05D5}</bdbheb></p></div>\n",
    "<div class=\"stem\"><p>Hiph`il. <descrip>cause mourning</descrip> ",
    "<bdbarc>\u{05D0}\u{05D1}\u{05DC}\u{05D0}</bdbarc> &amp; more</p></div>\n",
    "</body></html>\n",
);

/// Translated plain text of fixture entry 23, with split markers mirroring
/// the stem structure of the HTML
pub const ENTRY_23_TXT: &str = concat!(
    "=== 23 ===\n",
    "[\u{05D0}\u{05D1}\u{05DC}]\n",
    "vb. pleurer BDB\n",
    "@@SPLIT:stem@@\n",
    "Qal. se lamenter Isa 19:8 \u{05D0}\u{05D1}\u{05DC}\u{05D5}\n",
    "@@SPLIT:stem@@\n",
    "Hiph`il. provoquer le deuil \u{05D0}\u{05D1}\u{05DC}\u{05D0} et plus\n",
);

/// Translated header fragment a well-behaved generation service would return
pub const ENTRY_23_FR_HEADER: &str = concat!(
    "<html><head><title>BDB 23</title></head><body>\n",
    "<entry>23</entry>\n",
    "<h1>[<bdbheb>\u{05D0}\u{05D1}\u{05DC}</bdbheb>]</h1>\n",
    "<p><pos>vb.</pos> <primary>pleurer</primary> <lookup>BDB</lookup></p>",
);

/// Translated Qal stem fragment
pub const ENTRY_23_FR_STEM_QAL: &str = concat!(
    "<div class=\"stem\"><p>Qal. <descrip>se lamenter</descrip> <ref ref=\"Isa 19:8\">Isa 19:8</ref> ",
    "<bdbheb>\u{05D0}\u{05D1}\u{05DC}\u{05D5}</bdbheb></p></div>",
);

/// Translated Hiph`il stem fragment, carrying the trailing document close
/// just like the original's last fragment does
pub const ENTRY_23_FR_STEM_HIPHIL: &str = concat!(
    "<div class=\"stem\"><p>Hiph`il. <descrip>provoquer le deuil</descrip> ",
    "<bdbarc>\u{05D0}\u{05D1}\u{05DC}\u{05D0}</bdbarc> &amp; plus</p></div>\n",
    "</body></html>",
);

/// Wraps a fragment body between the chunk sentinels, the way a compliant
/// generation service echoes them back
pub fn wrapped(body: &str) -> String {
    format!("{}\n{}\n{}", WRAPPER_HEAD, body, WRAPPER_TAIL)
}

/// The three responses that assemble fixture entry 23 cleanly, in the order
/// the pipeline requests them
pub fn entry_23_clean_script() -> Vec<String> {
    vec![
        wrapped(ENTRY_23_FR_HEADER),
        wrapped(ENTRY_23_FR_STEM_QAL),
        wrapped(ENTRY_23_FR_STEM_HIPHIL),
    ]
}

/// Writes fixture entry 23 into `orig/` and `txt/` under the given root
pub fn seed_entry_23(root: &PathBuf) -> Result<()> {
    let orig_dir = root.join("orig");
    let text_dir = root.join("txt");
    fs::create_dir_all(&orig_dir)?;
    fs::create_dir_all(&text_dir)?;
    fs::write(orig_dir.join("23.html"), ENTRY_23_HTML)?;
    fs::write(text_dir.join("23.txt"), ENTRY_23_TXT)?;
    Ok(())
}

/// Runner options rooted in the given directory, sequential and unshuffled
pub fn runner_options(root: &PathBuf) -> RunnerOptions {
    RunnerOptions {
        original_dir: root.join("orig"),
        text_dir: root.join("txt"),
        output_dir: root.join("fr"),
        ledger_path: root.join("results.csv"),
        clean_cache_path: root.join("clean.txt"),
        errata_path: root.join("errata.log"),
        parallel: 1,
        limit: None,
        shuffle: false,
        only_ids: Vec::new(),
        force: false,
    }
}

/// A default configuration with every path rooted in the given directory
pub fn test_config(root: &PathBuf) -> Config {
    let mut config = Config::default();
    config.paths.original_dir = root.join("orig");
    config.paths.text_dir = root.join("txt");
    config.paths.output_dir = root.join("fr");
    config.paths.ledger_path = root.join("results.csv");
    config.paths.clean_cache_path = root.join("clean.txt");
    config.paths.errata_path = root.join("errata.log");
    config
}
