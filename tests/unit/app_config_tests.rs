/*!
 * Tests for configuration loading, saving and validation
 */

use anyhow::Result;
use lexitra::app_config::{Config, LogLevel};
use crate::common;

/// Tests that a saved configuration loads back with every field intact
#[test]
fn test_saveAndFromFile_withCustomValues_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    // Build a configuration that differs from the defaults
    let mut config = Config::default();
    config.target_language = "de".to_string();
    config.provider.model = "mistral-small".to_string();
    config.provider.max_tokens = 2048;
    config.pipeline.parallel = 4;
    config.log_level = LogLevel::Debug;
    config.save(&config_path)?;

    // Load it back and compare
    let loaded = Config::from_file(&config_path)?;
    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.provider.model, "mistral-small");
    assert_eq!(loaded.provider.max_tokens, 2048);
    assert_eq!(loaded.pipeline.parallel, 4);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// Tests that load_or_create keeps an existing file instead of overwriting it
#[test]
fn test_loadOrCreate_withExistingFile_shouldLoadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.provider.endpoint = "http://127.0.0.1:8080".to_string();
    config.save(&config_path)?;

    let loaded = Config::load_or_create(&config_path)?;
    assert_eq!(loaded.provider.endpoint, "http://127.0.0.1:8080");
    Ok(())
}

/// Tests that the default configuration passes validation
#[test]
fn test_validate_withDefaults_shouldPass() -> Result<()> {
    let config = Config::default();
    assert!(config.validate().is_ok(), "Default config should be valid");
    Ok(())
}

/// Tests that validation rejects an unknown language code
#[test]
fn test_validate_withBadLanguage_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.target_language = "zz".to_string();
    assert!(config.validate().is_err(), "Unknown language code should fail validation");
    Ok(())
}

/// Tests that validation rejects an empty provider model
#[test]
fn test_validate_withEmptyModel_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.provider.model = "  ".to_string();
    assert!(config.validate().is_err(), "Blank model name should fail validation");
    Ok(())
}

/// Tests that validation rejects zero parallelism and zero attempts
#[test]
fn test_validate_withZeroKnobs_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.pipeline.parallel = 0;
    assert!(config.validate().is_err(), "parallel = 0 should fail validation");

    let mut config = Config::default();
    config.pipeline.max_attempts = 0;
    assert!(config.validate().is_err(), "max_attempts = 0 should fail validation");
    Ok(())
}

/// Tests that validation rejects an inverted size ratio window
#[test]
fn test_validate_withInvertedRatioWindow_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.profile.size_ratio_min = 1.5;
    config.profile.size_ratio_max = 0.9;
    assert!(config.validate().is_err(), "Inverted ratio window should fail validation");
    Ok(())
}

/// Tests that log levels serialize in lowercase
#[test]
fn test_logLevel_serialization_shouldBeLowercase() -> Result<()> {
    let json = serde_json::to_string(&LogLevel::Warn)?;
    assert_eq!(json, "\"warn\"");
    let parsed: LogLevel = serde_json::from_str("\"trace\"")?;
    assert_eq!(parsed, LogLevel::Trace);
    Ok(())
}
