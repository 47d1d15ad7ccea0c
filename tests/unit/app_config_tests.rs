use booktrans::app_config::{Config, LogLevel};
use tempfile::tempdir;

#[test]
fn test_defaultConfig_shouldCarryPinnedDefaults() {
    let config = Config::default();

    assert_eq!(config.generation.model, "exaone3.5:7.8b");
    assert_eq!(config.generation.endpoint, "http://localhost:11434");
    assert_eq!(config.generation.concurrent_requests, 4);
    assert_eq!(config.generation.batch_size, 8);
    assert_eq!(config.generation.timeout_secs, 120);
    assert_eq!(config.chunking.max_chunk_size, 3500);
    assert_eq!(config.chunking.min_chunk_size, 1500);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.degrade_after_invalid, 2);
    assert_eq!(config.validation.min_output_chars, 10);
    assert!((config.validation.min_hangul_ratio - 0.3).abs() < f64::EPSILON);
    assert!(config.enable_cache);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_validate_withDefaultConfig_shouldPass() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_withEmptyModel_shouldFail() {
    let mut config = Config::default();
    config.generation.model = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withMinAboveMax_shouldFail() {
    let mut config = Config::default();
    config.chunking.min_chunk_size = 4000;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroAttempts_shouldFail() {
    let mut config = Config::default();
    config.retry.max_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.retry.degrade_after_invalid = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withRatioOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.validation.min_hangul_ratio = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_saveAndFromFile_withConfig_shouldRoundTrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.generation.model = "phi4:latest".to_string();
    config.chunking.max_chunk_size = 2000;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.generation.model, "phi4:latest");
    assert_eq!(loaded.chunking.max_chunk_size, 2000);
}

#[test]
fn test_fromFile_withMissingFile_shouldFail() {
    let dir = tempdir().unwrap();
    assert!(Config::from_file(dir.path().join("nope.json")).is_err());
}

#[test]
fn test_fromFile_withPartialJson_shouldFillDefaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"generation": {"model": "phi4:latest"}}"#).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.generation.model, "phi4:latest");
    assert_eq!(config.generation.concurrent_requests, 4);
    assert_eq!(config.chunking.max_chunk_size, 3500);
    assert!(config.enable_cache);
}
