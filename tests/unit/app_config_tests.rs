/*!
 * Tests for application configuration
 */

use anyhow::Result;
use subspine::app_config::{Config, LogLevel};
use subspine::errors::ConfigError;
use crate::common;

/// Test built-in defaults match the documented values
#[test]
fn test_config_default_shouldUseDocumentedValues() {
    let config = Config::default();

    assert_eq!(config.template, "Template.xml");
    assert_eq!(config.framerate, 29.97);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test loading a config file with partial keys falls back to defaults
#[test]
fn test_config_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "framerate": 25.0 }"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.framerate, 25.0);
    assert_eq!(config.template, "Template.xml");
    assert_eq!(config.log_level, LogLevel::Info);

    Ok(())
}

/// Test save then load reproduces the configuration
#[test]
fn test_config_save_withRoundTrip_shouldReproduceValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config {
        template: "Broadcast.xml".to_string(),
        framerate: 23.976,
        log_level: LogLevel::Debug,
    };
    config.save(&path)?;

    let reloaded = Config::from_file(&path)?;
    assert_eq!(reloaded.template, "Broadcast.xml");
    assert_eq!(reloaded.framerate, 23.976);
    assert_eq!(reloaded.log_level, LogLevel::Debug);

    Ok(())
}

/// Test validation rejects non-positive frame rates
#[test]
fn test_config_validate_withBadFramerate_shouldFail() {
    let config = Config {
        framerate: 0.0,
        ..Config::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::Invalid(_)
    ));

    let config = Config {
        framerate: f64::NAN,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

/// Test validation rejects an empty template path
#[test]
fn test_config_validate_withEmptyTemplate_shouldFail() {
    let config = Config {
        template: "  ".to_string(),
        ..Config::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::Invalid(_)
    ));
}

/// Test malformed JSON is rejected with context
#[test]
fn test_config_from_file_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());

    Ok(())
}
