//! Integration test: Configuration utilities
//!
//! Tests bin_common path resolution and end-to-end config file loading.

use cargolink_notifier::bin_common::{load_config_from_env, ConfigType};
use cargolink_notifier::cargolink::NotifierConfig;
use std::env;

#[test]
fn test_notifier_config_default_path() {
    env::remove_var("NOTIFIER_CONFIG_PATH");

    let config_path = load_config_from_env(ConfigType::Notifier);
    assert_eq!(config_path.to_str().unwrap(), "config/notifier.yaml");
}

#[test]
fn test_custom_config_path() {
    let custom = ConfigType::Custom("custom/path.yaml".to_string());
    let config_path = load_config_from_env(custom);

    assert_eq!(config_path.to_str().unwrap(), "custom/path.yaml");
}

#[test]
fn test_config_type_env_var_names() {
    assert_eq!(ConfigType::Notifier.env_var_name(), "NOTIFIER_CONFIG_PATH");
    assert_eq!(
        ConfigType::Custom("x.yaml".to_string()).env_var_name(),
        "CONFIG_PATH"
    );
}

#[test]
fn test_sample_config_loads() {
    // The checked-in sample must stay loadable
    let config = NotifierConfig::load("config/notifier.yaml").unwrap();

    assert!(config.server.ws_url.starts_with("wss://"));
    assert_eq!(config.identity.user_id, "u-1001");
    assert_eq!(config.realtime.max_attempts, 5);
}

#[test]
fn test_missing_config_file_is_an_error() {
    assert!(NotifierConfig::load("config/does-not-exist.yaml").is_err());
}
