use serial_test::serial;
use temp_env::with_vars;

use super::*;
use crate::Error;

fn cleanup_all_store_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("RAFT_STORE__") || key == "CONFIG_PATH" {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = StoreConfig::default();

    assert_eq!(config.engine.lru_cache_size, 128 * 1024 * 1024);
    assert_eq!(config.engine.write_buffer_size, 32 * 1024 * 1024);
    assert_eq!(config.engine.num_levels, 7);
    assert_eq!(config.engine.block_size, 64 * 1024);
    assert_eq!(config.engine.target_file_size_base, 128 * 1024 * 1024);
    assert_eq!(config.engine.max_manifest_file_size, 128 * 1024 * 1024);
    assert!(config.diagnostics.enable_event_monitor);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_store_env_vars();
    with_vars(
        vec![
            ("RAFT_STORE__ENGINE__BLOCK_SIZE", Some("32768")),
            ("RAFT_STORE__DIAGNOSTICS__ENABLE_EVENT_MONITOR", Some("false")),
        ],
        || {
            let config = StoreConfig::new().unwrap();

            assert_eq!(config.engine.block_size, 32768);
            assert!(!config.diagnostics.enable_event_monitor);
            // untouched values keep their defaults
            assert_eq!(config.engine.num_levels, 7);
        },
    );
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_store_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("store_override.toml");

    std::fs::write(
        &config_path,
        r#"
        [engine]
        write_buffer_size = 8388608
        num_levels = 5

        [diagnostics]
        poll_interval_in_ms = 250
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base_config = StoreConfig::new().expect("success");
        let config = base_config.with_override_config(config_path.to_str().unwrap()).unwrap();

        assert_eq!(config.engine.write_buffer_size, 8 * 1024 * 1024);
        assert_eq!(config.engine.num_levels, 5);
        assert_eq!(config.diagnostics.poll_interval_in_ms, 250);
        assert_eq!(config.engine.block_size, 64 * 1024);
    });
}

#[test]
#[serial]
fn environment_variables_should_have_highest_priority() {
    cleanup_all_store_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("store.toml");
    std::fs::write(
        &config_path,
        r#"
        [engine]
        max_open_files = 1000
        "#,
    )
    .unwrap();

    with_vars(
        vec![
            ("CONFIG_PATH", Some(config_path.to_str().unwrap())),
            ("RAFT_STORE__ENGINE__MAX_OPEN_FILES", Some("2000")),
        ],
        || {
            let config = StoreConfig::new().unwrap();
            assert_eq!(config.engine.max_open_files, 2000);
        },
    );
}

#[test]
fn validation_should_reject_inverted_level0_triggers() {
    let mut config = StoreConfig::default();
    config.engine.level0_file_num_compaction_trigger = 10;
    config.engine.level0_stop_writes_trigger = 4;

    assert!(matches!(config.validate(), Err(Error::Config(_))));
}

#[test]
fn validation_should_reject_zero_sizes() {
    let mut config = StoreConfig::default();
    config.engine.block_size = 0;
    assert!(config.validate().is_err());

    let mut config = StoreConfig::default();
    config.engine.write_buffer_size = 0;
    assert!(config.validate().is_err());

    let mut config = StoreConfig::default();
    config.diagnostics.poll_interval_in_ms = 0;
    assert!(config.validate().is_err());

    let mut config = StoreConfig::default();
    config.diagnostics.enable_event_monitor = false;
    config.diagnostics.poll_interval_in_ms = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn level_target_file_sizes_follow_multiplier() {
    let mut engine = EngineConfig {
        target_file_size_base: 2,
        target_file_size_multiplier: 3,
        num_levels: 4,
        ..Default::default()
    };
    assert_eq!(engine.level_target_file_sizes(), vec![2, 6, 18, 54]);

    engine.target_file_size_multiplier = 1;
    assert_eq!(engine.level_target_file_sizes(), vec![2, 2, 2, 2]);
}
