//! Configuration system tests
//!
//! Tests for config paths and layout config loading/saving.

use duoview::config::{LayoutConfig, ScaledMetrics};
use duoview::config_paths;
use tempfile::tempdir;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("duoview"));
}

#[test]
fn test_config_file_ends_with_yaml() {
    let path = config_paths::config_file().unwrap();
    assert!(path.to_string_lossy().ends_with("config.yaml"));
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    let config = config_paths::config_dir().unwrap();
    let logs = config_paths::logs_dir().unwrap();
    assert!(logs.starts_with(&config));
}

// ========================================================================
// Layout Config Tests
// ========================================================================

#[test]
fn test_default_layout_constants() {
    let config = LayoutConfig::default();
    assert_eq!(config.tab_header_height, 28);
    assert_eq!(config.view_gap, 4);
    assert_eq!(config.split_width, 1);
    assert_eq!(config.update_check_ticks, 600);
    assert!(config.scroll_to_cursor);
    assert!(!config.session_autosave);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let config = LayoutConfig {
        tab_header_height: 32,
        default_sidebar_width: 300,
        session_autosave: true,
        ..LayoutConfig::default()
    };
    config.save_to(&path).unwrap();
    assert!(path.exists());

    assert_eq!(LayoutConfig::load_from(&path), config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = LayoutConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(config, LayoutConfig::default());
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "view_gap: 8\nscroll_to_cursor: false\n").unwrap();

    let config = LayoutConfig::load_from(&path);
    assert_eq!(config.view_gap, 8);
    assert!(!config.scroll_to_cursor);
    assert_eq!(config.tab_header_height, 28);
}

#[test]
fn test_malformed_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "view_gap: [not, a, number\n").unwrap();

    assert_eq!(LayoutConfig::load_from(&path), LayoutConfig::default());
}

#[test]
fn test_metrics_fall_back_to_unit_scale() {
    let config = LayoutConfig::default();
    assert_eq!(
        ScaledMetrics::new(&config, 0.0),
        ScaledMetrics::new(&config, 1.0)
    );
    assert_eq!(ScaledMetrics::new(&config, 2.0).view_gap, 8);
}
