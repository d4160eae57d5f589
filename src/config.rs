//! Layout configuration persistence
//!
//! Stores layout constants in `~/.config/duoview/config.yaml`

use serde::{Deserialize, Serialize};

/// Layout configuration that persists across sessions.
///
/// Pixel values are logical (96 DPI) and are scaled once per pass through
/// [`ScaledMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of each view's tab-strip header band
    pub tab_header_height: i32,
    /// Width of the splitter between main and slave views
    pub view_gap: i32,
    /// Thickness of sidebar, result and query-table splitters
    pub split_width: i32,
    /// Sidebar column width when a page never recorded one
    pub default_sidebar_width: i32,
    /// Document-map column width when a page never recorded a sidebar width
    pub default_map_width: i32,
    /// Minimum height of the edit area (and of the result list)
    pub min_edit_height: i32,
    /// Minimum width left for the edit stack beside a sidebar column
    pub min_edit_width: i32,
    /// Share of the edit/result stack given to the edit area
    pub default_result_ratio: f32,
    /// Share of the result region given to the result list
    pub default_query_ratio: f32,
    /// Share of the client width given to the main view when split
    pub default_view_split: f32,
    /// Number of 100ms ticks before the update check starts
    pub update_check_ticks: u32,
    /// Scroll to the remembered caret when a tab is activated
    pub scroll_to_cursor: bool,
    /// Emit autosave requests on the periodic tick
    pub session_autosave: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tab_header_height: 28,
            view_gap: 4,
            split_width: 1,
            default_sidebar_width: 240,
            default_map_width: 120,
            min_edit_height: 80,
            min_edit_width: 120,
            default_result_ratio: 0.7,
            default_query_ratio: 0.5,
            default_view_split: 0.5,
            update_check_ticks: 600,
            scroll_to_cursor: true,
            session_autosave: false,
        }
    }
}

impl LayoutConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any error
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

/// Pixel constants resolved for one scale factor.
///
/// Built once by the caller before a layout pass so the geometry stage
/// itself never deals with DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledMetrics {
    pub scale: f64,
    pub tab_header_height: i32,
    pub view_gap: i32,
    pub split_width: i32,
    pub default_sidebar_width: i32,
    pub default_map_width: i32,
    pub min_edit_height: i32,
    pub min_edit_width: i32,
    pub default_result_ratio: f32,
    pub default_query_ratio: f32,
}

impl ScaledMetrics {
    pub fn new(config: &LayoutConfig, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            scale,
            tab_header_height: scale_px(config.tab_header_height, scale),
            view_gap: scale_px(config.view_gap, scale),
            split_width: scale_px(config.split_width, scale),
            default_sidebar_width: scale_px(config.default_sidebar_width, scale),
            default_map_width: scale_px(config.default_map_width, scale),
            min_edit_height: scale_px(config.min_edit_height, scale),
            min_edit_width: scale_px(config.min_edit_width, scale),
            default_result_ratio: config.default_result_ratio,
            default_query_ratio: config.default_query_ratio,
        }
    }

    /// Scale a logical width recorded on a page
    pub fn scale(&self, logical: i32) -> i32 {
        scale_px(logical, self.scale)
    }
}

impl Default for ScaledMetrics {
    fn default() -> Self {
        Self::new(&LayoutConfig::default(), 1.0)
    }
}

/// Scale a logical pixel value; non-zero values never round down to zero
fn scale_px(value: i32, scale: f64) -> i32 {
    if value <= 0 {
        return 0;
    }
    ((f64::from(value) * scale).round() as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_at_unit_scale_match_config() {
        let config = LayoutConfig::default();
        let metrics = ScaledMetrics::new(&config, 1.0);
        assert_eq!(metrics.tab_header_height, config.tab_header_height);
        assert_eq!(metrics.split_width, 1);
    }

    #[test]
    fn test_metrics_scale_and_keep_hairlines() {
        let metrics = ScaledMetrics::new(&LayoutConfig::default(), 1.5);
        assert_eq!(metrics.tab_header_height, 42);
        assert_eq!(metrics.default_sidebar_width, 360);
        assert_eq!(metrics.split_width, 2);

        let metrics = ScaledMetrics::new(&LayoutConfig::default(), 0.25);
        assert_eq!(metrics.split_width, 1);
    }

    #[test]
    fn test_invalid_scale_falls_back_to_one() {
        let metrics = ScaledMetrics::new(&LayoutConfig::default(), f64::NAN);
        assert_eq!(metrics.scale, 1.0);
    }
}
