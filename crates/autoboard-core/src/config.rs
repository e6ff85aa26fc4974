use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub autoscroll: AutoScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (holds the log file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Leaderboard endpoint returning `{easy, normal, hard, error?}`
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Seconds between automatic refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// Auto-scroll tuning. Defaults reproduce the reference cycle:
/// 40 px/s, 1200 ms at the bottom, 400 ms at the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoScrollConfig {
    /// Scroll speed while running, in pixels per second
    #[serde(default = "default_speed")]
    pub speed_px_per_sec: f64,
    /// Hold time once the bottom is reached
    #[serde(default = "default_bottom_pause")]
    pub bottom_pause_ms: u64,
    /// Hold time after snapping back to the top
    #[serde(default = "default_top_pause")]
    pub top_pause_ms: u64,
    /// Upper bound on the elapsed time applied by a single frame
    #[serde(default = "default_max_frame_delta")]
    pub max_frame_delta_ms: u64,
    /// Distance from `max_scroll` that already counts as "at the bottom"
    #[serde(default = "default_bottom_tolerance")]
    pub bottom_tolerance_px: f64,
    /// Host frame pacing (frames per second)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            speed_px_per_sec: default_speed(),
            bottom_pause_ms: default_bottom_pause(),
            top_pause_ms: default_top_pause(),
            max_frame_delta_ms: default_max_frame_delta(),
            bottom_tolerance_px: default_bottom_tolerance(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl AutoScrollConfig {
    #[inline]
    pub fn bottom_pause(&self) -> Duration {
        Duration::from_millis(self.bottom_pause_ms)
    }

    #[inline]
    pub fn top_pause(&self) -> Duration {
        Duration::from_millis(self.top_pause_ms)
    }

    #[inline]
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }

    /// Interval between frames at the configured frame rate, never below 1ms
    #[inline]
    pub fn frame_interval(&self) -> Duration {
        if self.frame_rate == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis((1000 / self.frame_rate as u64).max(1))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle poll timeout in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Nominal pixel height of one terminal row
    #[serde(default = "default_row_height")]
    pub row_height_px: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            row_height_px: default_row_height(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autoboard")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_url() -> String {
    "http://127.0.0.1:5000/api/leaderboard".to_string()
}

fn default_refresh_interval() -> u64 {
    10
}

fn default_timeout() -> u64 {
    5
}

fn default_speed() -> f64 {
    40.0
}

fn default_bottom_pause() -> u64 {
    1200
}

fn default_top_pause() -> u64 {
    400
}

fn default_max_frame_delta() -> u64 {
    100
}

fn default_bottom_tolerance() -> f64 {
    1.0
}

fn default_frame_rate() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    250
}

fn default_row_height() -> f64 {
    16.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/autoboard/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("autoboard")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("autoboard.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_autoscroll_config() {
        let config = AutoScrollConfig::default();
        assert_eq!(config.speed_px_per_sec, 40.0);
        assert_eq!(config.bottom_pause(), Duration::from_millis(1200));
        assert_eq!(config.top_pause(), Duration::from_millis(400));
        assert_eq!(config.max_frame_delta(), Duration::from_millis(100));
        assert_eq!(config.bottom_tolerance_px, 1.0);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_frame_interval_zero_rate() {
        let config = AutoScrollConfig {
            frame_rate: 0,
            ..Default::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_frame_interval_high_rate_is_clamped() {
        let config = AutoScrollConfig {
            frame_rate: 5000,
            ..Default::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [source]
            api_url = "http://example.com/api/leaderboard"

            [autoscroll]
            top_pause_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.source.api_url, "http://example.com/api/leaderboard");
        assert_eq!(config.source.refresh_interval_secs, 10);
        assert_eq!(config.autoscroll.top_pause_ms, 250);
        assert_eq!(config.autoscroll.bottom_pause_ms, 1200);
        assert_eq!(config.ui.row_height_px, 16.0);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[autoscroll]\nspeed_px_per_sec = \"fast\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("autoboard-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.autoscroll.speed_px_per_sec = 25.0;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.autoscroll, config.autoscroll);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("autoboard-does-not-exist").join("config.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.source.refresh_interval_secs, 10);
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        assert_eq!(expand_tilde(Path::new("/var/data")), PathBuf::from("/var/data"));
    }
}
