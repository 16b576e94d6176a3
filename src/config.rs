//! Runtime configuration
//!
//! Defaults come from [`crate::constants`]. An optional `config.yaml` in the
//! data directory overrides any subset of them.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    CONFIG_FILE, DATA_DIR_NAME, FALLBACK_LAT, FALLBACK_LNG, PANIC_HOLD, SHARE_WAYPOINTS,
    TRACKING_INTERVAL,
};
use crate::models::Coordinates;

/// Where device locations come from
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpsMode {
    /// Random walk around `origin`
    Simulated,
    /// Always report `origin`
    Fixed,
    /// No location capability; the fallback coordinate is used
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GpsConfig {
    pub mode: GpsMode,
    pub origin: Coordinates,
    /// Maximum step of the simulated walk, in degrees
    pub jitter: f64,
}

impl Default for GpsConfig {
    fn default() -> Self {
        GpsConfig {
            mode: GpsMode::Simulated,
            origin: Coordinates::new(FALLBACK_LAT, FALLBACK_LNG),
            jitter: 0.0005,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracking_interval_secs: u64,
    pub panic_hold_ms: u64,
    pub share_waypoints: usize,
    pub fallback: Coordinates,
    pub gps: GpsConfig,
    /// Whether transcript input is offered as a stand-in for speech recognition
    pub voice_enabled: bool,
    /// Whether a share target exists; otherwise trails go out as SMS
    pub share_enabled: bool,
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tracking_interval_secs: TRACKING_INTERVAL.as_secs(),
            panic_hold_ms: PANIC_HOLD.as_millis() as u64,
            share_waypoints: SHARE_WAYPOINTS,
            fallback: Coordinates::fallback(),
            gps: GpsConfig::default(),
            voice_enabled: true,
            share_enabled: true,
            data_dir: default_data_dir(),
        }
    }
}

/// `~/.emergency-hub`, or `./.emergency-hub` without a home directory
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

impl Config {
    /// Load `config.yaml` from `dir`; a missing file yields the defaults
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Self::parse(&content).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Config::default()
        };
        config.data_dir = dir.to_path_buf();
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        if config.tracking_interval_secs == 0 {
            anyhow::bail!("tracking_interval_secs must be positive");
        }
        if config.share_waypoints == 0 {
            anyhow::bail!("share_waypoints must be positive");
        }
        Ok(config)
    }

    pub fn tracking_interval(&self) -> Duration {
        Duration::from_secs(self.tracking_interval_secs)
    }

    pub fn panic_hold(&self) -> Duration {
        Duration::from_millis(self.panic_hold_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tracking_interval(), Duration::from_secs(30));
        assert_eq!(config.panic_hold(), Duration::from_secs(3));
        assert_eq!(config.share_waypoints, 10);
        assert_eq!(config.gps.mode, GpsMode::Simulated);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::parse(
            "tracking_interval_secs: 5\ngps:\n  mode: fixed\n  origin: { lat: 1.5, lng: 2.5 }\n",
        )
        .unwrap();
        assert_eq!(config.tracking_interval_secs, 5);
        assert_eq!(config.gps.mode, GpsMode::Fixed);
        assert_eq!(config.gps.origin, Coordinates::new(1.5, 2.5));
        assert_eq!(config.panic_hold_ms, 3000);
        assert!(config.voice_enabled);
    }

    #[test]
    fn test_rejects_zero_interval() {
        assert!(Config::parse("tracking_interval_secs: 0").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.share_waypoints, 10);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "gps: [unclosed").unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }
}
