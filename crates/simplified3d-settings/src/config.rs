//! Configuration file model
//!
//! Every section falls back to its defaults when absent, so a configuration
//! file only needs the values it changes.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Machine feeds, heights and timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Nominal print height (mm)
    pub z_value: f64,
    /// Travel feed rate (mm/min)
    pub g0_xy_feed: f64,
    /// Depositing feed rate (mm/min)
    pub g1_xy_feed: f64,
    /// Z feed rate (mm/min)
    pub z_feed: f64,
    /// A axis feed rate
    pub a_feed: f64,
    /// Z lift before tool rotation (mm)
    pub vertical_lift: f64,
    /// Dwell after a block (ms)
    pub delay_time: f64,
    /// Feed rate of a cleaning pass with the tool (mm/min)
    pub clean_feed: f64,
    /// Dwell after a cleaning pass with the tool (ms)
    pub clean_dwell: f64,
    /// Feed rate of a cleaning pass without the tool (mm/min)
    pub clean_no_tool_feed: f64,
    /// Dwell after a cleaning pass without the tool (ms)
    pub clean_no_tool_dwell: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            z_value: 0.3,
            g0_xy_feed: 1500.0,
            g1_xy_feed: 1200.0,
            z_feed: 1500.0,
            a_feed: 800.0,
            vertical_lift: 0.5,
            delay_time: 100.0,
            clean_feed: 1000.0,
            clean_dwell: 500.0,
            clean_no_tool_feed: 800.0,
            clean_no_tool_dwell: 400.0,
        }
    }
}

/// Waveform selection and tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformSettings {
    /// Tag used when the command line does not name one
    pub default_waveform: String,
    /// Tooth or step height (mm)
    pub amplitude: f64,
    /// Subdivisions of a cleaning sweep
    pub subdivisions: usize,
    /// Angular steps of a sawtooth A axis rotation
    pub rotation_steps: usize,
    /// Overshoot between rotation steps (degrees)
    pub rotation_overshoot: f64,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            default_waveform: "default".to_string(),
            amplitude: 0.5,
            subdivisions: 10,
            rotation_steps: 4,
            rotation_overshoot: 2.0,
        }
    }
}

/// Where generated G-code goes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Default output file; standard output when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Append to an existing file instead of truncating it
    pub append: bool,
}

/// Log filtering and format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is unset
    pub level: String,
    /// Emit JSON log records
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub machine: MachineSettings,
    pub waveform: WaveformSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("none").to_string()).into()),
    }
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be > 0, got {}", value)))
    }
}

fn non_negative(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be >= 0, got {}", value)))
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/simplified3d/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("simplified3d").join("config.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load `path` when it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let m = &self.machine;
        if !m.z_value.is_finite() {
            return Err(SettingsError::invalid("machine.z_value", "must be finite"));
        }
        positive("machine.g0_xy_feed", m.g0_xy_feed)?;
        positive("machine.g1_xy_feed", m.g1_xy_feed)?;
        positive("machine.z_feed", m.z_feed)?;
        positive("machine.a_feed", m.a_feed)?;
        non_negative("machine.vertical_lift", m.vertical_lift)?;
        non_negative("machine.delay_time", m.delay_time)?;
        positive("machine.clean_feed", m.clean_feed)?;
        non_negative("machine.clean_dwell", m.clean_dwell)?;
        positive("machine.clean_no_tool_feed", m.clean_no_tool_feed)?;
        non_negative("machine.clean_no_tool_dwell", m.clean_no_tool_dwell)?;

        let w = &self.waveform;
        non_negative("waveform.amplitude", w.amplitude)?;
        non_negative("waveform.rotation_overshoot", w.rotation_overshoot)?;
        if w.subdivisions == 0 {
            return Err(SettingsError::invalid("waveform.subdivisions", "must be > 0"));
        }
        if w.rotation_steps == 0 {
            return Err(SettingsError::invalid("waveform.rotation_steps", "must be > 0"));
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(SettingsError::invalid(
                "logging.level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }

        Ok(())
    }
}
