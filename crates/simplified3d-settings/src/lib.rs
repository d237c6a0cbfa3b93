//! Configuration and settings management for Simplified3D
//!
//! Holds the machine defaults, waveform tuning, output and logging
//! preferences used by the command-line front end, persisted as TOML or JSON.

pub mod config;
pub mod error;

pub use config::{Config, LoggingSettings, MachineSettings, OutputSettings, WaveformSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
