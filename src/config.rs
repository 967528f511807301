//! Configuration file support for tipview.
//!
//! A configuration bundles the tooltip preferences with the scene the
//! command-line renderer draws: container size, reference view, text and
//! which phases of the tooltip's lifecycle to record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tipview_ui::{Color, Preferences, Rectangle, Size};

/// Log level setting for the application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Tooltip appearance, placement and animation
    #[serde(default)]
    pub preferences: Preferences,

    /// What to render
    #[serde(default)]
    pub scene: SceneConfig,
}

/// The scene rendered by the command-line tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Visible container size; also the size of every output image
    pub container: Size,

    /// Scrollable content size of the container, when it scrolls
    pub content_size: Option<Size>,

    /// Reference view, in container coordinates
    pub reference: Rectangle,

    /// Tooltip text
    pub text: String,

    /// Animate the appearance instead of showing the tooltip at once
    pub animated: bool,

    /// Frames rendered per transition
    pub frames: u32,

    /// Resize the container to this size after the tooltip appeared
    pub resize_to: Option<Size>,

    /// Record the dismissal as well
    pub dismiss: bool,

    /// Output file stem; frames are written as `<stem>_<index>_<phase>.png`
    pub output: PathBuf,

    /// Extra font files loaded before measuring text
    pub fonts: Vec<PathBuf>,

    /// Container background
    pub background: Color,

    /// Fill of the reference view
    pub reference_color: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            container: Size::new(320.0, 480.0),
            content_size: None,
            reference: Rectangle::new(100.0, 50.0, 50.0, 30.0),
            text: "Hi".to_string(),
            animated: true,
            frames: crate::constants::DEFAULT_FRAMES,
            resize_to: None,
            dismiss: true,
            output: PathBuf::from(crate::constants::DEFAULT_OUTPUT_STEM),
            fonts: Vec::new(),
            background: Color::WHITE,
            reference_color: Color::rgb(0.8, 0.8, 0.8),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            preferences: Preferences::default(),
            scene: SceneConfig::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default config filename.
    pub fn default_filename() -> &'static str {
        "tipview.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("tipview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("tipview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)?;
        Ok(path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
