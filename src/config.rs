//! Configuration and color scheme management for termfolio.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.termfolio/config.toml`
//! - Built-in color schemes (default, nord, dracula, gruvbox-dark, tokyo-night)
//!
//! # Configuration File
//!
//! ```toml
//! # Delay between revealed blocks, in milliseconds
//! reveal_delay_ms = 25
//!
//! # Delay before the prompt is focused again after a command
//! refocus_delay_ms = 50
//!
//! # Color scheme: default, nord, dracula, gruvbox-dark, tokyo-night
//! color_scheme = "tokyo-night"
//!
//! # Optional custom command table
//! commands_file = "/home/me/.termfolio/commands.toml"
//!
//! # Log level when RUST_LOG is not set
//! log_level = "info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::session::SessionOptions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Delay between revealed entries (ms)
    pub reveal_delay_ms: u64,
    /// Delay before refocusing the prompt after a submission (ms)
    pub refocus_delay_ms: u64,
    /// Color scheme name
    pub color_scheme: String,
    /// Custom command table file
    pub commands_file: Option<PathBuf>,
    /// Log level when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 25,
            refocus_delay_ms: 50,
            color_scheme: "default".to_string(),
            commands_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.toml"))
    }

    /// Timing options for the session
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
            refocus_delay: Duration::from_millis(self.refocus_delay_ms),
        }
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.color_scheme)
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: &'static str,

    // Output
    pub text: Color,
    pub muted: Color,
    pub heading: Color,
    pub link: Color,
    pub code: Color,
    pub command: Color,
    pub error: Color,

    // Prompt line
    pub prompt: Color,
    pub placeholder: Color,

    // Autocomplete menu
    pub menu_bg: Color,
    pub menu_fg: Color,
    pub menu_description: Color,
    pub menu_selected_bg: Color,
    pub menu_selected_fg: Color,
    pub menu_border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    /// Default color scheme
    pub fn default_scheme() -> Self {
        Self {
            name: "default",

            text: Color::new(220, 220, 220),
            muted: Color::new(130, 130, 130),
            heading: Color::new(255, 255, 255),
            link: Color::new(100, 150, 255),
            code: Color::new(200, 200, 0),
            command: Color::new(120, 200, 120),
            error: Color::new(235, 90, 90),

            prompt: Color::new(120, 200, 120),
            placeholder: Color::new(100, 100, 100),

            menu_bg: Color::new(40, 40, 40),
            menu_fg: Color::new(220, 220, 220),
            menu_description: Color::new(150, 150, 150),
            menu_selected_bg: Color::new(60, 60, 180),
            menu_selected_fg: Color::new(255, 255, 255),
            menu_border: Color::new(80, 80, 80),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord",

            text: Color::new(216, 222, 233),
            muted: Color::new(97, 110, 136),
            heading: Color::new(236, 239, 244),
            link: Color::new(136, 192, 208),
            code: Color::new(235, 203, 139),
            command: Color::new(163, 190, 140),
            error: Color::new(191, 97, 106),

            prompt: Color::new(163, 190, 140),
            placeholder: Color::new(76, 86, 106),

            menu_bg: Color::new(59, 66, 82),
            menu_fg: Color::new(216, 222, 233),
            menu_description: Color::new(147, 161, 181),
            menu_selected_bg: Color::new(136, 192, 208),
            menu_selected_fg: Color::new(46, 52, 64),
            menu_border: Color::new(76, 86, 106),
        }
    }

    /// Dracula scheme
    pub fn dracula() -> Self {
        Self {
            name: "dracula",

            text: Color::new(248, 248, 242),
            muted: Color::new(98, 114, 164),
            heading: Color::new(189, 147, 249),
            link: Color::new(139, 233, 253),
            code: Color::new(241, 250, 140),
            command: Color::new(80, 250, 123),
            error: Color::new(255, 85, 85),

            prompt: Color::new(80, 250, 123),
            placeholder: Color::new(98, 114, 164),

            menu_bg: Color::new(68, 71, 90),
            menu_fg: Color::new(248, 248, 242),
            menu_description: Color::new(98, 114, 164),
            menu_selected_bg: Color::new(189, 147, 249),
            menu_selected_fg: Color::new(40, 42, 54),
            menu_border: Color::new(98, 114, 164),
        }
    }

    /// Gruvbox Dark scheme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark",

            text: Color::new(235, 219, 178),
            muted: Color::new(146, 131, 116),
            heading: Color::new(250, 189, 47),
            link: Color::new(131, 165, 152),
            code: Color::new(254, 128, 25),
            command: Color::new(184, 187, 38),
            error: Color::new(251, 73, 52),

            prompt: Color::new(184, 187, 38),
            placeholder: Color::new(124, 111, 100),

            menu_bg: Color::new(60, 56, 54),
            menu_fg: Color::new(235, 219, 178),
            menu_description: Color::new(168, 153, 132),
            menu_selected_bg: Color::new(215, 153, 33),
            menu_selected_fg: Color::new(40, 40, 40),
            menu_border: Color::new(102, 92, 84),
        }
    }

    /// Tokyo Night scheme
    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night",

            text: Color::new(169, 177, 214),
            muted: Color::new(86, 95, 137),
            heading: Color::new(192, 202, 245),
            link: Color::new(122, 162, 247),
            code: Color::new(224, 175, 104),
            command: Color::new(158, 206, 106),
            error: Color::new(247, 118, 142),

            prompt: Color::new(158, 206, 106),
            placeholder: Color::new(65, 72, 104),

            menu_bg: Color::new(36, 40, 59),
            menu_fg: Color::new(169, 177, 214),
            menu_description: Color::new(86, 95, 137),
            menu_selected_bg: Color::new(122, 162, 247),
            menu_selected_fg: Color::new(26, 27, 38),
            menu_border: Color::new(41, 46, 66),
        }
    }

    /// Get scheme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            "gruvbox-dark" | "gruvbox_dark" | "gruvbox" => Self::gruvbox_dark(),
            "tokyo-night" | "tokyo_night" | "tokyonight" => Self::tokyo_night(),
            _ => Self::default_scheme(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec!["default", "nord", "dracula", "gruvbox-dark", "tokyo-night"]
    }
}

/// Per-user data directory (`~/.termfolio`)
pub fn data_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".termfolio"))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("color_scheme = \"nord\"").unwrap();
        assert_eq!(config.color_scheme, "nord");
        assert_eq!(config.reveal_delay_ms, 25);
        assert_eq!(config.refocus_delay_ms, 50);
        assert_eq!(config.commands_file, None);
    }

    #[test]
    fn test_session_options() {
        let config = Config {
            reveal_delay_ms: 0,
            refocus_delay_ms: 10,
            ..Config::default()
        };
        let options = config.session_options();
        assert_eq!(options.reveal_delay, Duration::ZERO);
        assert_eq!(options.refocus_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            color_scheme: "dracula".to_string(),
            commands_file: Some(PathBuf::from("cmds.toml")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        fs::write(&path, "reveal_delay_ms = \"fast\"").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_scheme_lookup() {
        assert_eq!(ColorScheme::by_name("Tokyo-Night").name, "tokyo-night");
        assert_eq!(ColorScheme::by_name("gruvbox").name, "gruvbox-dark");
        assert_eq!(ColorScheme::by_name("unknown").name, "default");
        for name in ColorScheme::list() {
            assert_eq!(ColorScheme::by_name(name).name, name);
        }
    }
}
