//! Configuration and color schemes for tabterm.
//!
//! This module provides:
//! - TOML configuration loading from `~/.tabterm/config.toml`
//! - Tab label policy and headless session size
//! - Built-in color schemes for the tab bar and tab context menu
//!
//! # Configuration File
//!
//! ```toml
//! # Color scheme: default, solarized-dark, nord, dracula
//! color_scheme = "nord"
//!
//! [tabs]
//! label_prefix = "Terminal"
//! first_number = 1
//!
//! [session]
//! cols = 80
//! rows = 24
//!
//! [tab_bar]
//! visible = true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::wm::TabNaming;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config path")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Color scheme name
    pub color_scheme: String,
    /// Tab label settings
    pub tabs: TabsConfig,
    /// Headless session settings
    pub session: SessionConfig,
    /// Tab bar settings
    pub tab_bar: TabBarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_scheme: "default".to_string(),
            tabs: TabsConfig::default(),
            session: SessionConfig::default(),
            tab_bar: TabBarConfig::default(),
        }
    }
}

/// Tab label configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    pub label_prefix: String,
    pub first_number: u32,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            label_prefix: "Terminal".to_string(),
            first_number: 1,
        }
    }
}

/// Natural size of headless sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cols: u16,
    pub rows: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

/// Tab bar configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabBarConfig {
    pub visible: bool,
}

impl Default for TabBarConfig {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl Config {
    /// Load `~/.tabterm/config.toml`, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save to `~/.tabterm/config.toml`
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `~/.tabterm`, also home of the log file
    pub fn config_dir() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".tabterm"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn tab_naming(&self) -> TabNaming {
        TabNaming {
            prefix: self.tabs.label_prefix.clone(),
            first_number: self.tabs.first_number,
        }
    }

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
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Colors for the tab bar and the tab context menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,

    pub tab_bar_bg: Color,
    pub tab_bar_fg: Color,
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub tab_inactive_bg: Color,
    pub tab_inactive_fg: Color,

    pub menu_bg: Color,
    pub menu_fg: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    pub fn default_scheme() -> Self {
        Self {
            name: "default".to_string(),

            tab_bar_bg: Color::new(40, 40, 40),
            tab_bar_fg: Color::new(180, 180, 180),
            tab_active_bg: Color::new(60, 60, 180),
            tab_active_fg: Color::new(255, 255, 255),
            tab_inactive_bg: Color::new(60, 60, 60),
            tab_inactive_fg: Color::new(150, 150, 150),

            menu_bg: Color::new(0, 100, 0),
            menu_fg: Color::new(255, 255, 255),
        }
    }

    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".to_string(),

            tab_bar_bg: Color::new(0, 43, 54),
            tab_bar_fg: Color::new(147, 161, 161),
            tab_active_bg: Color::new(38, 139, 210),
            tab_active_fg: Color::new(253, 246, 227),
            tab_inactive_bg: Color::new(7, 54, 66),
            tab_inactive_fg: Color::new(101, 123, 131),

            menu_bg: Color::new(7, 54, 66),
            menu_fg: Color::new(147, 161, 161),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),

            tab_bar_bg: Color::new(46, 52, 64),
            tab_bar_fg: Color::new(216, 222, 233),
            tab_active_bg: Color::new(136, 192, 208),
            tab_active_fg: Color::new(46, 52, 64),
            tab_inactive_bg: Color::new(59, 66, 82),
            tab_inactive_fg: Color::new(147, 161, 181),

            menu_bg: Color::new(59, 66, 82),
            menu_fg: Color::new(216, 222, 233),
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),

            tab_bar_bg: Color::new(40, 42, 54),
            tab_bar_fg: Color::new(248, 248, 242),
            tab_active_bg: Color::new(189, 147, 249),
            tab_active_fg: Color::new(40, 42, 54),
            tab_inactive_bg: Color::new(68, 71, 90),
            tab_inactive_fg: Color::new(98, 114, 164),

            menu_bg: Color::new(68, 71, 90),
            menu_fg: Color::new(248, 248, 242),
        }
    }

    /// Get scheme by name, unknown names give the default scheme
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "solarized-dark" | "solarized_dark" => Self::solarized_dark(),
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            _ => Self::default_scheme(),
        }
    }

    pub fn list() -> Vec<&'static str> {
        vec!["default", "solarized-dark", "nord", "dracula"]
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
