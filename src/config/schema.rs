use serde::{Deserialize, Serialize};

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tagmend/config.toml` or `~/.config/tagmend/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TAGMEND__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub matching: MatchSettings,
    pub deluxe: DeluxeSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

/// Sentinels and the time window used when scoring donor candidates.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Album value meaning "album not actually known".
    pub unknown_album: String,
    /// Artist value meaning "artist not actually known".
    pub unknown_artist: String,
    /// Title value meaning "title not actually known".
    pub unknown_title: String,
    /// Files created further apart than this (seconds) never match.
    pub window_secs: f64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            unknown_album: "Unknown Album".to_string(),
            unknown_artist: "Unknown Artist".to_string(),
            unknown_title: "Unknown Title".to_string(),
            window_secs: 60.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeluxeSettings {
    /// Album-name fragments (case-insensitive) marking a special edition.
    pub keywords: Vec<String>,
}

impl Default for DeluxeSettings {
    fn default() -> Self {
        Self {
            keywords: ["Deluxe", "Expanded", "Remastered", "Special Edition", "Anniversary"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: LogLevelSetting,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevelSetting::Info,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevelSetting {
    Off,
    Error,
    #[serde(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelSetting {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevelSetting::Off => log::LevelFilter::Off,
            LogLevelSetting::Error => log::LevelFilter::Error,
            LogLevelSetting::Warn => log::LevelFilter::Warn,
            LogLevelSetting::Info => log::LevelFilter::Info,
            LogLevelSetting::Debug => log::LevelFilter::Debug,
            LogLevelSetting::Trace => log::LevelFilter::Trace,
        }
    }
}
