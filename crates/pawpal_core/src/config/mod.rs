use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_DIR_NAME: &str = "pawpal";
const CONFIG_ENV_VAR: &str = "PAWPAL_CONFIG_PATH";

/// Window used by `list upcoming` when neither the config nor the command
/// gives one.
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub warning: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }

    pub fn accentize(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    pub fn warn(&self, text: &str) -> String {
        self.paint(self.warning, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        self.paint(self.muted, text)
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            warning: "\x1b[38;5;196m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            warning: "\x1b[38;5;166m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            warning: "",
            muted: "",
            reset: "",
        },
    }
}

/// Lowercases, collapses punctuation runs to `_`, and folds known synonyms.
pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let words: Vec<String> = raw
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    let joined = words.join("_");
    let canonical = match joined.as_str() {
        "" | "vanilla" | "light" => "default",
        "dark" | "dark_mode" | "darkmode" => "noir",
        other => other,
    };
    Some(canonical.to_string())
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    /// Shorthand expanded on the first word of an interactive command.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub upcoming_days: Option<u32>,
}

impl Config {
    pub fn upcoming_days(&self) -> u32 {
        self.upcoming_days.unwrap_or(DEFAULT_UPCOMING_DAYS)
    }

    pub fn palette(&self) -> Palette {
        palette_for_theme(self.theme.as_deref())
    }
}

/// A config plus the error that forced a fall back to defaults, if any.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub aliases: HashMap<String, String>,
    pub upcoming_days: Option<u32>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let base = if cfg!(windows) {
        std::env::var("APPDATA")
            .map(PathBuf::from)
            .map_err(|_| AppError::invalid_data("APPDATA is not set"))?
    } else {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .map_err(|_| AppError::invalid_data("HOME is not set"))?
    };
    Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

pub fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    Ok(config)
}

/// Applies command-line overrides on top of `base` without touching it.
pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_deref().and_then(canonical_theme_name) {
        merged.theme = Some(theme);
    }
    if let Some(days) = overrides.upcoming_days {
        merged.upcoming_days = Some(days);
    }
    merged.aliases.extend(
        overrides
            .aliases
            .iter()
            .map(|(alias, value)| (alias.clone(), value.clone())),
    );
    merged
}
