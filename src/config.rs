// src/config.rs
use crate::generator::CharacterCounts;
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use toml;

const DATABASE_FILE_NAME: &str = "passwords.db";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the SQLite file lives. `None` means the per-user data directory.
    pub database_path: Option<PathBuf>,
    /// Seconds before a copied password is cleared from the clipboard; 0 keeps it.
    pub clipboard_clear_time_seconds: u64,
    pub default_counts: CharacterCounts,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            clipboard_clear_time_seconds: 30,
            default_counts: CharacterCounts::default(),
        }
    }
}

impl Config {
    /// Database location: explicit override, then config, then the data directory,
    /// then the working directory.
    pub fn resolve_database_path(&self, override_path: Option<&Path>) -> PathBuf {
        if let Some(path) = override_path {
            return path.to_path_buf();
        }
        if let Some(path) = &self.database_path {
            return path.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "PassgenRS", "PassgenRS")
}

fn get_config_path() -> Option<PathBuf> {
    project_dirs().map(|proj_dirs| proj_dirs.config_dir().join("passgen_config.toml"))
}

fn save_default_config(config_path: &Path, config: &Config) -> Result<(), String> {
    info!("Attempting to save default config to {:?}", config_path);
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)
                .map_err(|e| format!("Failed to create config directory {:?}: {}", parent_dir, e))?;
            info!("Created config directory: {:?}", parent_dir);
        }
    }

    let toml_string = toml::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize default config to TOML: {}", e))?;

    let mut file = fs::File::create(config_path)
        .map_err(|e| format!("Failed to create default config file {:?}: {}", config_path, e))?;

    file.write_all(toml_string.as_bytes())
        .map_err(|e| format!("Failed to write default config to {:?}: {}", config_path, e))?;

    info!("Saved default configuration to {:?}", config_path);
    Ok(())
}

/// Reads the config at `config_path`, writing the defaults there if it does not exist.
/// Unreadable or malformed files fall back to defaults.
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(
            "Config file not found at {:?}. Creating and using default configuration.",
            config_path
        );
        let default_config = Config::default();
        if let Err(e) = save_default_config(config_path, &default_config) {
            warn!("Failed to save default configuration: {}", e);
        }
        return default_config;
    }

    info!("Loading configuration from {:?}", config_path);
    match fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(loaded_config) => {
                info!("Configuration loaded successfully.");
                loaded_config
            }
            Err(e) => {
                warn!(
                    "Failed to parse config file at {:?}: {}. Using default configuration.",
                    config_path, e
                );
                Config::default()
            }
        },
        Err(e) => {
            warn!(
                "Failed to read config file at {:?}: {}. Using default configuration.",
                config_path, e
            );
            Config::default()
        }
    }
}

pub fn load_config() -> Config {
    match get_config_path() {
        Some(config_path) => load_config_from(&config_path),
        None => {
            warn!("Could not determine config directory. Using default configuration.");
            Config::default()
        }
    }
}
