//! Configuration loader
//!
//! Loads the calendar account configuration from environment variables or
//! files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `OFFDAY_API_KEY`: API key used as the bearer token (required)
//! - `OFFDAY_FULL_NAME`: Full name whose entries are polled (required)
//! - `OFFDAY_ELEMENT_ID`: Identifier of the target calendar element (required)
//! - `OFFDAY_POLL_INTERVAL`: Polling cadence in seconds (optional)
//! - `OFFDAY_BASE_URL`: Base URL of the calendar service (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./offday.json` or `./offday.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use offday_domain::constants::{DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL_SECS};
use offday_domain::{CalendarConfig, OffdayError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `OffdayError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<CalendarConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Errors
/// Returns `OffdayError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<CalendarConfig> {
    let api_key = env_var("OFFDAY_API_KEY")?;
    let full_name = env_var("OFFDAY_FULL_NAME")?;
    let element_id = env_var("OFFDAY_ELEMENT_ID")?;

    let poll_interval_secs = match std::env::var("OFFDAY_POLL_INTERVAL") {
        Ok(raw) => raw.parse::<u64>().map_err(|e| {
            OffdayError::Config(format!("Invalid poll interval: {}", e))
        })?,
        Err(_) => DEFAULT_POLL_INTERVAL_SECS,
    };
    let base_url =
        std::env::var("OFFDAY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    Ok(CalendarConfig { api_key, full_name, element_id, poll_interval_secs, base_url })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `OffdayError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<CalendarConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(OffdayError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            OffdayError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| OffdayError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `OffdayError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<CalendarConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| OffdayError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| OffdayError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(OffdayError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./offday.{json,toml}`)
/// 2. The parent directory
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("offday.json"),
            cwd.join("offday.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("offday.json"),
                exe_dir.join("offday.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `OffdayError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        OffdayError::Config(format!("Missing required environment variable: {}", key))
    })
}
