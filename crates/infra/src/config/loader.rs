//! Configuration loader
//!
//! Loads the OAuth client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required ones are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `AUTHKIT_ISSUER`: Issuer base URL (required)
//! - `AUTHKIT_CLIENT_ID`: OAuth client id (required)
//! - `AUTHKIT_SCOPE`: Space separated default scopes
//! - `AUTHKIT_REFRESH_LIMIT`: Maximum scheduled refreshes, `-1` for unlimited
//! - `AUTHKIT_REFRESH_LEEWAY_SECS`: Seconds subtracted from token lifetimes
//! - `AUTHKIT_HTTP_TIMEOUT_SECS`: HTTP request timeout
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./authkit.toml` or `./authkit.json` (current working directory)
//! 2. `../authkit.toml` or `../authkit.json` (parent directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use authkit_domain::{AuthKitConfig, AuthKitError, RefreshLimit, Result};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["authkit.toml", "authkit.json", "../authkit.toml", "../authkit.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `AuthKitError::Configuration` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<AuthKitConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `AuthKitError::Configuration` if required variables are missing,
/// a numeric variable does not parse, or validation fails.
pub fn load_from_env() -> Result<AuthKitConfig> {
    let mut config = AuthKitConfig::new(env_var("AUTHKIT_ISSUER")?, env_var("AUTHKIT_CLIENT_ID")?);

    if let Ok(scope) = std::env::var("AUTHKIT_SCOPE") {
        config.scope = scope.split_whitespace().map(str::to_owned).collect();
    }
    if let Some(limit) = env_parse::<i64>("AUTHKIT_REFRESH_LIMIT")? {
        config.refresh_limit = RefreshLimit::from(limit);
    }
    if let Some(leeway) = env_parse::<u64>("AUTHKIT_REFRESH_LEEWAY_SECS")? {
        config.refresh_leeway_secs = leeway;
    }
    if let Some(timeout) = env_parse::<u64>("AUTHKIT_HTTP_TIMEOUT_SECS")? {
        config.http_timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations (see
/// [`probe_config_paths`]). Format is detected by file extension.
///
/// # Errors
/// Returns `AuthKitError::Configuration` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<AuthKitConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AuthKitError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AuthKitError::Configuration(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(|e| {
        AuthKitError::Configuration(format!("Failed to read config file: {e}"))
    })?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<AuthKitConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents).map_err(|e| InfraError::from(e).into()),
        _ => Err(AuthKitError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// Checks the working directory and its parent, then the executable's
/// directory and its parent.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
#[must_use]
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AuthKitError::Configuration(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable; unset is `Ok(None)`.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|e| {
            AuthKitError::Configuration(format!("Invalid value for {key}: {e}"))
        }),
        Err(_) => Ok(None),
    }
}
