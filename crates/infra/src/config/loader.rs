//! Configuration loader
//!
//! Loads client configuration from a file (if one exists) and environment
//! variables.
//!
//! ## Loading Strategy
//! 1. Probe the standard locations for a config file
//! 2. If none exists, start from defaults
//! 3. Apply environment overrides on top
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `STUDENTPORTAL_API_BASE_URL`: Backend base address
//! - `STUDENTPORTAL_API_TIMEOUT_MS`: Request timeout in milliseconds
//! - `STUDENTPORTAL_SESSION_BACKEND`: `memory`, `keychain` or `file`
//! - `STUDENTPORTAL_SESSION_PATH`: Session file for the `file` backend
//! - `STUDENTPORTAL_LOG_FORMAT`: `pretty` or `json`
//! - `STUDENTPORTAL_LOG_LEVEL`: Default `EnvFilter` directive
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./studentportal.toml` or `./studentportal.json` (current working
//!    directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `config.toml` or `config.json` in the user config directory
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use studentportal_domain::{ClientConfig, Config, LogFormat, PortalError, Result, SessionBackend};

pub const ENV_API_BASE_URL: &str = "STUDENTPORTAL_API_BASE_URL";
pub const ENV_API_TIMEOUT_MS: &str = "STUDENTPORTAL_API_TIMEOUT_MS";
pub const ENV_SESSION_BACKEND: &str = "STUDENTPORTAL_SESSION_BACKEND";
pub const ENV_SESSION_PATH: &str = "STUDENTPORTAL_SESSION_PATH";
pub const ENV_LOG_FORMAT: &str = "STUDENTPORTAL_LOG_FORMAT";
pub const ENV_LOG_LEVEL: &str = "STUDENTPORTAL_LOG_LEVEL";

/// Load configuration with automatic fallback strategy
///
/// Uses the first config file found by [`probe_config_paths`], or defaults
/// when there is none, then applies environment overrides.
///
/// # Errors
/// Returns `PortalError::Config` if:
/// - A config file exists but is invalid
/// - An environment override has an invalid value
pub fn load() -> Result<Config> {
    let config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PortalError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PortalError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PortalError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PortalError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Apply `STUDENTPORTAL_*` environment variables on top of `config`
///
/// # Errors
/// Returns `PortalError::Config` when a variable is set to an invalid value.
pub fn apply_env_overrides(mut config: Config) -> Result<Config> {
    if let Some(base_url) = env_var(ENV_API_BASE_URL) {
        config.api.base_url = base_url;
    }

    if let Some(timeout) = env_var(ENV_API_TIMEOUT_MS) {
        config.api.timeout_ms = timeout.parse::<u64>().map_err(|e| {
            PortalError::Config(format!("Invalid {ENV_API_TIMEOUT_MS} '{timeout}': {e}"))
        })?;
    }

    if let Some(backend) = env_var(ENV_SESSION_BACKEND) {
        config.session.backend = backend.parse::<SessionBackend>().map_err(PortalError::Config)?;
    }

    if let Some(path) = env_var(ENV_SESSION_PATH) {
        config.session.path = Some(PathBuf::from(path));
    }

    if let Some(format) = env_var(ENV_LOG_FORMAT) {
        config.logging.format = format.parse::<LogFormat>().map_err(PortalError::Config)?;
    }

    if let Some(level) = env_var(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }

    validate(config)
}

fn validate(mut config: Config) -> Result<Config> {
    config.api = ClientConfig::normalized(config.api);

    if config.api.base_url.is_empty() {
        return Err(PortalError::Config("API base URL must not be empty".to_string()));
    }
    url::Url::parse(&config.api.base_url).map_err(|e| {
        PortalError::Config(format!("Invalid API base URL '{}': {e}", config.api.base_url))
    })?;
    if config.api.timeout_ms == 0 {
        return Err(PortalError::Config("API timeout must be greater than zero".to_string()));
    }

    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `PortalError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: Config = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PortalError::Config(format!("Invalid TOML format: {e}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| PortalError::Config(format!("Invalid JSON format: {e}")))?,
        _ => return Err(PortalError::Config(format!("Unsupported config format: {extension}"))),
    };

    validate(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Some(dirs) = ProjectDirs::from("", "", "studentportal") {
        let config_dir = dirs.config_dir();
        candidates.extend([config_dir.join("config.toml"), config_dir.join("config.json")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> [PathBuf; 4] {
    [
        dir.join("studentportal.toml"),
        dir.join("studentportal.json"),
        dir.join("config.toml"),
        dir.join("config.json"),
    ]
}

/// Non-empty environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 6] = [
        ENV_API_BASE_URL,
        ENV_API_TIMEOUT_MS,
        ENV_SESSION_BACKEND,
        ENV_SESSION_PATH,
        ENV_LOG_FORMAT,
        ENV_LOG_LEVEL,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        (temp_file, path)
    }

    #[test]
    fn test_env_overrides_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_API_BASE_URL, "http://127.0.0.1:8000/api/");
        std::env::set_var(ENV_API_TIMEOUT_MS, "2500");
        std::env::set_var(ENV_SESSION_BACKEND, "Keychain");
        std::env::set_var(ENV_SESSION_PATH, "/tmp/portal/session.json");
        std::env::set_var(ENV_LOG_FORMAT, "json");
        std::env::set_var(ENV_LOG_LEVEL, "debug");

        let result = apply_env_overrides(Config::default());
        clear_env();

        let config = result.expect("overrides should apply");
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.api.timeout_ms, 2500);
        assert_eq!(config.session.backend, SessionBackend::Keychain);
        assert_eq!(config.session.path, Some(PathBuf::from("/tmp/portal/session.json")));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_overrides_none_set_keeps_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let config = apply_env_overrides(Config::default()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_invalid_timeout() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_API_TIMEOUT_MS, "ten seconds");

        let result = apply_env_overrides(Config::default());
        clear_env();

        assert!(matches!(result, Err(PortalError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_env_invalid_backend() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_SESSION_BACKEND, "sqlite");

        let result = apply_env_overrides(Config::default());
        clear_env();

        assert!(matches!(result, Err(PortalError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_json() {
        let (_temp, path) = temp_config(
            r#"{
                "api": {"base_url": "http://localhost:8000/api", "timeout_ms": 3000},
                "session": {"backend": "memory"}
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("Should load config from JSON");
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.timeout_ms, 3000);
        assert_eq!(config.session.backend, SessionBackend::Memory);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let (_temp, path) = temp_config(
            r#"
[api]
base_url = "http://localhost:8000/api/"

[logging]
format = "json"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("Should load config from TOML");
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.session, studentportal_domain::SessionConfig::default());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(PortalError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let (_temp, path) = temp_config(r#"{ "this is": "not valid json" "#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_rejects_zero_timeout() {
        let result = parse_config("[api]\ntimeout_ms = 0\n", Path::new("test.toml"));
        assert!(matches!(result, Err(PortalError::Config(_))));
    }

    #[test]
    fn test_parse_config_rejects_bad_url() {
        let result = parse_config(r#"{"api": {"base_url": "not a url"}}"#, Path::new("test.json"));
        assert!(matches!(result, Err(PortalError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
