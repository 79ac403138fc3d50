//! Configuration loading from an optional TOML file and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{AppConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Variable naming an optional TOML file that seeds the configuration.
pub const CONFIG_FILE_VAR: &str = "ENVPROBE_CONFIG";

pub const LISTEN_ADDR_VAR: &str = "LISTEN_ADDR";
pub const HTTP_HOSTS_VAR: &str = "HTTP_HOSTS";
pub const HTTP_CHECK_PERIOD_VAR: &str = "HTTP_CHECK_PERIOD";
pub const HTTP_CHECK_TIMEOUT_VAR: &str = "HTTP_CHECK_TIMEOUT";
pub const HTTP_CHECK_MAX_REDIRECTS_VAR: &str = "HTTP_CHECK_MAX_REDIRECTS";
pub const HTTP_CHECK_INSECURE_VAR: &str = "HTTP_CHECK_INSECURE";
pub const SECRETS_DIRS_VAR: &str = "SECRETS_DIRS";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "IO error reading {}: {}", path.display(), e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// An environment value that could not be applied.
///
/// These never abort startup: the value already in place (from the config
/// file or the compiled-in default) is kept, and the error is logged once
/// logging is up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ignoring {var}={value:?}: {reason}")]
pub struct EnvOverrideError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Configuration together with the environment values that were rejected.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub rejected: Vec<EnvOverrideError>,
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    let config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration from the process environment.
pub fn load_from_env() -> Result<LoadedConfig, ConfigError> {
    load_with(|name| std::env::var(name).ok())
}

/// Load configuration using `lookup` to read variables.
///
/// Empty values are treated as unset.
pub fn load_with<F>(lookup: F) -> Result<LoadedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let mut config = match var(CONFIG_FILE_VAR) {
        Some(path) => load_config(Path::new(path.trim()))?,
        None => AppConfig::default(),
    };

    let mut rejected = Vec::new();

    if let Some(addr) = var(LISTEN_ADDR_VAR) {
        config.server.listen_addr = addr.trim().to_string();
    }
    if let Some(hosts) = var(HTTP_HOSTS_VAR) {
        config.probe.hosts = split_list(&hosts, ';').collect();
    }
    if let Some(dirs) = var(SECRETS_DIRS_VAR) {
        config.environment.secrets_dirs = split_list(&dirs, ',').map(PathBuf::from).collect();
    }
    if let Some(raw) = var(HTTP_CHECK_PERIOD_VAR) {
        match parse_secs(&raw) {
            Ok(secs) => config.probe.period_secs = secs,
            Err(reason) => rejected.push(reject(HTTP_CHECK_PERIOD_VAR, raw, reason)),
        }
    }
    if let Some(raw) = var(HTTP_CHECK_TIMEOUT_VAR) {
        match parse_secs(&raw) {
            Ok(secs) => config.probe.timeout_secs = secs,
            Err(reason) => rejected.push(reject(HTTP_CHECK_TIMEOUT_VAR, raw, reason)),
        }
    }
    if let Some(raw) = var(HTTP_CHECK_MAX_REDIRECTS_VAR) {
        match raw.trim().parse::<usize>() {
            Ok(hops) => config.probe.max_redirects = hops,
            Err(e) => rejected.push(reject(HTTP_CHECK_MAX_REDIRECTS_VAR, raw, e.to_string())),
        }
    }
    if let Some(raw) = var(HTTP_CHECK_INSECURE_VAR) {
        match parse_bool(&raw) {
            Some(flag) => config.probe.accept_invalid_certs = flag,
            None => rejected.push(reject(HTTP_CHECK_INSECURE_VAR, raw, "expected true or false".into())),
        }
    }
    if let Some(level) = var(LOG_LEVEL_VAR) {
        config.observability.log_level = level.trim().to_string();
    }
    if let Some(raw) = var(LOG_FORMAT_VAR) {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => config.observability.log_format = LogFormat::Json,
            "pretty" => config.observability.log_format = LogFormat::Pretty,
            _ => rejected.push(reject(LOG_FORMAT_VAR, raw, "expected json or pretty".into())),
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig { config, rejected })
}

fn split_list(raw: &str, separator: char) -> impl Iterator<Item = String> + '_ {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_secs(raw: &str) -> Result<u64, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(secs) => Ok(secs),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn reject(var: &'static str, value: String, reason: String) -> EnvOverrideError {
    EnvOverrideError { var, value, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let loaded = load_with(env(&[])).unwrap();
        assert_eq!(loaded.config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(loaded.config.probe.period_secs, 5);
        assert!(loaded.config.probe.hosts.is_empty());
        assert!(loaded.rejected.is_empty());
    }

    #[test]
    fn hosts_are_split_in_order() {
        let loaded = load_with(env(&[(HTTP_HOSTS_VAR, "http://a.test; http://b.test;;")])).unwrap();
        assert_eq!(loaded.config.probe.hosts, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn secrets_dirs_are_comma_separated() {
        let loaded = load_with(env(&[(SECRETS_DIRS_VAR, "/run/a,/run/b")])).unwrap();
        assert_eq!(
            loaded.config.environment.secrets_dirs,
            vec![PathBuf::from("/run/a"), PathBuf::from("/run/b")]
        );
    }

    #[test]
    fn malformed_period_keeps_default() {
        let loaded = load_with(env(&[(HTTP_CHECK_PERIOD_VAR, "soon")])).unwrap();
        assert_eq!(loaded.config.probe.period_secs, 5);
        assert_eq!(loaded.rejected.len(), 1);
        assert_eq!(loaded.rejected[0].var, HTTP_CHECK_PERIOD_VAR);
    }

    #[test]
    fn zero_period_is_rejected() {
        let loaded = load_with(env(&[(HTTP_CHECK_PERIOD_VAR, "0")])).unwrap();
        assert_eq!(loaded.config.probe.period_secs, 5);
        assert_eq!(loaded.rejected.len(), 1);
    }

    #[test]
    fn valid_overrides_apply() {
        let loaded = load_with(env(&[
            (LISTEN_ADDR_VAR, "127.0.0.1:9000"),
            (HTTP_CHECK_PERIOD_VAR, "2"),
            (HTTP_CHECK_TIMEOUT_VAR, "3"),
            (HTTP_CHECK_INSECURE_VAR, "yes"),
            (LOG_FORMAT_VAR, "Pretty"),
        ]))
        .unwrap();
        let config = loaded.config;
        assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.probe.period_secs, 2);
        assert_eq!(config.probe.timeout_secs, 3);
        assert!(config.probe.accept_invalid_certs);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn file_is_seeded_then_overridden() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[probe]\nhosts = [\"http://file.test\"]\nperiod_secs = 30\n\n[server]\nlisten_addr = \"127.0.0.1:7000\""
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let loaded = load_with(env(&[
            (CONFIG_FILE_VAR, path.as_str()),
            (HTTP_CHECK_PERIOD_VAR, "bogus"),
            (LISTEN_ADDR_VAR, "127.0.0.1:7001"),
        ]))
        .unwrap();
        assert_eq!(loaded.config.probe.hosts, vec!["http://file.test"]);
        assert_eq!(loaded.config.probe.period_secs, 30);
        assert_eq!(loaded.config.server.listen_addr, "127.0.0.1:7001");
    }

    #[test]
    fn invalid_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[probe]\nperiod_secs = 0").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let err = load_with(env(&[(CONFIG_FILE_VAR, path.as_str())])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_with(env(&[(CONFIG_FILE_VAR, "/nonexistent/envprobe.toml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
