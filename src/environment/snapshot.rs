//! Environment and secret-file collection.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinError;
use walkdir::WalkDir;

use crate::config::EnvironmentConfig;

/// Process environment plus secret files, as served by `/` and `/json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvSnapshot {
    pub envs: BTreeMap<String, String>,
    /// Absent when no secret file was read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<BTreeMap<String, String>>,
}

/// Collect a snapshot on a blocking thread.
pub async fn snapshot(config: Arc<EnvironmentConfig>) -> Result<EnvSnapshot, JoinError> {
    tokio::task::spawn_blocking(move || collect(&config)).await
}

pub fn collect(config: &EnvironmentConfig) -> EnvSnapshot {
    let envs = std::env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .collect();
    let secrets = read_secrets(&config.secrets_dirs);

    EnvSnapshot {
        envs,
        file: (!secrets.is_empty()).then_some(secrets),
    }
}

/// Read every file below `dirs`, keyed by its upper-cased file name.
///
/// Later files win when names collide.
pub fn read_secrets(dirs: &[PathBuf]) -> BTreeMap<String, String> {
    let mut secrets = BTreeMap::new();
    if dirs.is_empty() {
        return secrets;
    }
    tracing::info!(dirs = ?dirs, "Reading secret directories");

    for dir in dirs {
        for entry in WalkDir::new(dir).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if let Some((key, value)) = read_secret(entry.path()) {
                        secrets.insert(key, value);
                    }
                }
                Err(e) => tracing::error!(dir = %dir.display(), error = %e, "Failed to walk secret directory"),
            }
        }
    }
    secrets
}

fn read_secret(path: &Path) -> Option<(String, String)> {
    // Follows symlinks, so mounted secrets that link into a data dir are read.
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Something went wrong with access to file");
            return None;
        }
    };
    if metadata.is_dir() {
        return None;
    }

    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Can't read from file");
            return None;
        }
    };
    let key = path.file_name()?.to_string_lossy().to_uppercase();
    Some((key, String::from_utf8_lossy(&data).into_owned()))
}
