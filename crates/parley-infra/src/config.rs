//! Application configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use parley_types::config::AppConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Resolve a configured file name against the data directory.
///
/// Absolute paths are used as given.
pub fn resolve_path(data_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}

/// Read the system instruction sent with every model request.
///
/// A missing, unreadable or blank file means no system instruction.
pub async fn load_system_instruction(data_dir: &Path, config: &AppConfig) -> Option<String> {
    let path = resolve_path(data_dir, &config.model.system_instruction_file);

    match tokio::fs::read_to_string(&path).await {
        Ok(content) if content.trim().is_empty() => {
            tracing::warn!("System instruction file {} is empty", path.display());
            None
        }
        Ok(content) => {
            tracing::debug!(chars = content.len(), "Loaded system instruction from {}", path.display());
            Some(content)
        }
        Err(err) => {
            tracing::warn!(
                "No system instruction loaded from {}: {err}",
                path.display()
            );
            None
        }
    }
}

/// Path of the chat history file.
pub fn history_path(data_dir: &Path, config: &AppConfig) -> PathBuf {
    resolve_path(data_dir, &config.store.history_file)
}
