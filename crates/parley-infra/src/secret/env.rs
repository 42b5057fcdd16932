//! Environment-based API key lookup.
//!
//! The key is read from the process environment after `.env` files have been
//! loaded. Variables already set in the environment are never overridden by
//! a `.env` file.

use std::path::Path;

use secrecy::SecretString;

/// Variables checked for the Gemini API key, highest priority first.
pub const API_KEY_VARS: [&str; 3] = ["PARLEY_API_KEY", "API_KEY", "GEMINI_API_KEY"];

/// Load `.env` from the working directory and from `data_dir`.
///
/// Missing files are skipped silently.
pub fn load_dotenv(data_dir: &Path) {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let data_env = data_dir.join(".env");
    if data_env.is_file() {
        match dotenv::from_path(&data_env) {
            Ok(()) => tracing::debug!("Loaded environment from {}", data_env.display()),
            Err(err) => tracing::warn!("Failed to load {}: {err}", data_env.display()),
        }
    }
}

/// Resolve the API key from the first non-empty variable in [`API_KEY_VARS`].
pub fn resolve_api_key() -> Option<SecretString> {
    API_KEY_VARS.iter().find_map(|name| match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            tracing::debug!(source = %name, "Resolved API key");
            Some(SecretString::from(value.trim().to_string()))
        }
        // Unset or not valid Unicode.
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    // All environment mutation lives in one test so parallel tests never race.
    #[test]
    fn test_resolve_api_key_priority_and_dotenv() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".env"), "GEMINI_API_KEY=from-file\n").unwrap();

        // SAFETY: the variables touched here are used by no other test.
        unsafe {
            for name in API_KEY_VARS {
                std::env::remove_var(name);
            }
        }
        load_dotenv(tmp.path());
        assert_eq!(resolve_api_key().unwrap().expose_secret(), "from-file");

        unsafe {
            std::env::set_var("API_KEY", "  ");
        }
        assert_eq!(resolve_api_key().unwrap().expose_secret(), "from-file");

        unsafe {
            std::env::set_var("PARLEY_API_KEY", "primary");
        }
        assert_eq!(resolve_api_key().unwrap().expose_secret(), "primary");

        unsafe {
            for name in API_KEY_VARS {
                std::env::remove_var(name);
            }
        }
        assert!(resolve_api_key().is_none());
    }
}
