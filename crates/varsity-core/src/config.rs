//! Configuration: backend credentials, domain restriction, model selection.
//!
//! Credentials are resolved once at startup and validated before any backend
//! call, so a missing key fails fast with the key name instead of surfacing
//! later as an opaque authentication error.
//!
//! Priority order follows ~/.config/varsity/secret.json over environment
//! variables, with the file read-only and never written by the application.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, VarsityError};

/// Default chat model identifier.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-turbo";

const SECRET_FILE: &str = "secret.json";
const CONFIG_DIR: &str = "varsity";

/// API credentials for the two external backends.
///
/// # Security Note
///
/// Values are never logged and never echoed into error messages; validation
/// failures name only the missing key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub google_api_key: String,
    #[serde(default)]
    pub google_cse_id: String,
}

impl Credentials {
    /// Loads credentials with file-over-environment priority and validates
    /// that every key is present.
    ///
    /// 1. Environment variables (`OPENAI_API_KEY`, `GOOGLE_API_KEY`,
    ///    `GOOGLE_CSE_ID`) form the base.
    /// 2. Non-empty fields in `~/.config/varsity/secret.json` override them.
    pub fn load() -> Result<Self> {
        let mut credentials = Self::from_env();
        if let Some(path) = Self::default_path() {
            if path.exists() {
                credentials.merge(Self::load_from(&path)?);
            }
        }
        credentials.validate()?;
        Ok(credentials)
    }

    /// Reads credentials from the process environment; missing variables
    /// become empty strings and are caught by [`Credentials::validate`].
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            google_api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
            google_cse_id: env::var("GOOGLE_CSE_ID").unwrap_or_default(),
        }
    }

    /// Loads credentials from a JSON file at an explicit path (also used by
    /// tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let credentials = serde_json::from_str(&content)?;
        Ok(credentials)
    }

    /// Overlays non-empty fields from `other` onto `self`.
    pub fn merge(&mut self, other: Credentials) {
        if !other.openai_api_key.trim().is_empty() {
            self.openai_api_key = other.openai_api_key;
        }
        if !other.google_api_key.trim().is_empty() {
            self.google_api_key = other.google_api_key;
        }
        if !other.google_cse_id.trim().is_empty() {
            self.google_cse_id = other.google_cse_id;
        }
    }

    /// Fails with the name of the first missing key.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("GOOGLE_API_KEY", &self.google_api_key),
            ("GOOGLE_CSE_ID", &self.google_cse_id),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(VarsityError::config(format!(
                    "missing credential: {name} (set the environment variable or add it to {})",
                    Self::default_path()
                        .unwrap_or_else(|| PathBuf::from(SECRET_FILE))
                        .display()
                )));
            }
        }
        Ok(())
    }

    /// Returns the default path to secret.json: ~/.config/varsity/secret.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(SECRET_FILE))
    }
}

/// The institution the chatbot is restricted to.
#[derive(Debug, Clone)]
pub struct DomainConfig {
    /// Display name used in classification and scope-limitation prompts.
    pub institution: String,
    /// Canonical answer the domain probe must return for in-scope turns.
    pub scope_token: String,
    /// Banner title shown by the interactive shell.
    pub title: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            institution: "Claremont Graduate University (CGU)".to_string(),
            scope_token: "cgu".to_string(),
            title: "Claremont Graduate University Chatbot".to_string(),
        }
    }
}

/// Chat model selection.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

impl ModelConfig {
    /// Reads the model name from `OPENAI_MODEL_NAME`, defaulting to
    /// [`DEFAULT_CHAT_MODEL`].
    pub fn from_env() -> Self {
        Self {
            model: env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn full_credentials() -> Credentials {
        Credentials {
            openai_api_key: "sk-test".to_string(),
            google_api_key: "g-test".to_string(),
            google_cse_id: "cse-test".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_credentials() {
        assert!(full_credentials().validate().is_ok());
    }

    #[test]
    fn test_validate_names_missing_key() {
        let mut credentials = full_credentials();
        credentials.google_cse_id = String::new();
        let err = credentials.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("GOOGLE_CSE_ID"));
    }

    #[test]
    fn test_validate_rejects_whitespace_only_key() {
        let mut credentials = full_credentials();
        credentials.openai_api_key = "   ".to_string();
        let err = credentials.validate().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_validate_never_echoes_values() {
        let mut credentials = full_credentials();
        credentials.google_api_key = String::new();
        let message = credentials.validate().unwrap_err().to_string();
        assert!(!message.contains("sk-test"));
        assert!(!message.contains("cse-test"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"openai_api_key": "sk-file", "google_api_key": "g-file", "google_cse_id": "cse-file"}}"#
        )
        .unwrap();

        let credentials = Credentials::load_from(&path).unwrap();
        assert_eq!(credentials.openai_api_key, "sk-file");
        assert_eq!(credentials.google_cse_id, "cse-file");
    }

    #[test]
    fn test_load_from_partial_file_defaults_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, r#"{"openai_api_key": "sk-file"}"#).unwrap();

        let credentials = Credentials::load_from(&path).unwrap();
        assert_eq!(credentials.openai_api_key, "sk-file");
        assert!(credentials.google_api_key.is_empty());
    }

    #[test]
    fn test_load_from_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, "not json").unwrap();

        let err = Credentials::load_from(&path).unwrap_err();
        assert!(matches!(err, VarsityError::Serialization { .. }));
    }

    #[test]
    fn test_merge_file_wins_over_base() {
        let mut base = Credentials {
            openai_api_key: "sk-env".to_string(),
            google_api_key: "g-env".to_string(),
            google_cse_id: "cse-env".to_string(),
        };
        base.merge(Credentials {
            openai_api_key: "sk-file".to_string(),
            google_api_key: String::new(),
            google_cse_id: String::new(),
        });

        // File value replaces the env value; empty file fields leave env intact.
        assert_eq!(base.openai_api_key, "sk-file");
        assert_eq!(base.google_api_key, "g-env");
        assert_eq!(base.google_cse_id, "cse-env");
    }

    #[test]
    fn test_domain_config_defaults() {
        let domain = DomainConfig::default();
        assert!(domain.institution.contains("Claremont"));
        assert_eq!(domain.scope_token, "cgu");
    }

    #[test]
    fn test_model_config_default() {
        assert_eq!(ModelConfig::default().model, DEFAULT_CHAT_MODEL);
    }
}
