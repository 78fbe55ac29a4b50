//! Provider credential loading.
//!
//! Credentials live in a JSON file separate from config.ini so the config
//! can be shared freely. Missing or incomplete credentials are fatal at
//! startup; no tick begins without them.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Credential loading errors. All fatal at startup.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// Credentials file does not exist
    #[error("credentials file not found: {0} (create it with your provider keys)")]
    NotFound(String),

    /// Failed to read the credentials file
    #[error("failed to read credentials file: {0}")]
    Read(std::io::Error),

    /// Credentials file is not valid JSON or missing keys
    #[error("credentials file is corrupted or incomplete: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required credential is present but empty
    #[error("credentials file has an empty value for required key '{0}'")]
    EmptyKey(&'static str),
}

/// API credentials for the three providers.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// OAuth2 client id for the position provider.
    pub client_id: String,
    /// OAuth2 client secret for the position provider.
    pub client_secret: String,
    /// API key for the schedule provider.
    pub schedule_api_key: String,
    /// API key for the weather provider.
    pub weather_api_key: String,
}

impl Credentials {
    /// Load and validate credentials from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CredentialsError> {
        if !path.exists() {
            return Err(CredentialsError::NotFound(path.display().to_string()));
        }

        let data = std::fs::read(path).map_err(CredentialsError::Read)?;
        let credentials: Credentials = serde_json::from_slice(&data)?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Reject empty values; serde already rejects missing keys.
    fn validate(&self) -> Result<(), CredentialsError> {
        if self.client_id.is_empty() {
            return Err(CredentialsError::EmptyKey("client_id"));
        }
        if self.client_secret.is_empty() {
            return Err(CredentialsError::EmptyKey("client_secret"));
        }
        if self.schedule_api_key.is_empty() {
            return Err(CredentialsError::EmptyKey("schedule_api_key"));
        }
        if self.weather_api_key.is_empty() {
            return Err(CredentialsError::EmptyKey("weather_api_key"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("flightpanel_creds_{}_{}.json", name, nanos))
    }

    const VALID: &str = r#"{
        "client_id": "id",
        "client_secret": "secret",
        "schedule_api_key": "aero",
        "weather_api_key": "owm"
    }"#;

    #[test]
    fn valid_file_loads() {
        let path = temp_file("valid");
        std::fs::write(&path, VALID).unwrap();

        let credentials = Credentials::load(&path).unwrap();
        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.weather_api_key, "owm");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_not_found() {
        let result = Credentials::load(&temp_file("missing"));
        assert!(matches!(result, Err(CredentialsError::NotFound(_))));
    }

    #[test]
    fn missing_key_is_a_parse_error() {
        let path = temp_file("incomplete");
        std::fs::write(&path, r#"{"client_id": "id"}"#).unwrap();

        let result = Credentials::load(&path);
        assert!(matches!(result, Err(CredentialsError::Parse(_))));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn empty_value_is_rejected() {
        let path = temp_file("empty");
        std::fs::write(
            &path,
            r#"{"client_id": "id", "client_secret": "", "schedule_api_key": "a", "weather_api_key": "b"}"#,
        )
        .unwrap();

        let result = Credentials::load(&path);
        assert!(matches!(
            result,
            Err(CredentialsError::EmptyKey("client_secret"))
        ));

        std::fs::remove_file(&path).unwrap();
    }
}
