use tracing::info;
use url::Url;

use crate::error::PredictError;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "NEUROCHECK_BACKEND_URL";
/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "NEUROCHECK_API_TOKEN";

/// Connection settings for the inference backend, supplied by the host
/// application. Both values are opaque strings to this crate; the token is
/// never logged.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    base_url: String,
    token: String,
}

impl BackendConfig {
    /// Create a config from an explicit base URL and bearer token.
    ///
    /// The URL must be absolute http(s). A trailing slash is trimmed so
    /// endpoint paths can be appended directly.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, PredictError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/').to_string();

        let parsed = Url::parse(&trimmed).map_err(|e| {
            PredictError::Config(format!("Invalid backend URL '{}': {}", trimmed, e))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PredictError::Config(format!(
                "Backend URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: trimmed,
            token: token.into(),
        })
    }

    /// Read the backend URL and token from `NEUROCHECK_BACKEND_URL` and
    /// `NEUROCHECK_API_TOKEN`.
    pub fn from_env() -> Result<Self, PredictError> {
        let base_url = std::env::var(BASE_URL_ENV)
            .map_err(|_| PredictError::Config(format!("{} is not set", BASE_URL_ENV)))?;
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| PredictError::Config(format!("{} is not set", TOKEN_ENV)))?;
        info!("Loaded backend config from environment ({})", BASE_URL_ENV);
        Self::new(base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Full URL for a path under the backend root.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = BackendConfig::new("https://api.example.com/", "tok").unwrap();
        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(config.endpoint("/predict/eeg"), "https://api.example.com/predict/eeg");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = BackendConfig::new("not a url", "tok");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid backend URL"));
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let result = BackendConfig::new("ftp://api.example.com", "tok");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("http or https"));
    }

    #[test]
    fn test_endpoint_joins_health_path() {
        let config = BackendConfig::new("http://127.0.0.1:8080", "tok").unwrap();
        assert_eq!(config.endpoint("/health"), "http://127.0.0.1:8080/health");
    }

    #[test]
    fn test_from_env_round_trip() {
        // Single test covering both the missing and present cases, since
        // parallel tests sharing process env would race.
        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(TOKEN_ENV);
        assert!(BackendConfig::from_env().is_err());

        std::env::set_var(BASE_URL_ENV, "https://api.example.com");
        std::env::set_var(TOKEN_ENV, "secret");
        let config = BackendConfig::from_env().unwrap();
        assert_eq!(config.base_url(), "https://api.example.com");

        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(TOKEN_ENV);
    }
}
