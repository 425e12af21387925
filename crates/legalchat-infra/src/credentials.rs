//! API credentials for the model and search providers.
//!
//! Credentials come from the process environment. A `.env` file in the
//! working directory is loaded first when present; variables already set in
//! the environment win over the file.

use secrecy::SecretString;
use tracing::debug;

use legalchat_types::error::ConfigError;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";

/// Load `.env` from the working directory if one exists.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => debug!(error = %e, "ignoring unreadable .env"),
    }
}

/// Both provider keys. Neither is ever logged.
pub struct Credentials {
    pub openai_api_key: SecretString,
    pub tavily_api_key: SecretString,
}

impl Credentials {
    pub fn new(openai_api_key: impl Into<String>, tavily_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: SecretString::from(openai_api_key.into()),
            tavily_api_key: SecretString::from(tavily_api_key.into()),
        }
    }

    /// Read both keys from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both keys through `lookup`. Unset and empty values are missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
                .ok_or(ConfigError::MissingCredential(name))
        };

        Ok(Self {
            openai_api_key: require(OPENAI_API_KEY)?,
            tavily_api_key: require(TAVILY_API_KEY)?,
        })
    }
}
