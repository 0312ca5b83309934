use crate::feeds::oauth::OAuthCredentials;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub twitter: TwitterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

/// The credentials file does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingConfig {
    pub path: PathBuf,
}

impl fmt::Display for MissingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You have not created your config file at {}. Create it with a [twitter] table \
             containing consumer_key, consumer_secret, access_token and access_token_secret.",
            self.path.display()
        )
    }
}

impl std::error::Error for MissingConfig {}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("retweet-analyser")
            .join("config.toml")
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MissingConfig {
                path: path.to_path_buf(),
            }
            .into());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("consumer_key", &self.twitter.consumer_key),
            ("consumer_secret", &self.twitter.consumer_secret),
            ("access_token", &self.twitter.access_token),
            ("access_token_secret", &self.twitter.access_token_secret),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("twitter.{} must not be empty", name));
            }
        }
        Ok(())
    }

    pub fn credentials(&self) -> OAuthCredentials {
        OAuthCredentials {
            consumer_key: self.twitter.consumer_key.clone(),
            consumer_secret: self.twitter.consumer_secret.clone(),
            access_token: self.twitter.access_token.clone(),
            access_token_secret: self.twitter.access_token_secret.clone(),
        }
    }
}
