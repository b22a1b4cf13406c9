use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_RESUME_PATH: &str = "data/resume.json";

/// Application configuration loaded from environment variables.
///
/// The upstream credential is optional here: a missing key does not stop the
/// process, it makes every chat request fail with a configuration error.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub resume_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        dotenvy::from_filename(".env.local").ok();

        Ok(Config {
            api_key: optional_env("DEEPSEEK_API_KEY"),
            model: optional_env("DEEPSEEK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_url: optional_env("DEEPSEEK_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            resume_path: optional_env("RESUME_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESUME_PATH)),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "7071".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The configured credential, if it is present and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests(api_key: Option<&str>) -> Self {
        Config {
            api_key: api_key.map(str::to_string),
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            resume_path: PathBuf::from(DEFAULT_RESUME_PATH),
            port: 7071,
            rust_log: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credential_counts_as_missing() {
        assert_eq!(Config::for_tests(Some("   ")).credential(), None);
        assert_eq!(Config::for_tests(None).credential(), None);
    }

    #[test]
    fn test_credential_is_trimmed() {
        assert_eq!(Config::for_tests(Some(" sk-test \n")).credential(), Some("sk-test"));
    }
}
