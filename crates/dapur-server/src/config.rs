use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use dapur_llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, LlmConfig, ProviderKind};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "secret",
];

const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub llm: LlmConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("llm", &self.llm)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; startup refuses to continue on a missing
    /// or weak signing secret.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("DAPUR_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("DAPUR_JWT_SECRET is unset or still a placeholder");
        }
        if jwt_secret.len() < MIN_SECRET_LEN {
            bail!("DAPUR_JWT_SECRET must be at least {} bytes", MIN_SECRET_LEN);
        }

        let db_path = lookup("DAPUR_DB_PATH").unwrap_or_else(|| "dapur.db".into()).into();
        let host = lookup("DAPUR_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("DAPUR_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("DAPUR_PORT is not a valid port")?;

        let provider: ProviderKind = lookup("DAPUR_LLM_PROVIDER")
            .unwrap_or_else(|| "openrouter".into())
            .parse()?;
        let timeout = match lookup("DAPUR_LLM_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .context("DAPUR_LLM_TIMEOUT_SECS is not a whole number of seconds")?,
            ),
            None => DEFAULT_TIMEOUT,
        };

        let llm = LlmConfig {
            provider,
            api_key: lookup("OPENROUTER_API_KEY"),
            base_url: lookup("DAPUR_LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            model: lookup("DAPUR_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            timeout,
        };

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
            llm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("DAPUR_JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.db_path, PathBuf::from("dapur.db"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.llm.provider, ProviderKind::OpenRouter);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llm.timeout, DEFAULT_TIMEOUT);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn missing_or_weak_secret_fails() {
        assert!(load(&[]).is_err());
        assert!(load(&[("DAPUR_JWT_SECRET", "")]).is_err());
        assert!(load(&[("DAPUR_JWT_SECRET", "dev-secret-change-me")]).is_err());
        assert!(load(&[("DAPUR_JWT_SECRET", "short")]).is_err());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("DAPUR_JWT_SECRET", SECRET),
            ("DAPUR_PORT", "8080"),
            ("DAPUR_LLM_PROVIDER", "fake"),
            ("DAPUR_LLM_TIMEOUT_SECS", "5"),
            ("OPENROUTER_API_KEY", "sk-or-test"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.llm.provider, ProviderKind::Fake);
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-or-test"));
    }

    #[test]
    fn bad_values_fail() {
        assert!(load(&[("DAPUR_JWT_SECRET", SECRET), ("DAPUR_PORT", "http")]).is_err());
        assert!(load(&[("DAPUR_JWT_SECRET", SECRET), ("DAPUR_LLM_PROVIDER", "openai")]).is_err());
        assert!(load(&[("DAPUR_JWT_SECRET", SECRET), ("DAPUR_LLM_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = load(&[("DAPUR_JWT_SECRET", SECRET), ("OPENROUTER_API_KEY", "sk-or-test")]).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains(SECRET));
        assert!(!debug.contains("sk-or-test"));
    }
}
