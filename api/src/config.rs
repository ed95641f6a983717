use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://sms_spam.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MODEL_PATH: &str = "model/sms_model.json";
const DEFAULT_TOKENIZER_PATH: &str = "model/tokenizer.json";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is not a valid number: {value}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Account created at startup when it does not exist yet.
#[derive(Debug, Clone)]
pub struct InitialUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub initial_user: Option<InitialUser>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_minutes = match var("ACCESS_TOKEN_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|m| (1..=MAX_TOKEN_TTL_MINUTES).contains(m))
                .ok_or(ConfigError::InvalidNumber {
                    key: "ACCESS_TOKEN_TTL_MINUTES",
                    value: raw,
                })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let initial_user = match (
            var("INITIAL_USER_USERNAME"),
            var("INITIAL_USER_EMAIL"),
            var("INITIAL_USER_FULL_NAME"),
            var("INITIAL_USER_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(full_name), Some(password)) => Some(InitialUser {
                username,
                email,
                full_name,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            jwt_secret,
            token_ttl_minutes,
            model_path: var("MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.into())
                .into(),
            tokenizer_path: var("TOKENIZER_PATH")
                .unwrap_or_else(|| DEFAULT_TOKENIZER_PATH.into())
                .into(),
            initial_user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.token_ttl_minutes, 30);
        assert_eq!(config.model_path, PathBuf::from("model/sms_model.json"));
        assert_eq!(config.tokenizer_path, PathBuf::from("model/tokenizer.json"));
        assert!(config.initial_user.is_none());
    }

    #[test]
    fn test_missing_secret() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_invalid_ttl() {
        for bad in ["abc", "0", "-5", "99999999999"] {
            let err = Config::from_lookup(lookup(&[
                ("JWT_SECRET", "s"),
                ("ACCESS_TOKEN_TTL_MINUTES", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidNumber { .. }), "{bad}");
        }
    }

    #[test]
    fn test_overrides_and_initial_user() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("ACCESS_TOKEN_TTL_MINUTES", "15"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("INITIAL_USER_USERNAME", "testuser"),
            ("INITIAL_USER_EMAIL", "test@example.com"),
            ("INITIAL_USER_FULL_NAME", "Test User"),
            ("INITIAL_USER_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.token_ttl_minutes, 15);
        assert_eq!(config.database_url, "sqlite::memory:");
        let user = config.initial_user.unwrap();
        assert_eq!(user.username, "testuser");
        assert_eq!(user.password, "secret");
    }

    #[test]
    fn test_partial_initial_user_ignored() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("INITIAL_USER_USERNAME", "testuser"),
        ]))
        .unwrap();
        assert!(config.initial_user.is_none());
    }
}
