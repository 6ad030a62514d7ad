use crate::error::{Error, Result};
use std::{net::SocketAddr, str::FromStr, time::Duration};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SUGGEST_API_BASE: &str = "https://suggestions.dadata.ru/suggestions/api/4_1/rs";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct SuggestConfig {
    pub api_base:   String,
    pub api_key:    String,
    pub secret_key: Option<String>,
    pub timeout:    Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl:          Duration,
    /// `None` keeps the cache unbounded.
    pub max_capacity: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl:          Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            max_capacity: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr:   SocketAddr,
    pub suggest:       SuggestConfig,
    pub cache:         CacheConfig,
    /// Bearer tokens accepted on the address routes.
    pub api_tokens:    Vec<String>,
    /// Opens the address routes to everyone. Only honored when set explicitly.
    pub auth_disabled: bool,
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = parse_or(
            "LISTEN_ADDR",
            var("LISTEN_ADDR"),
            DEFAULT_LISTEN_ADDR.parse().ok(),
        )?;

        let api_key = var("SUGGEST_API_KEY")
            .ok_or_else(|| Error::Config("SUGGEST_API_KEY is not set".into()))?;
        let timeout_secs = positive(
            "UPSTREAM_TIMEOUT_SECS",
            parse_or(
                "UPSTREAM_TIMEOUT_SECS",
                var("UPSTREAM_TIMEOUT_SECS"),
                Some(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            )?,
        )?;
        let suggest = SuggestConfig {
            api_base: var("SUGGEST_API_BASE")
                .unwrap_or_else(|| DEFAULT_SUGGEST_API_BASE.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            api_key,
            secret_key: var("SUGGEST_SECRET_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        };

        let ttl_secs = positive(
            "CACHE_TTL_SECS",
            parse_or(
                "CACHE_TTL_SECS",
                var("CACHE_TTL_SECS"),
                Some(DEFAULT_CACHE_TTL_SECS),
            )?,
        )?;
        let max_capacity = match var("CACHE_MAX_CAPACITY") {
            Some(raw) => Some(positive(
                "CACHE_MAX_CAPACITY",
                parse("CACHE_MAX_CAPACITY", &raw)?,
            )?),
            None => None,
        };

        let api_tokens: Vec<String> = var("API_TOKENS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let auth_disabled: bool = parse_or("AUTH_DISABLED", var("AUTH_DISABLED"), Some(false))?;
        if api_tokens.is_empty() && !auth_disabled {
            return Err(Error::Config(
                "API_TOKENS is not set (set AUTH_DISABLED=true to serve without auth)".into(),
            ));
        }

        Ok(Self {
            listen_addr,
            suggest,
            cache: CacheConfig {
                ttl: Duration::from_secs(ttl_secs),
                max_capacity,
            },
            api_tokens,
            auth_disabled,
        })
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {key}: {raw:?}")))
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: Option<T>) -> Result<T> {
    match raw {
        Some(raw) => parse(key, &raw),
        None => default.ok_or_else(|| Error::Config(format!("{key} is not set"))),
    }
}

fn positive(key: &str, value: u64) -> Result<u64> {
    if value == 0 {
        return Err(Error::Config(format!("{key} must be positive")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const REQUIRED: [(&str, &str); 2] = [("SUGGEST_API_KEY", "k"), ("API_TOKENS", "t0")];

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    fn with_required(extra: &[(&'static str, &'static str)]) -> Result<Config> {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend_from_slice(extra);
        config_from(&pairs)
    }

    #[test]
    fn test_defaults() {
        let config = with_required(&[]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.suggest.api_base, DEFAULT_SUGGEST_API_BASE);
        assert_eq!(config.suggest.api_key, "k");
        assert!(config.suggest.secret_key.is_none());
        assert_eq!(config.suggest.timeout, Duration::from_secs(10));
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert!(config.cache.max_capacity.is_none());
        assert_eq!(config.api_tokens, vec!["t0"]);
        assert!(!config.auth_disabled);
    }

    #[test]
    fn test_missing_api_key() {
        let err = config_from(&[("API_TOKENS", "t0")]).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("SUGGEST_API_KEY")), "{err:?}");
    }

    #[test]
    fn test_tokens_are_required() {
        for tokens in [None, Some(""), Some(" , ,")] {
            let mut pairs = vec![("SUGGEST_API_KEY", "k")];
            if let Some(tokens) = tokens {
                pairs.push(("API_TOKENS", tokens));
            }
            let err = config_from(&pairs).unwrap_err();
            assert!(matches!(err, Error::Config(ref m) if m.contains("API_TOKENS")), "{err:?}");
        }

        let err = config_from(&[("SUGGEST_API_KEY", "k"), ("AUTH_DISABLED", "false")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err:?}");
    }

    #[test]
    fn test_auth_disabled_explicitly() {
        let config = config_from(&[("SUGGEST_API_KEY", "k"), ("AUTH_DISABLED", "true")]).unwrap();
        assert!(config.auth_disabled);
        assert!(config.api_tokens.is_empty());

        assert!(config_from(&[("SUGGEST_API_KEY", "k"), ("AUTH_DISABLED", "yes")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SUGGEST_API_KEY", "k"),
            ("SUGGEST_SECRET_KEY", "s"),
            ("SUGGEST_API_BASE", "http://127.0.0.1:9000/rs/"),
            ("LISTEN_ADDR", "127.0.0.1:3000"),
            ("CACHE_TTL_SECS", "60"),
            ("CACHE_MAX_CAPACITY", "1000"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("API_TOKENS", " alpha, ,beta "),
        ])
        .unwrap();
        assert_eq!(config.suggest.api_base, "http://127.0.0.1:9000/rs");
        assert_eq!(config.suggest.secret_key.as_deref(), Some("s"));
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.cache.max_capacity, Some(1000));
        assert_eq!(config.suggest.timeout, Duration::from_secs(3));
        assert_eq!(config.api_tokens, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_invalid_numbers() {
        for (key, value) in [
            ("CACHE_TTL_SECS", "five"),
            ("CACHE_TTL_SECS", "0"),
            ("CACHE_MAX_CAPACITY", "-1"),
            ("CACHE_MAX_CAPACITY", "0"),
            ("UPSTREAM_TIMEOUT_SECS", "1.5"),
            ("UPSTREAM_TIMEOUT_SECS", "0"),
            ("LISTEN_ADDR", "localhost"),
        ] {
            let result = with_required(&[(key, value)]);
            assert!(result.is_err(), "{key}={value} should be rejected");
        }
    }
}
