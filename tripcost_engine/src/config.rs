//! Runtime configuration read from the environment.
//!
//! Variables may also be placed in a `.env` file in the working
//! directory; real environment variables take precedence.

use crate::models::DEFAULT_CURRENCY;
use anyhow::{Context, Result};
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    /// `TRIPCOST_BIND_ADDR`, default `127.0.0.1:3000`.
    pub bind_addr: SocketAddr,
    /// `TRIPCOST_DEFAULT_CURRENCY`, applied to requests that leave the
    /// currency label empty.
    pub default_currency: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = lookup("TRIPCOST_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let bind_addr = addr
            .parse()
            .with_context(|| format!("invalid TRIPCOST_BIND_ADDR {addr:?}"))?;
        let default_currency = lookup("TRIPCOST_DEFAULT_CURRENCY")
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Ok(Self {
            bind_addr,
            default_currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.default_currency, "CAD");
    }

    #[test]
    fn test_overrides_and_bad_addr() {
        let vars: HashMap<&str, &str> = [
            ("TRIPCOST_BIND_ADDR", "0.0.0.0:8080"),
            ("TRIPCOST_DEFAULT_CURRENCY", "USD"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.default_currency, "USD");

        assert!(Config::from_lookup(|_| Some("not-an-addr".into())).is_err());
    }
}
