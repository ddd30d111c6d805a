use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_DATA_FILE: &str = "data/items.json";
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid u16, got '{raw}'"))?,
            None => defaults.port,
        };

        let data_file = lookup("CARTLIST_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        let allowed_origins = match lookup("CARTLIST_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw).context("invalid CARTLIST_ALLOWED_ORIGINS")?,
            None => defaults.allowed_origins,
        };

        Ok(Self {
            host,
            port,
            data_file,
            allowed_origins,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Comma-separated origin list. The wildcard is refused because the API
/// allows credentials, which browsers never combine with `*`.
fn parse_origins(raw: &str) -> Result<Vec<String>> {
    let mut origins = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if origin == "*" {
            bail!("wildcard origin '*' cannot be used with credentialed CORS");
        }
        origins.push(origin.trim_end_matches('/').to_string());
    }
    Ok(origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_listen_on_port_4000() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.address(), "0.0.0.0:4000");
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8081"),
            ("HOST", "127.0.0.1"),
            ("CARTLIST_DATA_FILE", "/tmp/cart.json"),
            (
                "CARTLIST_ALLOWED_ORIGINS",
                " https://cart.example.com/ , ,http://localhost:3000",
            ),
        ]))
        .unwrap();

        assert_eq!(config.address(), "127.0.0.1:8081");
        assert_eq!(config.data_file, PathBuf::from("/tmp/cart.json"));
        assert_eq!(
            config.allowed_origins,
            vec!["https://cart.example.com", "http://localhost:3000"]
        );
    }

    #[test]
    fn rejects_wildcard_origin() {
        for raw in ["*", "http://localhost:5173, *"] {
            let err = AppConfig::from_lookup(lookup_from(&[("CARTLIST_ALLOWED_ORIGINS", raw)]))
                .unwrap_err();
            assert!(err.to_string().contains("CARTLIST_ALLOWED_ORIGINS"));
            assert!(format!("{err:#}").contains("wildcard"));
        }
    }

    #[test]
    fn rejects_invalid_port() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT must be a valid u16"));
    }
}
