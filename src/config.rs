use std::{env, fmt::Display, str::FromStr};

use anyhow::Context;
use tracing::info;

pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set to the feedback Postgres instance")?,
            max_connections: try_load("DASHBOARD_MAX_CONNECTIONS", "5")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_settings() {
        let value: u32 = parse_value("DASHBOARD_MAX_CONNECTIONS", " 8 ").unwrap();
        assert_eq!(value, 8);

        let err = parse_value::<u32>("DASHBOARD_MAX_CONNECTIONS", "many").unwrap_err();
        assert!(err.to_string().contains("DASHBOARD_MAX_CONNECTIONS"));
    }
}
