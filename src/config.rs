use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

const DEFAULT_APP_URL: &str =
    "https://play.google.com/store/apps/details?id=com.byte.strangerchat";

/// Runtime knobs, read once at startup from the environment (`.env` aware).
/// A missing variable falls back to its default; a present but unparseable
/// one is a startup error.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub match_timeout: Duration,
    pub status_interval: Duration,
    pub reward: u32,
    pub preference_cost: u32,
    pub maintenance: String,
    pub app_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 10000,
            match_timeout: Duration::from_millis(30_000),
            status_interval: Duration::from_millis(5_000),
            reward: 1,
            preference_cost: 10,
            maintenance: "no".to_owned(),
            app_url: DEFAULT_APP_URL.to_owned(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            port: env_parse("PORT", defaults.port)?,
            match_timeout: Duration::from_millis(env_parse(
                "MATCH_TIMEOUT_MS",
                defaults.match_timeout.as_millis() as u64,
            )?),
            status_interval: Duration::from_millis(env_parse(
                "STATUS_INTERVAL_MS",
                defaults.status_interval.as_millis() as u64,
            )?),
            reward: env_parse("REWARD", defaults.reward)?,
            preference_cost: env_parse("PREFERENCE_COST", defaults.preference_cost)?,
            maintenance: dotenv::var("MAINTENANCE").unwrap_or(defaults.maintenance),
            app_url: dotenv::var("APP_URL").unwrap_or(defaults.app_url),
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenv::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid {key}: {raw}")),
        Err(_) => Ok(default),
    }
}
