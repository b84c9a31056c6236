use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;
use std::sync::OnceLock;
use std::time::Duration;

use crate::constant::*;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    // Serial link
    pub serial_port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub poll_interval_ms: u64,

    // Message shaping
    pub chunk_size: NonZeroUsize,
    pub replacements: Vec<(String, String)>,

    // Feeds
    pub feed_urls: Vec<String>,
    pub refresh_threshold: u64, // in messages displayed
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            serial_port: DEFAULT_SERIAL_PORT.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            chunk_size: NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN),
            replacements: DEFAULT_REPLACEMENTS
                .iter()
                .map(|(orig, with)| (orig.to_string(), with.to_string()))
                .collect(),
            feed_urls: vec![],
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn get() -> &'static Config {
        static INSTANCE: OnceLock<Config> = OnceLock::new();
        INSTANCE.get_or_init(|| Config::from_env().expect("invalid configuration"))
    }

    pub fn from_env() -> anyhow::Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source, falling back to
    /// defaults for anything unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let defaults = Config::default();

        let serial_port = lookup("SERIAL_PORT").unwrap_or(defaults.serial_port);
        let baud_rate = parse_or(&lookup, "BAUD_RATE", defaults.baud_rate)?;
        let read_timeout_ms = parse_or(&lookup, "READ_TIMEOUT_MS", defaults.read_timeout_ms)?;
        let poll_interval_ms = parse_or(&lookup, "POLL_INTERVAL_MS", defaults.poll_interval_ms)?;
        let chunk_size = parse_or(&lookup, "CHUNK_SIZE", defaults.chunk_size)?;
        let refresh_threshold =
            parse_or(&lookup, "REFRESH_THRESHOLD", defaults.refresh_threshold)?;
        let http_timeout_secs =
            parse_or(&lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?;

        let replacements = match lookup("REPLACEMENTS") {
            Some(raw) => parse_replacements(&raw)?,
            None => defaults.replacements,
        };

        let feed_urls = lookup("FEED_URLS")
            .map(|urls| parse_feed_urls(&urls))
            .unwrap_or_default();

        Ok(Config {
            serial_port,
            baud_rate,
            read_timeout_ms,
            poll_interval_ms,
            chunk_size,
            replacements,
            feed_urls,
            refresh_threshold,
            http_timeout_secs,
        })
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

/// `REPLACEMENTS` is a JSON array of `[original, replacement]` pairs, applied in order.
pub fn parse_replacements(raw: &str) -> anyhow::Result<Vec<(String, String)>> {
    let pairs: Vec<(String, String)> =
        serde_json::from_str(raw).context("REPLACEMENTS must be a JSON array of string pairs")?;
    if let Some(index) = pairs.iter().position(|(orig, _)| orig.is_empty()) {
        return Err(anyhow!("REPLACEMENTS pair {index} has an empty original"));
    }
    Ok(pairs)
}

pub fn parse_feed_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| url.to_string())
        .collect()
}
