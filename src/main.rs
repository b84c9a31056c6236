mod client;
mod composer;
mod config;
mod constant;
mod controller;
mod error;
mod feed;
#[cfg(test)]
mod test_utils;
mod transport;

use anyhow::{anyhow, Context, Result};

use crate::composer::{Composer, ReplacementTable};
use crate::config::Config;
use crate::controller::HandshakeController;
use crate::feed::rss::RssFeed;
use crate::feed::{Feed, FeedCache};
use crate::transport::SerialTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_env_and_tracing();

    let config = Config::get();
    if config.feed_urls.is_empty() {
        return Err(anyhow!("FEED_URLS is not set"));
    }
    tracing::info!(
        "Serving {} feeds to {} in chunks of {} (refresh every {} messages)",
        config.feed_urls.len(),
        config.serial_port,
        config.chunk_size,
        config.refresh_threshold
    );

    let feeds = RssFeed::from_urls(&config.feed_urls)
        .into_iter()
        .map(|feed| Box::new(feed) as Box<dyn Feed>)
        .collect();
    let mut cache = FeedCache::new(feeds);
    if let Err(e) = cache.refresh().await {
        tracing::warn!("Initial refresh incomplete: {}", e);
    }
    for index in 0..cache.feed_count() {
        tracing::info!("Feed {} has {} entries", index, cache.entry_count(index)?);
    }
    if cache.is_empty() {
        return Err(anyhow!("no entries could be fetched from any feed"));
    }

    let transport = SerialTransport::open(
        &config.serial_port,
        config.baud_rate,
        config.read_timeout(),
    )
    .with_context(|| format!("failed to open serial port {}", config.serial_port))?;

    let composer = Composer::new(
        ReplacementTable::new(config.replacements.clone()),
        config.chunk_size,
    );

    let mut controller = HandshakeController::new(cache, composer, transport, std::io::stdout())
        .with_refresh_threshold(config.refresh_threshold)
        .with_poll_interval(config.poll_interval());

    tracing::info!("Waiting for the device to request a message");
    controller.run().await?;

    Ok(())
}

pub fn setup_env_and_tracing() {
    dotenv::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
