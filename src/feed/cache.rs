use rand::Rng;

use crate::error::{Error, Result};

use super::{Entry, Feed};

/// Entries of every configured feed, replaced wholesale per feed on refresh.
pub struct FeedCache {
    feeds: Vec<Box<dyn Feed>>,
    entries: Vec<Vec<Entry>>,
}

impl FeedCache {
    pub fn new(feeds: Vec<Box<dyn Feed>>) -> Self {
        let entries = feeds.iter().map(|_| Vec::new()).collect();
        Self { feeds, entries }
    }

    pub fn feed_count(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Vec::is_empty)
    }

    /// Fetches every feed in order. A feed that fails keeps its previous
    /// entries; the failures are reported together once all feeds were tried.
    pub async fn refresh(&mut self) -> Result<()> {
        let mut errors = vec![];
        for (index, feed) in self.feeds.iter().enumerate() {
            match feed.fetch().await {
                Ok(entries) => {
                    tracing::info!("Fetched {} entries from {}", entries.len(), feed.url());
                    self.entries[index] = entries;
                }
                Err(source) => {
                    tracing::error!("Failed to fetch {}: {}", feed.url(), source);
                    errors.push(Error::FeedFetch {
                        url: feed.url().to_string(),
                        source,
                    });
                }
            }
        }

        if errors.is_empty() {
            return Ok(());
        }

        Err(Error::Refresh {
            failed: errors.len(),
            total: self.feeds.len(),
            errors,
        })
    }

    pub fn entry_count(&self, feed_index: usize) -> Result<usize> {
        self.entries
            .get(feed_index)
            .map(Vec::len)
            .ok_or(Error::FeedIndex { index: feed_index })
    }

    /// Picks a feed uniformly, then one of its entries uniformly.
    pub fn pick_random_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(usize, &str)> {
        if self.entries.is_empty() {
            return Err(Error::NoFeeds);
        }

        let feed_index = rng.gen_range(0..self.entries.len());
        let entries = &self.entries[feed_index];
        if entries.is_empty() {
            return Err(Error::EmptyFeed { index: feed_index });
        }

        let entry = &entries[rng.gen_range(0..entries.len())];
        Ok((feed_index, entry.text()))
    }
}
