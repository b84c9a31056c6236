pub mod cache;
pub mod rss;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use cache::FeedCache;

/// A syndication source that can be fetched wholesale into entries.
#[async_trait]
pub trait Feed: Send + Sync {
    fn url(&self) -> &str;
    async fn fetch(&self) -> Result<Vec<Entry>>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl Entry {
    #[cfg(test)]
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    /// Text shown on the device: the description, else the title.
    pub fn text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
    }
}
