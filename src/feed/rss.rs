use async_trait::async_trait;

use crate::client::get_http_client;

use super::{Entry, Feed};

pub struct RssFeed {
    url: String,
}

impl RssFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn from_urls(urls: &[impl AsRef<str>]) -> Vec<Self> {
        urls.iter().map(|url| Self::new(url.as_ref())).collect()
    }
}

#[async_trait]
impl Feed for RssFeed {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> anyhow::Result<Vec<Entry>> {
        let body = get_http_client()
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_channel(&body)
    }
}

pub fn parse_channel(body: &[u8]) -> anyhow::Result<Vec<Entry>> {
    let channel = ::rss::Channel::read_from(body)?;
    let entries = channel
        .items()
        .iter()
        .map(|item| Entry {
            title: item.title().map(str::to_string),
            link: item.link().map(str::to_string),
            description: item.description().map(str::to_string),
        })
        .collect();
    Ok(entries)
}
