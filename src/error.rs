use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch feed {url}: {source}")]
    FeedFetch {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{failed} of {total} feeds failed to refresh")]
    Refresh {
        failed: usize,
        total: usize,
        errors: Vec<Error>,
    },

    #[error("feed {index} has no entries")]
    EmptyFeed { index: usize },

    #[error("no feeds configured")]
    NoFeeds,

    #[error("feed index {index} out of range")]
    FeedIndex { index: usize },

    #[error("timed out waiting for serial input")]
    Timeout,

    #[error("cannot encode {ch:?} for the serial link")]
    Encoding { ch: char },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serial(#[from] serialport::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
