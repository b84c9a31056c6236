//! In-memory stand-ins for the network feeds and the serial link.

use anyhow::anyhow;
use async_trait::async_trait;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::constant::ABORT_BYTE;
use crate::error::{Error, Result};
use crate::feed::{Entry, Feed};
use crate::transport::Transport;

#[derive(Default)]
struct StaticFeedState {
    entries: Vec<Entry>,
    failing: bool,
    fetches: usize,
}

/// A feed serving fixed descriptions. Clones share state, so a test can keep
/// a handle after boxing the feed into a cache.
#[derive(Clone)]
pub struct StaticFeed {
    url: String,
    state: Arc<Mutex<StaticFeedState>>,
}

impl StaticFeed {
    pub fn new(url: &str, descriptions: &[&str]) -> Self {
        let feed = Self {
            url: url.to_string(),
            state: Arc::default(),
        };
        feed.set_entries(descriptions);
        feed
    }

    pub fn set_entries(&self, descriptions: &[&str]) {
        self.state.lock().unwrap().entries = descriptions
            .iter()
            .map(|text| Entry::with_description(*text))
            .collect();
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().unwrap().fetches
    }
}

#[async_trait]
impl Feed for StaticFeed {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> anyhow::Result<Vec<Entry>> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        if state.failing {
            return Err(anyhow!("connection refused"));
        }
        Ok(state.entries.clone())
    }
}

/// Scripted inbound bytes and recorded outbound bytes.
#[derive(Default)]
pub struct MockTransport {
    pub inbound: VecDeque<u8>,
    pub outbound: Vec<u8>,
    pub writes: Vec<Vec<u8>>,
    pub fail_writes: bool,
    /// Reports input as waiting but times out on every read.
    pub stall_reads: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes);
    }
}

impl Transport for MockTransport {
    fn bytes_available(&mut self) -> Result<usize> {
        if self.stall_reads {
            return Ok(self.inbound.len().max(1));
        }
        Ok(self.inbound.len())
    }

    fn read_byte(&mut self) -> Result<u8> {
        if self.stall_reads {
            return Err(Error::Timeout);
        }
        self.inbound.pop_front().ok_or(Error::Timeout)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        // The abort byte always gets through so tests can observe it
        if self.fail_writes && data != [ABORT_BYTE].as_slice() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "device unplugged",
            )));
        }
        self.outbound.extend_from_slice(data);
        self.writes.push(data.to_vec());
        Ok(())
    }
}
