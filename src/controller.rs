use rand::rngs::StdRng;
use rand::SeedableRng;

use std::io::Write;
use std::time::Duration;

use crate::composer::{ChunkList, Composer};
use crate::constant::*;
use crate::error::{Error, Result};
use crate::feed::FeedCache;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// Waiting for the device to ask for a new message.
    Idle,
    /// Serving the parts of a message, one per request.
    Sending(ChunkList),
}

/// What a single inbound byte did.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Ignored(u8),
    MessageStarted { feed_index: usize, parts: usize },
    ChunkSent { part: usize, parts: usize },
    MessageCompleted,
    MessageAborted,
    ComposeFailed,
}

pub struct HandshakeController<T: Transport, W: Write> {
    cache: FeedCache,
    composer: Composer,
    transport: T,
    echo: W,
    rng: StdRng,
    state: State,
    messages_displayed: u64,
    refresh_threshold: u64,
    poll_interval: Duration,
}

impl<T: Transport, W: Write> HandshakeController<T, W> {
    pub fn new(cache: FeedCache, composer: Composer, transport: T, echo: W) -> Self {
        Self {
            cache,
            composer,
            transport,
            echo,
            rng: StdRng::from_entropy(),
            state: State::Idle,
            messages_displayed: 0,
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn with_refresh_threshold(mut self, threshold: u64) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[cfg(test)]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    #[cfg(test)]
    pub fn messages_displayed(&self) -> u64 {
        self.messages_displayed
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[cfg(test)]
    pub fn echo(&self) -> &W {
        &self.echo
    }

    pub fn needs_refresh(&self) -> bool {
        self.messages_displayed > self.refresh_threshold
    }

    /// Refetches the feeds and resets the counter, even if some feeds failed.
    pub async fn refresh(&mut self) {
        tracing::info!(
            "Refreshing feeds after {} messages",
            self.messages_displayed
        );
        self.messages_displayed = 0;
        if let Err(e) = self.cache.refresh().await {
            tracing::warn!("Feed refresh incomplete: {}", e);
        }
    }

    /// Reads one byte if any is waiting. A read timeout counts as no byte.
    pub fn poll(&mut self) -> Result<Option<u8>> {
        if self.transport.bytes_available()? == 0 {
            return Ok(None);
        }
        match self.transport.read_byte() {
            Ok(byte) => Ok(Some(byte)),
            Err(Error::Timeout) => {
                tracing::debug!("Timed out waiting for serial input");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Feeds a single inbound byte through the state machine.
    pub fn step(&mut self, byte: u8) -> Event {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle if byte == NEW_MESSAGE => self.start_message(),
            State::Sending(chunks) if byte == NEXT_CHUNK => self.send_next(chunks),
            state => {
                tracing::debug!("Ignoring byte {:#04x} while {}", byte, state_name(&state));
                self.state = state;
                Event::Ignored(byte)
            }
        }
    }

    /// One iteration of the outer loop: refresh when idle and stale, then
    /// handle at most one inbound byte.
    pub async fn tick(&mut self) -> Result<Option<Event>> {
        if self.is_idle() && self.needs_refresh() {
            self.refresh().await;
        }
        Ok(self.poll()?.map(|byte| self.step(byte)))
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            if self.tick().await?.is_none() {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
    }

    fn start_message(&mut self) -> Event {
        let (feed_index, raw) = match self.cache.pick_random_entry(&mut self.rng) {
            Ok(picked) => picked,
            Err(e) => {
                tracing::error!("Failed to pick a message: {}", e);
                self.write_abort();
                return Event::ComposeFailed;
            }
        };

        let chunks = self.composer.compose_chunks(raw);
        if chunks.is_empty() {
            tracing::error!("Message from feed {} has no parts", feed_index);
            self.write_abort();
            return Event::ComposeFailed;
        }

        let parts = chunks.len();
        tracing::info!("New message from feed {} in {} parts", feed_index, parts);
        self.state = State::Sending(chunks);
        Event::MessageStarted { feed_index, parts }
    }

    fn send_next(&mut self, mut chunks: ChunkList) -> Event {
        let Some(chunk) = chunks.current() else {
            return Event::Ignored(NEXT_CHUNK);
        };

        if let Err(e) = self.transport.write_text(chunk) {
            tracing::warn!(
                "Aborting message at part {} of {}: {}",
                chunks.cursor() + 1,
                chunks.len(),
                e
            );
            self.write_abort();
            return Event::MessageAborted;
        }

        if let Err(e) = self
            .echo
            .write_all(chunk.as_bytes())
            .and_then(|_| self.echo.flush())
        {
            tracing::warn!("Failed to echo chunk: {}", e);
        }

        let part = chunks.cursor();
        chunks.advance();
        if chunks.is_exhausted() {
            self.messages_displayed += 1;
            return Event::MessageCompleted;
        }

        let parts = chunks.len();
        self.state = State::Sending(chunks);
        Event::ChunkSent { part, parts }
    }

    fn write_abort(&mut self) {
        if let Err(e) = self.transport.write_bytes(&[ABORT_BYTE]) {
            tracing::error!("Failed to write abort byte: {}", e);
        }
    }
}

fn state_name(state: &State) -> &'static str {
    match state {
        State::Idle => "idle",
        State::Sending(_) => "sending",
    }
}
