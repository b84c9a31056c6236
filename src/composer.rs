use std::num::NonZeroUsize;

use crate::constant::*;

/// Ordered literal substitutions. Each pass runs over the output of the
/// previous one, so order matters.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementTable {
    pairs: Vec<(String, String)>,
}

impl Default for ReplacementTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_REPLACEMENTS
                .iter()
                .map(|(orig, with)| (orig.to_string(), with.to_string()))
                .collect(),
        )
    }
}

impl ReplacementTable {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (orig, with) in &self.pairs {
            // An empty pattern would match between every character
            if orig.is_empty() {
                continue;
            }
            out = out.replace(orig.as_str(), with);
        }
        out
    }
}

pub struct Composer {
    replacements: ReplacementTable,
    chunk_size: NonZeroUsize,
}

impl Composer {
    pub fn new(replacements: ReplacementTable, chunk_size: NonZeroUsize) -> Self {
        Self {
            replacements,
            chunk_size,
        }
    }

    /// Runs the replacements over `raw`, then frames it with the sentinel and
    /// terminator. The framing never passes through the table.
    pub fn compose(&self, raw: &str) -> String {
        let body = self.replacements.apply(raw);
        let mut message = String::with_capacity(body.len() + 2);
        message.push(MESSAGE_SENTINEL);
        message.push_str(&body);
        message.push(MESSAGE_TERMINATOR);
        message
    }

    pub fn compose_chunks(&self, raw: &str) -> ChunkList {
        chunk(&self.compose(raw), self.chunk_size)
    }
}

/// Splits `message` positionally into pieces of `max_len` characters; only the
/// last may be shorter.
pub fn chunk(message: &str, max_len: NonZeroUsize) -> ChunkList {
    let chars: Vec<char> = message.chars().collect();
    let chunks = chars
        .chunks(max_len.get())
        .map(|part| part.iter().collect())
        .collect();
    ChunkList::new(chunks)
}

/// The parts of one message and the index of the next one to send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkList {
    chunks: Vec<String>,
    cursor: usize,
}

impl ChunkList {
    pub fn new(chunks: Vec<String>) -> Self {
        Self { chunks, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&str> {
        self.chunks.get(self.cursor).map(String::as_str)
    }

    pub fn advance(&mut self) {
        if self.cursor < self.chunks.len() {
            self.cursor += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.chunks.len()
    }

    #[cfg(test)]
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }
}
