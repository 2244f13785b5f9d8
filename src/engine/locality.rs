//! Locality records produced by stat jobs, and where they are written.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::utils::config::HOSTNAME_DELIMITER;

/// Placement summary for one backend object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityRecord {
    pub name: String,
    /// True when the local host does not hold the first block.
    pub is_remote: bool,
    /// Every reported host, each preceded by `+` (so the string starts with `+`).
    pub hostnames: String,
}

impl LocalityRecord {
    /// Build the record from per-block host lists. Returns None when no host is reported for the first block.
    pub fn from_blocks(name: &str, local_host: &str, blocks: &[Vec<String>]) -> Option<Self> {
        let first_host = blocks.first()?.first()?;
        let hostnames = blocks
            .iter()
            .flatten()
            .fold(String::new(), |mut acc, host| {
                acc.push(HOSTNAME_DELIMITER);
                acc.push_str(host);
                acc
            });
        Some(Self {
            name: name.to_string(),
            is_remote: !first_host.starts_with(local_host),
            hostnames,
        })
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hostnames
            .split(HOSTNAME_DELIMITER)
            .filter(|h| !h.is_empty())
    }
}

/// Output for locality records. Called concurrently by every stat worker.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: &LocalityRecord) -> io::Result<()>;
}

/// Writes one JSON object per line to any writer. Each record is written under one lock, so lines never interleave.
pub struct JsonLinesSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl JsonLinesSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    fn emit(&self, record: &LocalityRecord) -> io::Result<()> {
        let line = serde_json::to_string(record).map_err(io::Error::other)?;
        let mut out = self.out.lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }
}
