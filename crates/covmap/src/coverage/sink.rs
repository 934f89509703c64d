//! Topic Side-Channel
//!
//! Registered topics are appended to a side-channel so the process that
//! emits coverage events agrees on identifiers. Writes are synchronous and
//! never rewound.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only byte sink receiving newline-delimited topics
pub trait TopicSink {
    /// Append bytes to the end of the sink
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl TopicSink for Vec<u8> {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<S: TopicSink + ?Sized> TopicSink for &mut S {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).append_bytes(bytes)
    }
}

/// File sink opened in append mode on every write
///
/// The file is created on first append. Data is synced before `append_bytes`
/// returns so a concurrently running producer sees complete lines.
#[derive(Debug, Clone)]
pub struct AppendFileSink {
    path: PathBuf,
}

impl AppendFileSink {
    /// Create a sink for the given path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path written to
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TopicSink for AppendFileSink {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)?;
        file.sync_data()
    }
}
