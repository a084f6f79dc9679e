use std::fs;
use std::path::PathBuf;

use bg_core::Result;

/// FIFO over a line-delimited topics file. The head of the file is the
/// next topic; blank lines are ignored.
pub struct TopicQueue {
    path: PathBuf,
}

impl TopicQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The first queued topic together with everything that remains, in
    /// order. A missing file is the same as an empty queue.
    pub fn next_topic(&self) -> Result<Option<(String, Vec<String>)>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let mut topics = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from);
        match topics.next() {
            Some(first) => Ok(Some((first, topics.collect()))),
            None => Ok(None),
        }
    }

    /// Overwrite the file with the remaining topics, one per line. Called
    /// only after the article for the consumed topic has been persisted.
    pub fn persist_remaining(&self, topics: &[String]) -> Result<()> {
        let mut out = topics.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        fs::write(&self.path, out)?;
        Ok(())
    }
}
