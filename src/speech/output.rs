//! Waiting for generator output files

use crate::{Result, RobopError};
use log::debug;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Polling policy for output files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputWait {
    /// Give up after this long
    pub timeout: Duration,
    /// Time between size checks
    pub interval: Duration,
}

impl Default for OutputWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
            interval: Duration::from_millis(20),
        }
    }
}

impl OutputWait {
    /// Block until `path` exists with a non-zero size that stays the same
    /// across one polling interval
    pub fn wait_for(&self, path: &Path) -> Result<()> {
        let start = Instant::now();
        let mut last_size = None;

        loop {
            let size = fs::metadata(path).ok().map(|m| m.len()).filter(|&len| len > 0);
            if size.is_some() && size == last_size {
                debug!(
                    "Output {} stable at {} bytes after {:?}",
                    path.display(),
                    size.unwrap_or_default(),
                    start.elapsed()
                );
                return Ok(());
            }
            last_size = size;

            if start.elapsed() >= self.timeout {
                return Err(RobopError::ExternalTool(format!(
                    "no output written to {} within {:?}",
                    path.display(),
                    self.timeout
                )));
            }
            thread::sleep(self.interval);
        }
    }
}
