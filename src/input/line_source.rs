//! Line input with interrupt support
//!
//! The terminal source polls stdin with a short timeout so that a SIGINT
//! (Ctrl-C) received while waiting for a line is noticed promptly and
//! reported as an event instead of killing the process.

use crate::Result;
use log::debug;
use nix::errno::Errno;
use nix::libc;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::signal::{self, SigHandler, Signal};
use std::io::{self, BufRead, Write};
use std::os::fd::{AsFd, AsRawFd};
use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the SIGINT handler, cleared when the event is delivered
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigint(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

/// What a read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// One line, without its terminator
    Line(String),
    /// Ctrl-C while waiting
    Interrupted,
    /// Input closed
    Eof,
}

/// Source of input lines
pub trait LineSource {
    /// Show `prompt` and wait for the next line
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent>;
}

/// Reads lines from any buffered reader (pipes, scripts, tests)
///
/// No prompt is shown and interrupts are never reported.
pub struct ReaderSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<LineEvent> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(LineEvent::Eof);
        }
        Ok(LineEvent::Line(trim_newline(line)))
    }
}

/// Interactive stdin
pub struct TerminalInput {
    /// Bytes read but not yet returned as a line
    pending: Vec<u8>,
    eof: bool,
    poll_timeout_ms: u16,
}

impl TerminalInput {
    /// Install the SIGINT handler and take over stdin
    pub fn new() -> Result<Self> {
        unsafe {
            signal::signal(Signal::SIGINT, SigHandler::Handler(handle_sigint)).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to set SIGINT handler: {}", e),
                )
            })?;
        }
        INTERRUPTED.store(false, Ordering::Relaxed);

        Ok(Self {
            pending: Vec::new(),
            eof: false,
            poll_timeout_ms: 100,
        })
    }

    /// Split off the first complete line in the buffer
    fn take_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let bytes: Vec<u8> = self.pending.drain(..=pos).collect();
        Some(trim_newline(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Wait for stdin to become readable and append what is there
    fn fill(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut fds = [PollFd::new(stdin.as_fd(), PollFlags::POLLIN)];

        match poll(&mut fds, PollTimeout::from(self.poll_timeout_ms)) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(Errno::EINTR) => {
                debug!("poll() interrupted by signal");
                return Ok(());
            }
            Err(e) => return Err(io::Error::from(e).into()),
        }

        let mut buf = [0u8; 4096];
        match nix::unistd::read(stdin.as_raw_fd(), &mut buf) {
            Ok(0) => self.eof = true,
            Ok(n) => self.pending.extend_from_slice(&buf[..n]),
            Err(Errno::EINTR) => {}
            Err(e) => return Err(io::Error::from(e).into()),
        }
        Ok(())
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent> {
        print!("{} ", prompt);
        io::stdout().flush()?;

        loop {
            if let Some(line) = self.take_line() {
                return Ok(LineEvent::Line(line));
            }
            if self.eof {
                if self.pending.is_empty() {
                    println!();
                    return Ok(LineEvent::Eof);
                }
                let rest = std::mem::take(&mut self.pending);
                return Ok(LineEvent::Line(trim_newline(
                    String::from_utf8_lossy(&rest).into_owned(),
                )));
            }
            if INTERRUPTED.swap(false, Ordering::Relaxed) {
                self.pending.clear();
                println!();
                return Ok(LineEvent::Interrupted);
            }
            self.fill()?;
        }
    }
}

fn trim_newline(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}
