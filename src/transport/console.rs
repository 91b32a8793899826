//! Console transport
//!
//! Writes each line, plus a trailing newline, to the standard output stream.
//! This is the first registered transport and therefore the default when the
//! config names no output.

use std::io::{self, Write};

use parking_lot::Mutex;
use tracing::debug;

use crate::config::SectionRef;
use crate::error::{LogError, Result};
use crate::transport::Transport;

/// Standard-output transport
#[derive(Default)]
pub struct ConsoleTransport {
    // Doubles as the transmit lock: held across the write so lines from
    // concurrent callers never interleave.
    active: Mutex<bool>,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for ConsoleTransport {
    fn name(&self) -> &'static str {
        "console"
    }

    fn initialize(&self, _params: Option<SectionRef<'_>>) -> Result<()> {
        let mut active = self.active.lock();

        if *active {
            return Err(LogError::AlreadyInitialized {
                transport: self.name(),
            });
        }

        *active = true;
        debug!("output set to console");
        Ok(())
    }

    fn terminate(&self) -> Result<()> {
        let mut active = self.active.lock();

        if !*active {
            return Err(LogError::AlreadyTerminated { what: self.name() });
        }

        *active = false;
        debug!("terminated: console");
        Ok(())
    }

    fn transmit(&self, line: &[u8]) -> Result<()> {
        if line.is_empty() {
            return Err(LogError::InvalidMessage);
        }

        let active = self.active.lock();
        if !*active {
            return Err(LogError::NotReady);
        }

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line);
        buf.push(b'\n');

        let mut stdout = io::stdout().lock();
        let written = stdout.write(&buf).map_err(|e| LogError::Transmit {
            transport: self.name(),
            source: e,
        })?;

        if written < buf.len() {
            return Err(LogError::PartialWrite {
                transport: self.name(),
                written,
                expected: buf.len(),
            });
        }

        Ok(())
    }
}
