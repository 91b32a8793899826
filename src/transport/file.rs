//! File transport
//!
//! Opens the path named by the `output` key of its config section in
//! truncate/write mode at initialize; each transmit appends a trailing
//! newline. The file handle lives behind the transmit lock, so concurrent
//! callers produce whole, non-interleaved lines.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::SectionRef;
use crate::constants::FILE_OUTPUT_KEY;
use crate::error::{LogError, Result};
use crate::transport::Transport;

/// Log-file transport
#[derive(Default)]
pub struct FileTransport {
    file: Mutex<Option<File>>,
}

impl FileTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for FileTransport {
    fn name(&self) -> &'static str {
        "file"
    }

    fn initialize(&self, params: Option<SectionRef<'_>>) -> Result<()> {
        let params = params.ok_or(LogError::InvalidParameter {
            field: FILE_OUTPUT_KEY,
            reason: "file transport selected without a config section".into(),
        })?;

        let mut file = self.file.lock();
        if file.is_some() {
            return Err(LogError::AlreadyInitialized {
                transport: self.name(),
            });
        }

        let path = params
            .get(FILE_OUTPUT_KEY)
            .ok_or(LogError::InvalidParameter {
                field: FILE_OUTPUT_KEY,
                reason: "missing from configuration".into(),
            })?;

        let opened = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| LogError::FileOpen {
                path: PathBuf::from(path),
                source: e,
            })?;

        debug!("output set to file: {}", path);
        *file = Some(opened);
        Ok(())
    }

    fn terminate(&self) -> Result<()> {
        let mut file = self.file.lock();

        if file.take().is_none() {
            return Err(LogError::AlreadyTerminated { what: self.name() });
        }

        debug!("terminated: file");
        Ok(())
    }

    fn transmit(&self, line: &[u8]) -> Result<()> {
        if line.is_empty() {
            return Err(LogError::InvalidMessage);
        }

        let mut guard = self.file.lock();
        let file = guard.as_mut().ok_or(LogError::NotReady)?;

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line);
        buf.push(b'\n');

        let written = file.write(&buf).map_err(|e| LogError::Transmit {
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
