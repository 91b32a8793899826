//! Router facade and logger handles
//!
//! One `Router` owns the parsed config, the transport registry and the
//! process-default severity mask. Handles created from it share the single
//! active transport through the registry's reference count; each handle
//! carries its own severity mask.
//!
//! Printing is synchronous: gating, formatting and transmission all happen on
//! the calling thread. A disabled severity is a no-op success, never a
//! failure surfaced to the caller.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crate::config::ConfigDocument;
use crate::constants::OVERRIDES_SECTION;
use crate::error::{LogError, Result};
use crate::format::{self, LogRecord};
use crate::level::SeverityMask;
use crate::transport::{
    ConsoleTransport, FileTransport, Transport, TransportRegistry, UdpTransport,
};

struct Shared {
    config: ConfigDocument,
    registry: TransportRegistry,
    default_mask: AtomicU32,
}

/// Diagnostic log router
///
/// Construction requires a parsed config, so a handle can never exist before
/// the config is loaded.
#[derive(Clone)]
pub struct Router {
    shared: Arc<Shared>,
}

impl Router {
    /// Router over the default transport set: console, file, udp
    pub fn new(config: ConfigDocument) -> Self {
        Self::with_transports(
            config,
            vec![
                Box::new(ConsoleTransport::new()),
                Box::new(FileTransport::new()),
                Box::new(UdpTransport::new()),
            ],
        )
    }

    /// Router over an injected transport list
    ///
    /// The first transport is the default selection when the config names no
    /// output.
    pub fn with_transports(config: ConfigDocument, transports: Vec<Box<dyn Transport>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                registry: TransportRegistry::new(transports),
                default_mask: AtomicU32::new(SeverityMask::DEFAULT.bits()),
            }),
        }
    }

    /// The parsed config this router reads overrides and selection from
    pub fn config(&self) -> &ConfigDocument {
        &self.shared.config
    }

    /// Mask used when a component has no entry in the `overrides` section
    pub fn default_mask(&self) -> SeverityMask {
        SeverityMask::from_bits(self.shared.default_mask.load(Ordering::Relaxed))
    }

    /// Replace the fallback mask for handles created afterwards
    pub fn set_default_mask(&self, mask: SeverityMask) {
        self.shared.default_mask.store(mask.bits(), Ordering::Relaxed);
    }

    /// Name of the currently active transport, if any handle is live
    pub fn active_transport(&self) -> Option<&'static str> {
        self.shared.registry.active_transport()
    }

    /// Create a handle for a component, honoring config overrides
    ///
    /// The override key is the component's basename without extension:
    /// `src/myfile.rs` looks up `myfile` in the `overrides` section and
    /// parses its short-code value; a component without an override gets the
    /// router default mask. The first live handle initializes the selected
    /// transport.
    pub fn logger(&self, component: &str) -> Result<Logger> {
        let key = component_key(component);

        let mask = self
            .shared
            .config
            .section(OVERRIDES_SECTION)
            .and_then(|overrides| overrides.get(key))
            .map(SeverityMask::from_str_flags)
            .unwrap_or_else(|| self.default_mask());

        self.logger_with_mask(mask)
    }

    /// Create a handle with an explicit mask, skipping the override lookup
    pub fn logger_with_mask(&self, mask: SeverityMask) -> Result<Logger> {
        self.shared.registry.acquire(&self.shared.config)?;

        Ok(Logger {
            shared: self.shared.clone(),
            mask: AtomicU32::new(mask.bits()),
            active: AtomicBool::new(true),
        })
    }
}

/// Component basename without its extension
fn component_key(component: &str) -> &str {
    let base = format::basename(component);
    match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    }
}

/// One caller-owned logging handle
///
/// Holds its own severity mask, independent of every other handle. States are
/// Active and Terminated: after `term` every operation fails without side
/// effects. Dropping an Active handle releases its transport reference.
pub struct Logger {
    shared: Arc<Shared>,
    mask: AtomicU32,
    active: AtomicBool,
}

impl Logger {
    fn ensure_active(&self) -> Result<()> {
        if self.active.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(LogError::AlreadyTerminated {
                what: "logger handle",
            })
        }
    }

    /// Currently enabled severities
    pub fn mask(&self) -> SeverityMask {
        SeverityMask::from_bits(self.mask.load(Ordering::Relaxed))
    }

    /// Enable the given severities
    pub fn add_level(&self, level: SeverityMask) -> Result<()> {
        self.ensure_active()?;
        self.mask.fetch_or(level.bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Disable the given severities
    pub fn remove_level(&self, level: SeverityMask) -> Result<()> {
        self.ensure_active()?;
        self.mask.fetch_and(!level.bits(), Ordering::Relaxed);
        Ok(())
    }

    /// True iff every given severity is enabled on an Active handle
    pub fn is_level_enabled(&self, level: SeverityMask) -> bool {
        self.active.load(Ordering::Acquire) && self.mask().is_enabled(level)
    }

    /// Gate, format and forward one record
    ///
    /// A severity the handle has not enabled returns `Ok` without touching
    /// the transport. Transmission failures (including partial writes)
    /// propagate to the caller; the record is not retried.
    pub fn print(
        &self,
        level: SeverityMask,
        file: &str,
        line: u32,
        function: &str,
        args: fmt::Arguments<'_>,
    ) -> Result<()> {
        self.ensure_active()?;

        if !self.mask().is_enabled(level) {
            // the caller asked for this severity to stay quiet
            return Ok(());
        }

        let message = match args.as_str() {
            Some(text) => std::borrow::Cow::Borrowed(text),
            None => std::borrow::Cow::Owned(args.to_string()),
        };

        let formatted = format::format_line(&LogRecord {
            severity: level,
            file,
            line,
            function,
            message: &message,
        });

        self.shared.registry.transmit(formatted.as_bytes())
    }

    /// Terminate the handle, dropping its transport reference
    ///
    /// The last live handle terminates the active transport. A second call
    /// fails with already-terminated and has no side effects.
    pub fn term(&self) -> Result<()> {
        if self.active.swap(false, Ordering::AcqRel) {
            self.shared.registry.release()
        } else {
            Err(LogError::AlreadyTerminated {
                what: "logger handle",
            })
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.active.swap(false, Ordering::AcqRel) {
            let _ = self.shared.registry.release();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
