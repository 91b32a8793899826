//! Configuration-driven diagnostic logging router
//!
//! Loads an ini-style settings file describing per-component verbosity and a
//! single output destination, gates each print through a severity mask, and
//! forwards a fixed-width formatted line to exactly one transport (console,
//! file or UDP datagram).
//!
//! ```
//! use diaglog::{ConfigDocument, Router, SeverityMask};
//!
//! let config = ConfigDocument::from_bytes(
//!     b"[overrides]\nmyfile = WE\n",
//! ).unwrap();
//!
//! let router = Router::new(config);
//! let logger = router.logger("myfile").unwrap();
//!
//! assert_eq!(logger.mask(), SeverityMask::WARN | SeverityMask::ERROR);
//! diaglog::diag_warn!(logger, "disk at {}%", 93).unwrap();
//! logger.term().unwrap();
//! ```
//!
//! Config format:
//!
//! ```ini
//! ; per-component severity short-codes
//! [overrides]
//! myfile = WEF
//!
//! ; one output section selects the transport and carries its parameters
//! [output=file]
//! output = /tmp/app.log
//! ```
//!
//! Delivery is synchronous on the calling thread; one line write is atomic
//! per transport, and a slow transport blocks the caller.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod level;
mod macros;
pub mod router;
pub mod transport;

pub use config::{ConfigDocument, SectionRef};
pub use error::{LogError, Result};
pub use format::{basename, format_line, severity_label, timestamp, LogRecord};
pub use level::{Severity, SeverityMask};
pub use router::{Logger, Router};
pub use transport::{
    ConsoleTransport, FileTransport, RegistryState, Transport, TransportRegistry, UdpTransport,
};

/// Initialize internal tracing for the router's own diagnostics
///
/// The router reports parse and transport anomalies through `tracing`; this
/// installs a compact stderr subscriber for them. Call early, before any
/// routing occurs. Set `verbose` to true for debug-level output; the
/// `RUST_LOG` conventions of `EnvFilter` apply on top.
pub fn init_diagnostics(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}
