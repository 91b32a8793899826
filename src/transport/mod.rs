//! Transport abstraction for formatted log lines
//!
//! Separates delivery concerns from routing logic:
//! - **Transport**: where a finished line goes (console, file, UDP datagram)
//! - **TransportRegistry**: which single transport is active, and its lifecycle
//!
//! Each transport guards its own underlying resource with its own lock, so
//! concurrent transmits serialize at the byte-write boundary and one line
//! write is atomic. Delivery is synchronous on the calling thread: a slow
//! transport blocks the caller.
//!
//! # Adding a new transport
//!
//! 1. Create `transport/my_transport.rs`
//! 2. Implement the `Transport` trait
//! 3. Add `pub mod my_transport;` here and register it with the registry
//! 4. No other changes needed

pub mod console;
pub mod file;
pub mod registry;
pub mod udp;

pub use console::ConsoleTransport;
pub use file::FileTransport;
pub use registry::{RegistryState, TransportRegistry};
pub use udp::UdpTransport;

use crate::config::SectionRef;
use crate::error::Result;

/// One pluggable delivery mechanism
///
/// # Lifecycle
///
/// 1. `initialize` with the selecting config section (its key/value pairs are
///    the transport's parameters)
/// 2. Any number of `transmit` calls, possibly from multiple threads
/// 3. `terminate` releases the underlying resource
///
/// Initializing twice without terminating, or terminating twice, is an error.
/// A transmit reporting fewer bytes delivered than requested fails with a
/// partial-write error; nothing is retried or buffered.
pub trait Transport: Send + Sync {
    /// Identity matched against the config's `output=<id>` section name
    fn name(&self) -> &'static str;

    /// Open the underlying resource using parameters from `params`
    fn initialize(&self, params: Option<SectionRef<'_>>) -> Result<()>;

    /// Close the underlying resource
    fn terminate(&self) -> Result<()>;

    /// Deliver one formatted line
    fn transmit(&self, line: &[u8]) -> Result<()>;
}
