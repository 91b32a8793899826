//! Transport selection and lifecycle
//!
//! Holds the closed list of registered transports and reference-counts the
//! single active one. The first acquire selects a transport from config and
//! initializes it; the last release terminates it. An explicit lifecycle
//! state makes "ready" a fact rather than something inferred from the
//! counter, so a transmit can never race an in-flight initialize.

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::{ConfigDocument, SectionRef};
use crate::constants::OUTPUT_SECTION_PREFIX;
use crate::error::{LogError, Result};
use crate::transport::Transport;

/// Lifecycle of the active transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// No transport selected; next acquire re-reads config
    Uninitialized,
    /// A transport is selected and its initialize is in flight
    Starting,
    /// The active transport accepts transmits
    Ready,
    /// The active transport's terminate is in flight
    Stopping,
}

struct Inner {
    state: RegistryState,
    active: usize,
    refcount: u32,
}

/// Registry of the fixed transport set
///
/// Exactly zero or one transport is active at any time. The selected
/// transport does not change until the reference count returns to zero and a
/// later acquire re-selects from config.
pub struct TransportRegistry {
    transports: Vec<Box<dyn Transport>>,
    inner: Mutex<Inner>,
}

impl TransportRegistry {
    /// Build a registry from an explicitly registered list
    ///
    /// The first entry is the default selection when the config names no
    /// output or names an unknown one.
    ///
    /// # Panics
    ///
    /// Panics if `transports` is empty.
    pub fn new(transports: Vec<Box<dyn Transport>>) -> Self {
        assert!(!transports.is_empty(), "registry needs at least one transport");

        Self {
            transports,
            inner: Mutex::new(Inner {
                state: RegistryState::Uninitialized,
                active: 0,
                refcount: 0,
            }),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RegistryState {
        self.inner.lock().state
    }

    /// Number of handles currently sharing the active transport
    pub fn handle_count(&self) -> u32 {
        self.inner.lock().refcount
    }

    /// Name of the active transport, if one is ready
    pub fn active_transport(&self) -> Option<&'static str> {
        let inner = self.inner.lock();
        (inner.state == RegistryState::Ready).then(|| self.transports[inner.active].name())
    }

    /// Register one more consumer; the 0->1 edge selects and initializes
    ///
    /// Selection scans `config` in document order for a section named
    /// `output=<id>` and matches `<id>` against each transport's name. The
    /// matched section is handed to `initialize` as the parameter bag.
    pub fn acquire(&self, config: &ConfigDocument) -> Result<()> {
        let mut inner = self.inner.lock();

        match inner.state {
            RegistryState::Ready => {
                inner.refcount += 1;
                Ok(())
            }
            RegistryState::Uninitialized => {
                let (index, params) = self.select(config);
                inner.state = RegistryState::Starting;
                inner.active = index;

                match self.transports[index].initialize(params) {
                    Ok(()) => {
                        inner.state = RegistryState::Ready;
                        inner.refcount = 1;
                        debug!("transport ready: {}", self.transports[index].name());
                        Ok(())
                    }
                    Err(e) => {
                        inner.state = RegistryState::Uninitialized;
                        Err(e)
                    }
                }
            }
            RegistryState::Starting | RegistryState::Stopping => Err(LogError::NotReady),
        }
    }

    /// Drop one consumer; the 1->0 edge terminates the active transport
    pub fn release(&self) -> Result<()> {
        let mut inner = self.inner.lock();

        if inner.refcount == 0 {
            return Err(LogError::AlreadyTerminated {
                what: "transport registry",
            });
        }

        inner.refcount -= 1;
        if inner.refcount > 0 {
            return Ok(());
        }

        inner.state = RegistryState::Stopping;
        let result = self.transports[inner.active].terminate();
        inner.state = RegistryState::Uninitialized;
        debug!("transport released: {}", self.transports[inner.active].name());
        result
    }

    /// Forward one line to the active transport
    ///
    /// The registry lock is only held to read the state; the write itself
    /// serializes on the transport's own lock.
    pub fn transmit(&self, line: &[u8]) -> Result<()> {
        let index = {
            let inner = self.inner.lock();
            if inner.state != RegistryState::Ready {
                return Err(LogError::NotReady);
            }
            inner.active
        };

        self.transports[index].transmit(line)
    }

    fn select<'a>(&self, config: &'a ConfigDocument) -> (usize, Option<SectionRef<'a>>) {
        for section in config.sections() {
            let Some(id) = section.name().strip_prefix(OUTPUT_SECTION_PREFIX) else {
                continue;
            };

            return match self.transports.iter().position(|t| t.name() == id) {
                Some(index) => (index, Some(section)),
                None => {
                    warn!(
                        "unknown transport {:?}, defaulting to {}",
                        id,
                        self.transports[0].name()
                    );
                    (0, Some(section))
                }
            };
        }

        (0, None)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // =========================================================================
    // Counting mock
    // =========================================================================

    #[derive(Default)]
    struct Counters {
        initialized: AtomicUsize,
        terminated: AtomicUsize,
        transmitted: AtomicUsize,
    }

    struct CountingTransport {
        id: &'static str,
        counters: Arc<Counters>,
    }

    impl CountingTransport {
        fn new(id: &'static str) -> (Self, Arc<Counters>) {
            let counters = Arc::new(Counters::default());
            (
                Self {
                    id,
                    counters: counters.clone(),
                },
                counters,
            )
        }
    }

    impl Transport for CountingTransport {
        fn name(&self) -> &'static str {
            self.id
        }

        fn initialize(&self, _params: Option<SectionRef<'_>>) -> Result<()> {
            self.counters.initialized.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn terminate(&self) -> Result<()> {
            self.counters.terminated.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn transmit(&self, _line: &[u8]) -> Result<()> {
            self.counters.transmitted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn registry() -> (TransportRegistry, Arc<Counters>, Arc<Counters>) {
        let (console, console_counters) = CountingTransport::new("console");
        let (file, file_counters) = CountingTransport::new("file");
        let registry = TransportRegistry::new(vec![Box::new(console), Box::new(file)]);
        (registry, console_counters, file_counters)
    }

    fn doc(text: &str) -> ConfigDocument {
        ConfigDocument::from_bytes(text.as_bytes()).unwrap()
    }

    // =========================================================================
    // Selection tests
    // =========================================================================

    #[test]
    fn test_no_output_section_selects_first() {
        let (registry, console, _) = registry();
        let config = doc("[overrides]\nmyfile = WE\n");

        registry.acquire(&config).unwrap();
        assert_eq!(registry.active_transport(), Some("console"));
        assert_eq!(console.initialized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_output_section_selects_by_name() {
        let (registry, console, file) = registry();
        let config = doc("[output=file]\noutput = /tmp/x.log\n");

        registry.acquire(&config).unwrap();
        assert_eq!(registry.active_transport(), Some("file"));
        assert_eq!(console.initialized.load(Ordering::SeqCst), 0);
        assert_eq!(file.initialized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_output_id_falls_back_to_first() {
        let (registry, console, _) = registry();
        let config = doc("[output=carrier-pigeon]\n");

        registry.acquire(&config).unwrap();
        assert_eq!(registry.active_transport(), Some("console"));
        assert_eq!(console.initialized.load(Ordering::SeqCst), 1);
    }

    // =========================================================================
    // Lifecycle tests
    // =========================================================================

    #[test]
    fn test_refcount_edges_initialize_and_terminate_once() {
        let (registry, console, _) = registry();
        let config = doc("");

        registry.acquire(&config).unwrap();
        registry.acquire(&config).unwrap();
        registry.acquire(&config).unwrap();
        assert_eq!(console.initialized.load(Ordering::SeqCst), 1);
        assert_eq!(registry.handle_count(), 3);

        registry.release().unwrap();
        registry.release().unwrap();
        assert_eq!(console.terminated.load(Ordering::SeqCst), 0);

        registry.release().unwrap();
        assert_eq!(console.terminated.load(Ordering::SeqCst), 1);
        assert_eq!(registry.state(), RegistryState::Uninitialized);
    }

    #[test]
    fn test_release_without_acquire_fails() {
        let (registry, _, _) = registry();
        assert!(matches!(
            registry.release(),
            Err(LogError::AlreadyTerminated { .. })
        ));
    }

    #[test]
    fn test_transmit_requires_ready() {
        let (registry, _, _) = registry();
        assert!(matches!(registry.transmit(b"x"), Err(LogError::NotReady)));
    }

    #[test]
    fn test_transmit_reaches_active_transport() {
        let (registry, console, file) = registry();
        let config = doc("[output=file]\n");

        registry.acquire(&config).unwrap();
        registry.transmit(b"line").unwrap();

        assert_eq!(file.transmitted.load(Ordering::SeqCst), 1);
        assert_eq!(console.transmitted.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reselection_after_drain() {
        let (registry, console, file) = registry();

        registry.acquire(&doc("[output=file]\n")).unwrap();
        assert_eq!(registry.active_transport(), Some("file"));
        registry.release().unwrap();

        // counter drained; a later acquire re-reads config
        registry.acquire(&doc("")).unwrap();
        assert_eq!(registry.active_transport(), Some("console"));

        assert_eq!(file.initialized.load(Ordering::SeqCst), 1);
        assert_eq!(file.terminated.load(Ordering::SeqCst), 1);
        assert_eq!(console.initialized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_initialize_leaves_registry_uninitialized() {
        struct FailingTransport;

        impl Transport for FailingTransport {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn initialize(&self, _params: Option<SectionRef<'_>>) -> Result<()> {
                Err(LogError::InvalidParameter {
                    field: "ip",
                    reason: "bad".into(),
                })
            }
            fn terminate(&self) -> Result<()> {
                Ok(())
            }
            fn transmit(&self, _line: &[u8]) -> Result<()> {
                Ok(())
            }
        }

        let registry = TransportRegistry::new(vec![Box::new(FailingTransport)]);
        let config = doc("");

        assert!(registry.acquire(&config).is_err());
        assert_eq!(registry.state(), RegistryState::Uninitialized);
        assert_eq!(registry.handle_count(), 0);
    }
}
