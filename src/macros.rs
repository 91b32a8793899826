//! Call-site capture sugar over [`Logger::print`](crate::Logger::print)
//!
//! Each macro forwards the matching severity together with `file!()`,
//! `line!()` and `module_path!()`, so call sites only spell the message:
//!
//! ```
//! # use diaglog::{ConfigDocument, Router, diag_warn};
//! # let config = ConfigDocument::from_bytes(b"").unwrap();
//! # let router = Router::new(config);
//! let logger = router.logger(file!()).unwrap();
//! diag_warn!(logger, "retrying in {}ms", 250).unwrap();
//! # logger.term().unwrap();
//! ```
//!
//! Entry/exit markers take no message: `diag_entry!(logger)`.

/// Print at an explicit severity with call-site capture
#[macro_export]
macro_rules! diag_print {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger.print(
            $level,
            file!(),
            line!(),
            module_path!(),
            format_args!($($arg)*),
        )
    };
}

/// Mark a function entry
#[macro_export]
macro_rules! diag_entry {
    ($logger:expr) => {
        $crate::diag_print!($logger, $crate::SeverityMask::ENTRY, "")
    };
    ($logger:expr, $($arg:tt)*) => {
        $crate::diag_print!($logger, $crate::SeverityMask::ENTRY, $($arg)*)
    };
}

/// Mark a function exit
#[macro_export]
macro_rules! diag_exit {
    ($logger:expr) => {
        $crate::diag_print!($logger, $crate::SeverityMask::EXIT, "")
    };
    ($logger:expr, $($arg:tt)*) => {
        $crate::diag_print!($logger, $crate::SeverityMask::EXIT, $($arg)*)
    };
}

/// Print at trace severity
#[macro_export]
macro_rules! diag_trace {
    ($logger:expr, $($arg:tt)*) => {
        $crate::diag_print!($logger, $crate::SeverityMask::TRACE, $($arg)*)
    };
}

/// Print at info severity
#[macro_export]
macro_rules! diag_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::diag_print!($logger, $crate::SeverityMask::INFO, $($arg)*)
    };
}

/// Print at warn severity
#[macro_export]
macro_rules! diag_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::diag_print!($logger, $crate::SeverityMask::WARN, $($arg)*)
    };
}

/// Print at error severity
#[macro_export]
macro_rules! diag_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::diag_print!($logger, $crate::SeverityMask::ERROR, $($arg)*)
    };
}

/// Print at fatal severity
#[macro_export]
macro_rules! diag_fatal {
    ($logger:expr, $($arg:tt)*) => {
        $crate::diag_print!($logger, $crate::SeverityMask::FATAL, $($arg)*)
    };
}

/// Print at event severity
#[macro_export]
macro_rules! diag_event {
    ($logger:expr, $($arg:tt)*) => {
        $crate::diag_print!($logger, $crate::SeverityMask::EVENT, $($arg)*)
    };
}
