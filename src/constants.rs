//! Crate-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Line format
// =============================================================================

/// Separator between fields of a formatted line
pub const FIELD_SEPARATOR: char = '|';

/// Maximum text width of the timestamp field (`HH:MM:SS DD/MM/YY`)
pub const TIMESTAMP_WIDTH: usize = 17;

/// Maximum text width of the filename field
pub const FILENAME_WIDTH: usize = 19;

/// Maximum text width of the line-number field
pub const LINENUMBER_WIDTH: usize = 5;

/// Maximum text width of the function-name field
pub const FUNCTION_WIDTH: usize = 61;

/// Maximum text width of the severity label field
pub const SEVERITY_WIDTH: usize = 5;

/// Maximum text width of the free-form message field
pub const MESSAGE_WIDTH: usize = 1023;

/// Maximum length of one assembled line, separators included
pub const MAX_LINE_LEN: usize = TIMESTAMP_WIDTH
    + FILENAME_WIDTH
    + LINENUMBER_WIDTH
    + FUNCTION_WIDTH
    + SEVERITY_WIDTH
    + MESSAGE_WIDTH
    + 5;

/// Label substituted when a severity mask is not exactly one known flag
pub const SEVERITY_PLACEHOLDER: &str = "?????";

// =============================================================================
// Config
// =============================================================================

/// Reserved section holding per-component severity short-codes
pub const OVERRIDES_SECTION: &str = "overrides";

/// Prefix of the section that selects the active transport
pub const OUTPUT_SECTION_PREFIX: &str = "output=";

/// Key naming the log file path in the file transport's section
pub const FILE_OUTPUT_KEY: &str = "output";

/// Keys naming the datagram destination in the udp transport's section
pub const UDP_IP_KEY: &str = "ip";
pub const UDP_PORT_KEY: &str = "port";
