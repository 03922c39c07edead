//! Process-wide logging setup shared by the console binary.

/// Initialize structured logging on stderr.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_DIRECTIVE);
}

/// Subscriber configuration (filters, layers).
pub mod tracing;
