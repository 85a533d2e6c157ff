//! Process-wide tracing setup shared by the binaries.

pub mod tracing;

/// Initialize structured logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}
