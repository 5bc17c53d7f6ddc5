//! Logging setup.

/// Installs `env_logger` as the `log` backend.
///
/// Filtering follows `RUST_LOG` (for example `RUST_LOG=tessgrid=debug`).
/// Calling this more than once, or after another logger was installed, is
/// harmless.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::debug!("tessgrid logging initialized");
    }
}
