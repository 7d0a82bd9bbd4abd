//! Log output for the binary.

use env_logger::{Builder, Env};

/// Installs `env_logger` as the `log` backend. Library events are emitted
/// through `tracing` and reach it via the `log` feature. `RUST_LOG` overrides
/// the default `info` filter.
pub fn init_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
