pub mod builders;
pub mod sink;
pub mod spy;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install the tracing subscriber for a test binary, once per process.
///
/// Uses the test writer, so log output is swallowed for passing tests and
/// shown for failing ones (or with `-- --nocapture`). The level comes from
/// `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}
