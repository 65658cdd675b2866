use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TEST_SETUP: Once = Once::new();

/// Global logging subscriber for tests; safe to call from every test.
pub fn init_test_logging() {
    TEST_SETUP.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
