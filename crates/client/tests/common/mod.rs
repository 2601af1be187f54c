pub mod server;

#[allow(unused_imports)]
pub use server::{API_PREFIX, TestCatalogServer};

use std::net::TcpListener;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route client logs to the test harness; filter with RUST_LOG.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Sandboxed environments may forbid binding even to loopback.
#[allow(dead_code)]
pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}
