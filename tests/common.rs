// tests/common.rs
#![allow(dead_code)] // Allow unused helpers for now

use std::sync::Once;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Use std::sync::Once for one-time initialization
static TRACING_INIT: Once = Once::new();

// Setup function to initialize tracing
pub fn setup_tracing() {
  TRACING_INIT.call_once(|| {
    // Default level filter; can be overridden by the RUST_LOG env variable
    let default_filter = "stashq=trace,info";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
      .with_env_filter(env_filter)
      .with_target(true) // Show module path
      .with_test_writer() // Write to test output capture
      .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
  });
}
