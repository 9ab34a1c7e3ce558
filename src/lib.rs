//! End-to-end cart tests for periplus.com, driven over the Chrome DevTools Protocol.
//!
//! A [`suite::Suite`] owns one [`session::Session`] (one Chrome process) and
//! runs the cart [`scenarios`] on it in order. The page flows themselves live
//! in [`periplus`]; [`browser`] is the small CDP client underneath.

pub mod browser;
pub mod cft;
pub mod config;
pub mod error;
pub mod periplus;
pub mod scenarios;
pub mod session;
pub mod suite;

pub use error::{Result, SuiteError};
pub use session::{AuthState, Session};
pub use suite::{Suite, SuiteReport};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber (`RUST_LOG`, default `info`). Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
