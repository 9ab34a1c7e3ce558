//! CDP (Chrome DevTools Protocol) browser control.

pub mod cdp;
mod dom;
pub mod element;
pub mod launcher;
pub mod locator;
pub mod port;
pub mod wait;

pub use cdp::CDPClient;
pub use element::ElementRef;
pub use launcher::LaunchOptions;
pub use locator::Locator;
pub use wait::Wait;
