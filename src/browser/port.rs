use std::sync::atomic::{AtomicU16, Ordering};

static CDP_PORT_COUNTER: AtomicU16 = AtomicU16::new(9222);

/// Allocate the next CDP remote-debugging port.
/// Starts at 9222 and increments; wraps around at 65500.
pub fn allocate_cdp_port() -> u16 {
    let port = CDP_PORT_COUNTER.fetch_add(1, Ordering::SeqCst);
    if port > 65500 {
        CDP_PORT_COUNTER.store(9222, Ordering::SeqCst);
        return 9222;
    }
    port
}

/// Allocate a port that nothing is currently listening on.
pub fn allocate_free_cdp_port() -> u16 {
    for _ in 0..64 {
        let port = allocate_cdp_port();
        if std::net::TcpListener::bind(("127.0.0.1", port)).is_ok() {
            return port;
        }
        tracing::debug!("CDP port {} is busy, trying the next one", port);
    }
    allocate_cdp_port()
}
