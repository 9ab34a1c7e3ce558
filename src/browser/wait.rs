//! Bounded polling waits for element state.

use crate::browser::cdp::CDPClient;
use crate::browser::element::ElementRef;
use crate::browser::locator::Locator;
use crate::error::{Result, SuiteError};
use std::future::Future;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct Wait {
    timeout: Duration,
    poll: Duration,
}

impl Wait {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll: POLL_INTERVAL,
        }
    }

    pub fn with_poll(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll `probe` until it yields `Some`, or fail with `Timeout(what)`.
    ///
    /// Element and protocol errors count as "not yet" (the page may be
    /// mid-navigation); transport errors end the wait immediately.
    pub async fn until<T, F, Fut>(&self, what: &str, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let start = Instant::now();
        loop {
            match probe().await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e @ (SuiteError::Cdp(_) | SuiteError::ElementNotFound(_))) => {
                    tracing::trace!("Still waiting for {}: {}", what, e);
                }
                Err(e) => return Err(e),
            }

            if start.elapsed() >= self.timeout {
                tracing::debug!("Gave up waiting for {} after {:?}", what, self.timeout);
                return Err(SuiteError::Timeout(what.to_string()));
            }
            tokio::time::sleep(self.poll).await;
        }
    }

    /// Wait until the first match of `locator` is displayed.
    pub async fn until_visible(&self, client: &CDPClient, locator: &Locator) -> Result<ElementRef> {
        let element = ElementRef::root(locator.clone(), 0);
        let target = &element;
        self.until(&format!("visibility of {}", locator), || async move {
            Ok::<_, SuiteError>(client.is_displayed(target).await?.then_some(()))
        })
        .await?;
        tracing::debug!("Element visible: {}", locator);
        Ok(element)
    }

    /// Wait until no match of `locator` is displayed (absent counts as invisible).
    pub async fn until_invisible(&self, client: &CDPClient, locator: &Locator) -> Result<()> {
        let element = ElementRef::root(locator.clone(), 0);
        let target = &element;
        self.until(&format!("invisibility of {}", locator), || async move {
            Ok::<_, SuiteError>((!client.is_displayed(target).await?).then_some(()))
        })
        .await
    }
}
