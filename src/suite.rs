//! Explicit setup / run / teardown for a suite of cases sharing one session.

use crate::config::{Credentials, SuiteConfig};
use crate::error::Result;
use crate::session::{now_ms, Session};
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

/// Outcome of a whole suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn new(results: Vec<CaseResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn case(&self, name: &str) -> Option<&CaseResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// One line per failed case: `name: message`.
    pub fn failure_summary(&self) -> String {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| format!("{}: {}", r.name, r.error.as_deref().unwrap_or("failed")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct Suite {
    session: Session,
    results: Vec<CaseResult>,
    started: Instant,
}

impl Suite {
    /// Start the browser session every case of this suite will share.
    pub async fn setup(config: SuiteConfig, credentials: Credentials) -> Result<Self> {
        let session = Session::start(config, credentials).await?;
        Ok(Self::with_session(session))
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            results: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Run one case. A failure is recorded and ends this case only.
    pub async fn run_case<F>(&mut self, name: &str, case: F) -> bool
    where
        F: for<'a> FnOnce(&'a mut Session) -> LocalBoxFuture<'a, Result<()>>,
    {
        tracing::info!("Case {} started", name);
        let start = Instant::now();
        let outcome = case(&mut self.session).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(()) => {
                tracing::info!("Case {} passed in {}ms", name, duration_ms);
                CaseResult {
                    name: name.to_string(),
                    passed: true,
                    duration_ms,
                    error: None,
                    screenshot: None,
                }
            }
            Err(e) => {
                tracing::warn!("Case {} failed in {}ms: {}", name, duration_ms, e);
                CaseResult {
                    name: name.to_string(),
                    passed: false,
                    duration_ms,
                    error: Some(e.to_string()),
                    screenshot: self.capture_failure(name).await,
                }
            }
        };

        let passed = result.passed;
        self.results.push(result);
        passed
    }

    async fn capture_failure(&self, name: &str) -> Option<PathBuf> {
        let dir = self.session.config().screenshot_dir.clone()?;
        match self.session.save_screenshot(&dir, name).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Could not capture screenshot for {}: {}", name, e);
                None
            }
        }
    }

    /// Close the browser, whatever the cases did, and report.
    pub async fn teardown(self) -> SuiteReport {
        let duration_ms = self.started.elapsed().as_millis() as u64;
        if let Err(e) = self.session.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }

        let report = SuiteReport::new(self.results, duration_ms);
        tracing::info!(
            "Suite finished at {}: {}/{} passed in {}ms",
            now_ms(),
            report.passed,
            report.total,
            report.duration_ms
        );
        report
    }
}
