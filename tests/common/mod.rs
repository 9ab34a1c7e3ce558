//! Helpers shared by the browser-driven integration tests.

#![allow(dead_code)]

use periplus_e2e::cft::find_chrome_in_dir;
use periplus_e2e::config::{load_config, validate_chrome_path, BrowserSource, SuiteConfig};
use std::path::{Path, PathBuf};

const PATH_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// A Chrome binary the tests can launch without network access, or None (test is skipped).
///
/// Looks at the suite config first (so `CHROME_PATH` wins), then at any Chrome
/// for Testing build already cached under its `download_dir`, then on `PATH`.
pub fn find_chrome() -> Option<PathBuf> {
    let config = load_config().unwrap_or_default();
    configured_chrome(&config)
        .or_else(|| cached_cft_chrome(&config.download_dir))
        .or_else(chrome_on_path)
}

fn configured_chrome(config: &SuiteConfig) -> Option<PathBuf> {
    match &config.browser_source {
        BrowserSource::Custom { path } => match validate_chrome_path(path) {
            Ok(()) => Some(path.clone()),
            Err(e) => {
                eprintln!("Ignoring configured Chrome: {}", e);
                None
            }
        },
        BrowserSource::ChromeForTesting { .. } => None,
    }
}

/// `download_dir` holds one directory per downloaded version.
pub fn cached_cft_chrome(download_dir: &Path) -> Option<PathBuf> {
    let mut versions: Vec<PathBuf> = download_dir
        .read_dir()
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    versions.sort();
    versions
        .iter()
        .rev()
        .find_map(|dir| find_chrome_in_dir(dir))
        .filter(|p| validate_chrome_path(p).is_ok())
}

fn chrome_on_path() -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| PATH_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| validate_chrome_path(candidate).is_ok())
}
