//! Download and extract a CfT Chrome binary; return path to executable.

use crate::cft::api::CftVersionInfo;
use crate::error::{Result, SuiteError};
use futures::stream::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Map current OS and arch to CfT platform string.
pub fn get_platform() -> &'static str {
    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    return "linux64";
    #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
    return "mac-arm64";
    #[cfg(all(target_os = "macos", target_arch = "x86_64"))]
    return "mac-x64";
    #[cfg(all(target_os = "windows", target_arch = "x86_64"))]
    return "win64";
    #[cfg(all(target_os = "windows", target_arch = "x86"))]
    return "win32";
    #[cfg(not(any(
        all(target_os = "linux", target_arch = "x86_64"),
        all(target_os = "macos", target_arch = "aarch64"),
        all(target_os = "macos", target_arch = "x86_64"),
        all(target_os = "windows", target_arch = "x86_64"),
        all(target_os = "windows", target_arch = "x86")
    )))]
    return "linux64";
}

/// Download zip from URL and extract to dir; return path to the Chrome binary inside.
pub async fn download_and_extract(url: &str, extract_dir: &Path) -> Result<PathBuf> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30 * 60))
        .build()?;
    let response = client.get(url).send().await?.error_for_status()?;

    let total = response.content_length();
    let mut stream = response.bytes_stream();
    let mut loaded: u64 = 0;
    let mut last_logged_pct: u64 = 0;

    std::fs::create_dir_all(extract_dir)?;

    let zip_path = extract_dir.join("chrome.zip");
    let mut file = std::fs::File::create(&zip_path)?;

    tracing::info!("Downloading Chrome from {}", url);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        loaded += chunk.len() as u64;
        file.write_all(&chunk)?;

        if let Some(total) = total.filter(|t| *t > 0) {
            let pct = loaded * 100 / total;
            if pct >= last_logged_pct + 10 {
                last_logged_pct = pct - pct % 10;
                tracing::info!("Chrome download {}% ({} / {} bytes)", last_logged_pct, loaded, total);
            }
        }
    }
    drop(file);

    tracing::info!("Extracting {:?}", zip_path);
    let bin_path = extract_zip(&zip_path, extract_dir)?;
    std::fs::remove_file(zip_path).ok();
    Ok(bin_path)
}

fn extract_zip(zip_path: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file = std::fs::File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| SuiteError::Download(format!("Invalid zip: {}", e)))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| SuiteError::Download(format!("Zip entry: {}", e)))?;
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!("Skipping zip entry with unsafe path: {}", entry.name());
            continue;
        };
        let out_path = dest_dir.join(&relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
        } else {
            if let Some(p) = out_path.parent() {
                std::fs::create_dir_all(p)?;
            }
            let mut out = std::fs::File::create(&out_path)?;
            std::io::copy(&mut entry, &mut out)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode)).ok();
                }
            }
        }
    }

    find_chrome_in_dir(dest_dir)
        .ok_or_else(|| SuiteError::Download("Chrome binary not found after extract".to_string()))
}

/// Ensure the given version is present under download_dir; return path to binary.
pub async fn ensure_chrome_binary(
    version_info: &CftVersionInfo,
    download_dir: &Path,
) -> Result<PathBuf> {
    let version_dir = download_dir.join(&version_info.version);
    if let Some(p) = find_chrome_in_dir(&version_dir) {
        tracing::debug!("Using cached Chrome at {:?}", p);
        return Ok(p);
    }
    download_and_extract(&version_info.url, &version_dir).await
}

/// Locate the Chrome executable inside an extracted CfT archive directory.
pub fn find_chrome_in_dir(dir: &Path) -> Option<PathBuf> {
    let entries = dir.read_dir().ok()?;
    for e in entries.flatten() {
        let name = e.file_name().to_string_lossy().to_string();
        let candidate = if name.starts_with("chrome-linux") {
            dir.join(&name).join("chrome")
        } else if name.starts_with("chrome-win") {
            dir.join(&name).join("chrome.exe")
        } else if name.starts_with("chrome-mac") {
            dir.join(&name)
                .join("Google Chrome for Testing.app")
                .join("Contents")
                .join("MacOS")
                .join("Google Chrome for Testing")
        } else {
            continue;
        };
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_chrome_in_missing_dir() {
        let dir = std::env::temp_dir().join(format!("periplus-cft-{}", uuid::Uuid::new_v4()));
        assert!(find_chrome_in_dir(&dir).is_none());
    }

    #[test]
    fn test_find_chrome_in_extracted_layout() {
        let dir = std::env::temp_dir().join(format!("periplus-cft-{}", uuid::Uuid::new_v4()));
        let bin_dir = dir.join("chrome-linux64");
        std::fs::create_dir_all(&bin_dir).unwrap();
        std::fs::write(bin_dir.join("chrome"), b"").unwrap();

        let found = find_chrome_in_dir(&dir);
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(found, Some(bin_dir.join("chrome")));
    }
}
