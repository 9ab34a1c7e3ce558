use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// How to start the browser for one suite run.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub cdp_port: u16,
    pub user_data_dir: PathBuf,
    pub headless: bool,
    pub extra_args: Vec<String>,
}

impl LaunchOptions {
    /// Options with a fresh throwaway profile directory under the system temp dir.
    pub fn temporary(cdp_port: u16, headless: bool) -> Self {
        Self {
            cdp_port,
            user_data_dir: std::env::temp_dir()
                .join(format!("periplus-e2e-{}", uuid::Uuid::new_v4())),
            headless,
            extra_args: Vec::new(),
        }
    }
}

/// Build Chrome launch command with remote debugging enabled
pub fn build_command(chrome_path: &Path, options: &LaunchOptions) -> Command {
    let mut cmd = Command::new(chrome_path);

    cmd.arg(format!("--remote-debugging-port={}", options.cdp_port));
    cmd.arg(format!(
        "--user-data-dir={}",
        options.user_data_dir.display()
    ));

    if options.headless {
        cmd.arg("--headless=new");
        cmd.arg("--disable-gpu");
    }

    cmd.arg("--no-first-run");
    cmd.arg("--no-default-browser-check");
    cmd.arg("--disable-background-networking");
    cmd.arg("--disable-sync");
    cmd.arg("--disable-default-apps");
    cmd.arg("--disable-dev-shm-usage");
    cmd.arg("--window-size=1366,900");

    for arg in &options.extra_args {
        cmd.arg(arg);
    }

    // Start on about:blank so the first target is an empty page
    cmd.arg("about:blank");

    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|s| s.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_build_command_basic() {
        let options = LaunchOptions {
            cdp_port: 9333,
            user_data_dir: PathBuf::from("/tmp/periplus-profile"),
            headless: false,
            extra_args: vec![],
        };

        let args = args_of(&build_command(Path::new("/usr/bin/google-chrome"), &options));

        assert!(args.contains(&"--remote-debugging-port=9333".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/periplus-profile".to_string()));
        assert!(!args.contains(&"--headless=new".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[test]
    fn test_build_command_headless_with_extra_args() {
        let options = LaunchOptions {
            extra_args: vec!["--no-sandbox".to_string()],
            ..LaunchOptions::temporary(9444, true)
        };

        let args = args_of(&build_command(Path::new("/usr/bin/chromium"), &options));

        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--user-data-dir=") && a.contains("periplus-e2e-")));
    }
}
