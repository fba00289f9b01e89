use crate::{Error, Result};
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tempfile::TempDir;

const DEFAULT_DEBUGGING_PORT: u16 = 9222;

/// Desktop user agents rotated per launch.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
];

enum ProfileDir {
    /// Deleted when the launcher is dropped.
    Temporary(TempDir),
    Persistent(PathBuf),
}

impl ProfileDir {
    fn path(&self) -> &Path {
        match self {
            ProfileDir::Temporary(dir) => dir.path(),
            ProfileDir::Persistent(path) => path,
        }
    }
}

/// Manages the Chrome process for one run: binary discovery, launch
/// arguments, and the profile directory.
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile: ProfileDir,
    headless: bool,
    user_agent: String,
    debugging_port: u16,
}

impl ChromeLauncher {
    /// Create a launcher. With no profile directory a throwaway profile is
    /// used and removed when the launcher is dropped.
    pub fn new(
        chrome_path: Option<PathBuf>,
        profile_dir: Option<PathBuf>,
        headless: bool,
    ) -> Result<Self> {
        let chrome_path = find_chrome(chrome_path)?;

        let profile = match profile_dir {
            Some(path) => {
                if !path.exists() {
                    std::fs::create_dir_all(&path)?;
                }
                ProfileDir::Persistent(path)
            }
            None => ProfileDir::Temporary(tempfile::tempdir()?),
        };

        Ok(Self {
            chrome_path,
            profile,
            headless,
            user_agent: random_user_agent().to_string(),
            debugging_port: DEFAULT_DEBUGGING_PORT,
        })
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Launch the Chrome process.
    pub fn launch(&self) -> Result<Child> {
        let args = self.build_args();
        tracing::debug!("Launching {} with {} args", self.chrome_path.display(), args.len());

        Command::new(&self.chrome_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    /// Build Chrome command-line arguments.
    fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-data-dir={}", self.profile.path().display()),
            "--disable-blink-features=AutomationControlled".to_string(),
            "--disable-extensions".to_string(),
            "--disable-infobars".to_string(),
            "--window-size=1920,1080".to_string(),
            format!("--user-agent={}", self.user_agent),
        ];

        if self.headless {
            args.push("--headless=new".to_string());
            args.push("--no-sandbox".to_string());
            args.push("--disable-dev-shm-usage".to_string());
            args.push("--disable-gpu".to_string());
        }

        args.push("about:blank".to_string());

        args
    }
}

/// Find the Chrome binary: explicit path first, then $PATH, then platform
/// default install locations.
fn find_chrome(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = custom_path {
        return validate_chrome_path(&path);
    }

    for name in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }

    let default_paths = default_chrome_paths();
    for path in &default_paths {
        if let Ok(valid_path) = validate_chrome_path(path) {
            return Ok(valid_path);
        }
    }

    Err(Error::Browser(format!(
        "Chrome not found. Checked: {}. Use --chrome-path to specify location.",
        default_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

fn default_chrome_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    return vec![
        PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
        PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
    ];

    #[cfg(target_os = "linux")]
    return vec![
        PathBuf::from("/usr/bin/google-chrome"),
        PathBuf::from("/usr/bin/chromium"),
        PathBuf::from("/usr/bin/chromium-browser"),
    ];

    #[cfg(target_os = "windows")]
    return vec![
        PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return vec![];
}

fn validate_chrome_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::Browser(format!(
            "Chrome not found at: {}",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path).map_err(Error::Io)?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(Error::Browser(format!(
                "Chrome binary not executable: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(USER_AGENTS[0])
}
