pub mod completion;
pub mod scrape;
pub mod session;

use std::path::PathBuf;

/// State directory holding the session artifact and persistent profiles.
pub fn state_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".jobhawk"))
}
