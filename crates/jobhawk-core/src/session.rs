use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// One persisted authentication cookie.
///
/// `expires` and `same_site` are recorded as exported by the browser but are
/// rejected by the cookie-injection call when replayed, so the reader strips
/// them before the artifact leaves the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

fn default_path() -> String {
    "/".to_string()
}

impl StoredCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: default_path(),
            secure: false,
            http_only: false,
            expires: None,
            same_site: None,
        }
    }

    /// Drop the attributes the browser rejects on re-injection.
    pub fn sanitized(mut self) -> Self {
        self.expires = None;
        self.same_site = None;
        self
    }
}

/// Durable holder of the session artifact between runs.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at a state directory; the artifact lives in
    /// `cookies.json` inside it.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: state_dir.into().join("cookies.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted artifact, sanitized for re-injection. Returns
    /// `Ok(None)` when no artifact has been saved yet.
    pub fn load(&self) -> Result<Option<Vec<StoredCookie>>> {
        if !self.path.exists() {
            tracing::debug!("No session artifact at {}", self.path.display());
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let cookies: Vec<StoredCookie> = serde_json::from_reader(reader)?;

        tracing::info!(
            "Loaded session artifact with {} cookies from {}",
            cookies.len(),
            self.path.display()
        );

        Ok(Some(cookies.into_iter().map(StoredCookie::sanitized).collect()))
    }

    /// Persist the artifact. The document is written to a sibling temp file
    /// and renamed into place, so a concurrent `load` never observes a
    /// partial write.
    pub fn save(&self, cookies: &[StoredCookie]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, cookies)?;
        }
        std::fs::rename(&tmp, &self.path)?;

        tracing::info!(
            "Saved session artifact with {} cookies to {}",
            cookies.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Delete the persisted artifact. Deleting an absent artifact is not an
    /// error.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::info!("Cleared session artifact at {}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str) -> StoredCookie {
        let mut c = StoredCookie::new(name, "v");
        c.domain = ".monster.com".to_string();
        c
    }

    #[test]
    fn test_load_returns_none_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips_core_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let mut saved = cookie("sid");
        saved.secure = true;
        saved.http_only = true;
        store.save(&[saved.clone()]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, vec![saved]);
    }

    #[test]
    fn test_load_strips_rejected_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let mut saved = cookie("sid");
        saved.expires = Some(1_900_000_000.0);
        saved.same_site = Some("Lax".to_string());
        store.save(&[saved]).unwrap();

        // The saved document keeps them; the loaded artifact never does.
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("expires"));
        assert!(raw.contains("same_site"));

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded[0].expires, None);
        assert_eq!(loaded[0].same_site, None);
    }

    #[test]
    fn test_load_tolerates_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        std::fs::write(
            store.path(),
            r#"[{"name": "sid", "value": "v", "domain": ".monster.com", "priority": "Medium", "sourcePort": 443}]"#,
        )
        .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "sid");
        assert_eq!(loaded[0].path, "/");
    }

    #[test]
    fn test_save_overwrites_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&[cookie("old")]).unwrap();
        store.save(&[cookie("new")]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "new");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&[cookie("sid")]).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();

        assert!(store.load().unwrap().is_none());
    }
}
