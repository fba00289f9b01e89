use crate::auth::{AuthManager, Credentials};
use crate::driver::DriverSession;
use crate::extract::ListingExtractor;
use crate::launcher::ChromeLauncher;
use crate::pacer::{Delay, Pacer};
use crate::Result;
use jobhawk_core::listing::{RunReport, SearchParams};
use jobhawk_core::session::SessionStore;
use jobhawk_core::site::SiteProfile;
use std::path::PathBuf;
use std::process::Child;
use std::time::Duration;

/// Bounded wait for the search form to render.
const SEARCH_FORM_WAIT: Duration = Duration::from_secs(10);

/// Everything one run needs before the browser comes up.
pub struct RunnerConfig {
    pub site: SiteProfile,
    /// Directory holding the session artifact (and persistent profiles).
    pub state_dir: PathBuf,
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    /// Persistent Chrome profile directory; a throwaway profile otherwise.
    pub profile_dir: Option<PathBuf>,
    pub pacer: Pacer,
}

/// Owns the browser session and the result collection for exactly one run:
/// launch -> authenticate -> search -> extract -> teardown.
pub struct Runner {
    chrome: Child,
    driver: DriverSession,
    pacer: Pacer,
    store: SessionStore,
    site: SiteProfile,
    // Keeps the temporary profile directory alive for the browser's lifetime.
    _launcher: ChromeLauncher,
}

impl Runner {
    /// Launch Chrome and connect. On connection failure the process is
    /// killed before the error surfaces.
    pub async fn open(config: RunnerConfig) -> Result<Self> {
        let launcher =
            ChromeLauncher::new(config.chrome_path, config.profile_dir, config.headless)?;
        let mut chrome = launcher.launch()?;

        let driver = match DriverSession::connect(launcher.debugging_port()).await {
            Ok(driver) => driver,
            Err(e) => {
                let _ = chrome.kill();
                let _ = chrome.wait();
                return Err(e);
            }
        };

        Ok(Self {
            chrome,
            driver,
            pacer: config.pacer,
            store: SessionStore::new(config.state_dir),
            site: config.site,
            _launcher: launcher,
        })
    }

    /// One full run. Authentication failure is fatal; a failed search
    /// submission yields an empty report instead, since there is nothing
    /// meaningful to extract.
    pub async fn run(
        &mut self,
        params: &SearchParams,
        credentials: &Credentials,
        max_items: usize,
    ) -> Result<RunReport> {
        let mut auth = AuthManager::new(&self.driver, &self.pacer, &self.store, &self.site);
        auth.ensure_authenticated(credentials).await?;

        if let Err(e) = self.submit_search(params).await {
            tracing::error!("Search submission failed, nothing to extract: {}", e);
            return Ok(RunReport::new());
        }

        let extractor = ListingExtractor::new(&self.driver, &self.pacer, &self.site);
        extractor.extract(max_items).await
    }

    async fn submit_search(&self, params: &SearchParams) -> Result<()> {
        tracing::info!(
            "Searching {} for '{}' in '{}'",
            self.site.id,
            params.title,
            params.location
        );

        self.driver.goto(&self.site.home_url).await?;
        self.pacer.delay(Delay::Long).await;
        self.pacer.scroll(&self.driver).await?;

        let title_field = self
            .driver
            .wait_for_element(&self.site.search_title_field, SEARCH_FORM_WAIT)
            .await?;
        let location_field = self
            .driver
            .page()
            .find_element(&self.site.search_location_field)
            .await?;

        self.driver.clear_field(&title_field).await?;
        self.pacer.type_like_human(&title_field, &params.title).await?;
        self.pacer.delay(Delay::Short).await;

        self.driver.clear_field(&location_field).await?;
        self.pacer
            .type_like_human(&location_field, &params.location)
            .await?;
        self.pacer.delay(Delay::Short).await;

        self.driver.click(&self.site.search_submit).await?;
        self.pacer.delay(Delay::Long).await;

        Ok(())
    }

    /// Release the browser session. Runs on every exit path: persists the
    /// current cookies best-effort, disconnects, and terminates Chrome.
    pub async fn close(mut self) {
        match self.driver.export_cookies().await {
            Ok(cookies) => {
                if let Err(e) = self.store.save(&cookies) {
                    tracing::warn!("Could not persist session on teardown: {}", e);
                }
            }
            Err(e) => tracing::warn!("Could not export cookies on teardown: {}", e),
        }

        self.driver.close().await;

        if let Err(e) = self.chrome.kill() {
            tracing::debug!("Chrome already gone: {}", e);
        }
        let _ = self.chrome.wait();
    }
}
