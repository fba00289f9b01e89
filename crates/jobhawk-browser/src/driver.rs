use crate::{Error, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::network::{Cookie, CookieParam, CookieSameSite};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use jobhawk_core::session::StoredCookie;
use std::time::{Duration, Instant};

const CONNECT_ATTEMPTS: u32 = 5;
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One connected browser session: the DOM-level capability surface the
/// rest of the crate drives. Owned by exactly one run at a time.
pub struct DriverSession {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
}

impl DriverSession {
    /// Connect to a Chrome instance over CDP with retries (Chrome may not
    /// be fully ready right after launch), then adopt its first page.
    pub async fn connect(debugging_port: u16) -> Result<Self> {
        let ws_url = format!("http://localhost:{}", debugging_port);

        let (browser, mut handler) = {
            let mut retries = CONNECT_ATTEMPTS;
            loop {
                tracing::debug!("Attempting CDP connection to {}...", ws_url);
                match Browser::connect(&ws_url).await {
                    Ok(result) => {
                        tracing::info!("CDP connection established");
                        break result;
                    }
                    Err(e) => {
                        retries -= 1;
                        if retries == 0 {
                            return Err(Error::Cdp(format!(
                                "Failed to connect to Chrome after {} attempts: {}",
                                CONNECT_ATTEMPTS, e
                            )));
                        }
                        tracing::info!("CDP connection attempt failed, retrying... ({} left)", retries);
                        tokio::time::sleep(Duration::from_millis(500)).await;
                    }
                }
            }
        };

        // The handler task must run for any browser command to complete.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        // Give Chrome a moment to create its initial page.
        tokio::time::sleep(Duration::from_millis(500)).await;

        let page = if let Some(page) = browser.pages().await?.first() {
            tracing::debug!("Adopting existing page");
            page.clone()
        } else {
            tracing::debug!("No existing pages, creating new page");
            browser.new_page("about:blank").await?
        };

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate and wait for the navigation to commit.
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    pub async fn refresh(&self) -> Result<()> {
        self.page.reload().await?;
        Ok(())
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// Whether an element matching the selector is present right now.
    pub async fn element_exists(&self, selector: &str) -> bool {
        self.page.find_element(selector).await.is_ok()
    }

    /// Poll for an element until it appears or the bound elapses.
    pub async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<Element> {
        let start = Instant::now();
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Ok(element);
            }
            if start.elapsed() >= timeout {
                return Err(Error::Wait(format!("element {}", selector)));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Poll until the page URL differs from `previous` or the bound elapses.
    /// The URL change is the only success signal a credential submission
    /// gives us.
    pub async fn wait_for_url_change(&self, previous: &str, timeout: Duration) -> Result<String> {
        let start = Instant::now();
        loop {
            let current = self.current_url().await?;
            if current != previous {
                return Ok(current);
            }
            if start.elapsed() >= timeout {
                return Err(Error::Wait("URL change".to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    pub async fn find_elements(&self, selector: &str) -> Result<Vec<Element>> {
        Ok(self.page.find_elements(selector).await?)
    }

    pub async fn click(&self, selector: &str) -> Result<()> {
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        Ok(())
    }

    /// Empty a text input in place.
    pub async fn clear_field(&self, element: &Element) -> Result<()> {
        element.focus().await?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await?;
        Ok(())
    }

    pub async fn scroll_by(&self, pixels: i64) -> Result<()> {
        self.page
            .evaluate(format!("window.scrollBy(0, {});", pixels))
            .await?;
        Ok(())
    }

    /// Export the session's cookies as storable records.
    pub async fn export_cookies(&self) -> Result<Vec<StoredCookie>> {
        let cookies = self.page.get_cookies().await?;
        Ok(cookies.into_iter().map(stored_from_cdp).collect())
    }

    /// Inject cookies one at a time, skipping individual failures so one
    /// malformed record never invalidates the rest of the artifact.
    /// Returns how many were accepted.
    pub async fn inject_cookies(&self, cookies: &[StoredCookie]) -> usize {
        let mut injected = 0;
        for cookie in cookies {
            let mut param = CookieParam::new(cookie.name.clone(), cookie.value.clone());
            if !cookie.domain.is_empty() {
                param.domain = Some(cookie.domain.clone());
            }
            param.path = Some(cookie.path.clone());
            param.secure = Some(cookie.secure);
            param.http_only = Some(cookie.http_only);

            match self.page.set_cookies(vec![param]).await {
                Ok(_) => injected += 1,
                Err(e) => {
                    tracing::debug!("Could not inject cookie {}: {}", cookie.name, e);
                }
            }
        }
        injected
    }

    /// Disconnect from the browser. The Chrome process itself is owned and
    /// terminated by the caller.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed (continuing): {}", e);
        }
        self.handler_task.abort();
    }
}

fn stored_from_cdp(cookie: Cookie) -> StoredCookie {
    let mut stored = StoredCookie::new(cookie.name, cookie.value);
    stored.domain = cookie.domain;
    stored.path = cookie.path;
    stored.secure = cookie.secure;
    stored.http_only = cookie.http_only;
    // Session cookies report a placeholder expiry; only real ones are kept.
    stored.expires = (!cookie.session).then_some(cookie.expires);
    stored.same_site = cookie.same_site.map(|s| {
        match s {
            CookieSameSite::Strict => "Strict",
            CookieSameSite::Lax => "Lax",
            CookieSameSite::None => "None",
        }
        .to_string()
    });
    stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChromeLauncher;

    #[tokio::test]
    #[ignore] // Requires Chrome/Chromium on the machine
    async fn test_connect_and_navigate() {
        let launcher = ChromeLauncher::new(None, None, true).unwrap();
        let mut chrome = launcher.launch().unwrap();

        let session = DriverSession::connect(launcher.debugging_port())
            .await
            .unwrap();
        session.goto("about:blank").await.unwrap();
        assert_eq!(session.current_url().await.unwrap(), "about:blank");

        session.close().await;
        let _ = chrome.kill();
        let _ = chrome.wait();
    }
}
