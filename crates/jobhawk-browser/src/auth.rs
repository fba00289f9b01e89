use crate::driver::DriverSession;
use crate::pacer::{Delay, Pacer};
use crate::{Error, Result};
use jobhawk_core::session::SessionStore;
use jobhawk_core::site::SiteProfile;
use std::time::Duration;

/// Bounded wait for the login controls to render.
const LOGIN_WAIT: Duration = Duration::from_secs(10);
/// Bounded wait for the post-submit URL change.
const URL_CHANGE_WAIT: Duration = Duration::from_secs(10);
/// Chance of an extra hesitation right before submitting credentials.
const SUBMIT_HESITATION: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    SessionRestoreAttempted,
    CredentialLoginAttempted,
    Authenticated,
    Failed,
}

/// Login identifier and secret, supplied by the caller. Treated as opaque;
/// the secret never reaches logs or debug output.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Establishes an authenticated session: restore from the stored artifact
/// when possible, fall back to interactive credential login, and commit
/// newly established sessions back to the store.
pub struct AuthManager<'a> {
    driver: &'a DriverSession,
    pacer: &'a Pacer,
    store: &'a SessionStore,
    site: &'a SiteProfile,
    state: AuthState,
}

impl<'a> AuthManager<'a> {
    pub fn new(
        driver: &'a DriverSession,
        pacer: &'a Pacer,
        store: &'a SessionStore,
        site: &'a SiteProfile,
    ) -> Self {
        Self {
            driver,
            pacer,
            store,
            site,
            state: AuthState::Unauthenticated,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Drive the session to an authenticated state. Already-valid stored
    /// sessions short-circuit before any interactive login action.
    pub async fn ensure_authenticated(&mut self, credentials: &Credentials) -> Result<()> {
        self.driver.goto(&self.site.home_url).await?;
        self.pacer.delay(Delay::Long).await;

        if let Some(cookies) = self.store.load()? {
            let injected = self.driver.inject_cookies(&cookies).await;
            tracing::info!("Restored {}/{} cookies from saved session", injected, cookies.len());
            self.driver.refresh().await?;
            self.pacer.delay(Delay::Normal).await;
        }
        self.state = AuthState::SessionRestoreAttempted;

        if self.is_logged_in().await {
            tracing::info!("Logged in via saved session");
            self.state = AuthState::Authenticated;
            return Ok(());
        }

        tracing::info!("Saved session not accepted, performing interactive login");
        self.state = AuthState::CredentialLoginAttempted;
        match self.login(credentials).await {
            Ok(()) => {
                let cookies = self.driver.export_cookies().await?;
                self.store.save(&cookies)?;
                tracing::info!("Login successful, session saved");
                self.state = AuthState::Authenticated;
                Ok(())
            }
            Err(e) => {
                self.state = AuthState::Failed;
                Err(Error::Auth(e.to_string()))
            }
        }
    }

    /// The account badge only renders for a logged-in session.
    async fn is_logged_in(&self) -> bool {
        self.driver.element_exists(&self.site.account_badge).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<()> {
        let entry = self
            .driver
            .wait_for_element(&self.site.login_entry, LOGIN_WAIT)
            .await?;
        entry.click().await?;
        self.pacer.delay(Delay::Normal).await;

        let email_field = self
            .driver
            .wait_for_element(&self.site.email_field, LOGIN_WAIT)
            .await?;
        let password_field = self.driver.page().find_element(&self.site.password_field).await?;
        let submit = self.driver.page().find_element(&self.site.login_submit).await?;

        self.pacer.type_like_human(&email_field, &credentials.email).await?;
        self.pacer.delay(Delay::Short).await;
        self.pacer
            .type_like_human(&password_field, &credentials.password)
            .await?;
        self.pacer.maybe_extra_pause(SUBMIT_HESITATION).await;

        let before = self.driver.current_url().await?;
        submit.click().await?;
        self.driver.wait_for_url_change(&before, URL_CHANGE_WAIT).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("user@example.com", "hunter2");
        let debug = format!("{:?}", credentials);

        assert!(debug.contains("user@example.com"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }

    // Full login-flow transitions require a running Chrome instance and a
    // reachable login form; they are exercised manually. The state machine
    // below only moves through:
    //   Unauthenticated -> SessionRestoreAttempted -> Authenticated
    //   Unauthenticated -> SessionRestoreAttempted
    //     -> CredentialLoginAttempted -> Authenticated | Failed
}
