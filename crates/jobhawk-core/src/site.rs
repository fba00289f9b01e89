use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How a semantic field is read out of a located element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldRead {
    /// Use the element's rendered text.
    Text,
    /// Use the named attribute.
    Attribute(String),
}

/// Maps a semantic field to the element that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLocator {
    pub selector: String,
    pub read: FieldRead,
}

impl FieldLocator {
    pub fn text(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            read: FieldRead::Text,
        }
    }

    pub fn attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            read: FieldRead::Attribute(attribute.into()),
        }
    }
}

/// Per-site locator configuration. One profile is the single source of
/// truth for everything site-specific; the session, extraction, and run
/// logic are shared across sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Site identifier recorded in every listing's `source` field.
    pub id: String,
    pub home_url: String,

    /// Element that is only present when an account is logged in.
    pub account_badge: String,
    pub login_entry: String,
    pub email_field: String,
    pub password_field: String,
    pub login_submit: String,

    pub search_title_field: String,
    pub search_location_field: String,
    pub search_submit: String,

    /// One element per job posting on a results page.
    pub listing_container: String,
    pub title: FieldLocator,
    pub company: FieldLocator,
    pub location: FieldLocator,
    pub salary: Option<FieldLocator>,
}

impl SiteProfile {
    /// Monster.com, the reference target.
    pub fn monster() -> Self {
        Self {
            id: "monster".to_string(),
            home_url: "https://www.monster.com".to_string(),

            account_badge: "[aria-label='My Account']".to_string(),
            login_entry: "a[href*='login']".to_string(),
            email_field: "#Input_Email".to_string(),
            password_field: "#passwordInput".to_string(),
            login_submit: "[name='Input.Button']".to_string(),

            search_title_field: "#q2".to_string(),
            search_location_field: "#where2".to_string(),
            search_submit: "button[data-bi-id='search-button']".to_string(),

            listing_container: "[data-test-id^='svx-job-card-component']".to_string(),
            title: FieldLocator::attribute("h3 a", "aria-label"),
            company: FieldLocator::text("[data-test-id='svx-job-card-company-name']"),
            location: FieldLocator::text("[data-test-id='svx-job-card-location']"),
            salary: Some(FieldLocator::text("[data-test-id='svx-job-card-salary']")),
        }
    }

    /// Look up a built-in profile by its id.
    pub fn by_id(id: &str) -> Result<Self> {
        match id {
            "monster" => Ok(Self::monster()),
            other => Err(Error::UnknownSite(other.to_string())),
        }
    }

    /// Ids of all built-in profiles.
    pub fn builtin_ids() -> &'static [&'static str] {
        &["monster"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monster_profile_has_every_selector() {
        let profile = SiteProfile::monster();

        for selector in [
            &profile.account_badge,
            &profile.login_entry,
            &profile.email_field,
            &profile.password_field,
            &profile.login_submit,
            &profile.search_title_field,
            &profile.search_location_field,
            &profile.search_submit,
            &profile.listing_container,
            &profile.title.selector,
            &profile.company.selector,
            &profile.location.selector,
        ] {
            assert!(!selector.is_empty());
        }
    }

    #[test]
    fn test_by_id_resolves_builtins() {
        for id in SiteProfile::builtin_ids() {
            let profile = SiteProfile::by_id(id).unwrap();
            assert_eq!(&profile.id, id);
        }
    }

    #[test]
    fn test_by_id_rejects_unknown_site() {
        let result = SiteProfile::by_id("definitely-not-a-job-board");
        assert!(result.is_err());
    }

    #[test]
    fn test_monster_title_is_an_attribute_read() {
        let profile = SiteProfile::monster();
        assert_eq!(
            profile.title.read,
            FieldRead::Attribute("aria-label".to_string())
        );
    }
}
