use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Sentinel value used when a listing does not advertise a salary.
pub const SALARY_NOT_SPECIFIED: &str = "Not specified";

/// Search input for one run. Supplied by the caller and immutable for the
/// duration of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub title: String,
    pub location: String,
}

impl SearchParams {
    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
        }
    }
}

/// One extracted job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub salary: String,
    pub source: String,
    pub scraped_at: String,
}

impl Listing {
    /// Create a listing record. The title is the only required field; an
    /// empty title is rejected so a record without one can never exist.
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::InvalidRecord("empty title".to_string()));
        }

        Ok(Self {
            title,
            company: None,
            location: None,
            salary: SALARY_NOT_SPECIFIED.to_string(),
            source: source.into(),
            scraped_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Accumulated output of one run: the listings in page render order, plus
/// the number of containers skipped because no title could be read.
#[derive(Debug, Default)]
pub struct RunReport {
    pub listings: Vec<Listing>,
    pub skipped: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, listing: Listing) {
        self.listings.push(listing);
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_requires_title() {
        let result = Listing::new("", "monster");
        assert!(result.is_err());

        let result = Listing::new("   ", "monster");
        assert!(result.is_err());
    }

    #[test]
    fn test_listing_defaults_to_salary_sentinel() {
        let listing = Listing::new("Software Engineer", "monster").unwrap();

        assert_eq!(listing.salary, SALARY_NOT_SPECIFIED);
        assert_eq!(listing.company, None);
        assert_eq!(listing.location, None);
        assert_eq!(listing.source, "monster");
        assert!(!listing.scraped_at.is_empty());
    }

    #[test]
    fn test_listing_serializes_without_absent_fields() {
        let listing = Listing::new("Software Engineer", "monster").unwrap();
        let json = serde_json::to_string(&listing).unwrap();

        assert!(json.contains("\"title\""));
        assert!(!json.contains("\"company\""));
        assert!(!json.contains("\"location\""));
    }

    #[test]
    fn test_run_report_counts() {
        let mut report = RunReport::new();
        assert!(report.is_empty());

        report.push(Listing::new("Engineer", "monster").unwrap());
        report.skipped += 1;

        assert_eq!(report.len(), 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.is_empty());
    }
}
