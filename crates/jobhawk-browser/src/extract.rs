use crate::driver::DriverSession;
use crate::pacer::{Delay, Pacer};
use crate::Result;
use chromiumoxide::Element;
use jobhawk_core::listing::{Listing, RunReport};
use jobhawk_core::site::{FieldLocator, FieldRead, SiteProfile};
use std::time::Duration;

/// Bounded wait for the first listing container to render.
const CONTAINER_WAIT: Duration = Duration::from_secs(20);
/// Chance of a viewport-varying scroll after each extracted listing.
const SCROLL_CHANCE: f64 = 0.2;

/// Maps the listing containers of a rendered results page to structured
/// records, isolating failures per container.
pub struct ListingExtractor<'a> {
    driver: &'a DriverSession,
    pacer: &'a Pacer,
    site: &'a SiteProfile,
}

impl<'a> ListingExtractor<'a> {
    pub fn new(driver: &'a DriverSession, pacer: &'a Pacer, site: &'a SiteProfile) -> Self {
        Self { driver, pacer, site }
    }

    /// Extract up to `max_items` listings from the current results page.
    ///
    /// Once the initial container wait succeeds this always returns a
    /// report: a container whose title cannot be read is counted as
    /// skipped, any other unreadable field degrades to absent, and a
    /// results page that never renders yields an empty report.
    pub async fn extract(&self, max_items: usize) -> Result<RunReport> {
        let mut report = RunReport::new();

        if let Err(e) = self
            .driver
            .wait_for_element(&self.site.listing_container, CONTAINER_WAIT)
            .await
        {
            tracing::warn!("No listing containers rendered: {}", e);
            return Ok(report);
        }

        let cards = match self.driver.find_elements(&self.site.listing_container).await {
            Ok(cards) => cards,
            Err(e) => {
                tracing::warn!("Could not enumerate listing cards: {}", e);
                return Ok(report);
            }
        };
        tracing::info!("Found {} listing cards on the page", cards.len());

        for (index, card) in cards.iter().take(max_items).enumerate() {
            match self.read_listing(card).await {
                Some(listing) => {
                    tracing::info!(
                        "[{}] {} at {}",
                        index + 1,
                        listing.title,
                        listing.company.as_deref().unwrap_or("(unknown company)")
                    );
                    report.push(listing);

                    self.pacer.delay(Delay::Short).await;
                    if self.pacer.roll(SCROLL_CHANCE) {
                        if let Err(e) = self.pacer.scroll(self.driver).await {
                            tracing::debug!("Viewport scroll failed (continuing): {}", e);
                        }
                    }
                }
                None => {
                    report.skipped += 1;
                    tracing::warn!("Skipping listing card {}: no readable title", index + 1);
                }
            }
        }

        tracing::info!("Extracted {} listings ({} skipped)", report.len(), report.skipped);
        Ok(report)
    }

    /// Read one container. `None` when the title is missing or empty; all
    /// other fields degrade individually.
    async fn read_listing(&self, card: &Element) -> Option<Listing> {
        let title = self.read_field(card, &self.site.title).await?;
        let mut listing = Listing::new(title, &self.site.id).ok()?;

        listing.company = self.read_field(card, &self.site.company).await;
        listing.location = self.read_field(card, &self.site.location).await;
        if let Some(locator) = &self.site.salary {
            if let Some(salary) = self.read_field(card, locator).await {
                listing.salary = salary;
            }
        }

        Some(listing)
    }

    async fn read_field(&self, card: &Element, locator: &FieldLocator) -> Option<String> {
        let element = card.find_element(&locator.selector).await.ok()?;
        let value = match &locator.read {
            FieldRead::Text => element.inner_text().await.ok()?,
            FieldRead::Attribute(name) => element.attribute(name).await.ok()?,
        };
        normalized(value?)
    }
}

/// Trim a raw field read, mapping whitespace-only values to absent.
fn normalized(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_blank_reads() {
        assert_eq!(normalized("".to_string()), None);
        assert_eq!(normalized("   \n".to_string()), None);
    }

    #[test]
    fn test_normalized_trims() {
        assert_eq!(
            normalized("  Software Engineer \n".to_string()),
            Some("Software Engineer".to_string())
        );
    }

    // Extraction against a live results page requires a running Chrome
    // instance; the per-field degradation rules are covered through
    // jobhawk_core::listing and the normalization above.
}
