use log::{error, info, warn};
use std::time::Duration;
use steam::{
    extract_listings, resolve_listing_id, Listing, Marketplace, Page, PriceBand, PurchaseTerms,
    QueryEncoder, SearchCriteria,
};
use tokio::time::sleep;

pub(crate) struct Settings {
    pub encoder: QueryEncoder,
    pub criteria: SearchCriteria,
    pub band: PriceBand,
    pub terms: PurchaseTerms,
    pub page: Page,
    pub interval: Duration,
}

/// Polls the market and buys whatever lands inside the price band. One cycle
/// runs to completion before the next starts; nothing overlaps.
pub(crate) struct Monitor<M> {
    market: M,
    settings: Settings,
}

impl<M: Marketplace> Monitor<M> {
    pub fn new(market: M, settings: Settings) -> Self {
        Self { market, settings }
    }

    /// Runs until the surrounding task is cancelled. A failed cycle is logged
    /// and the loop sleeps and retries; it never terminates on its own.
    pub async fn run(&self) {
        loop {
            if let Err(e) = self.cycle().await {
                error!("Polling cycle failed: {e}");
            }
            sleep(self.settings.interval).await;
        }
    }

    async fn cycle(&self) -> steam::Result<()> {
        let query = self
            .settings
            .encoder
            .encode(&self.settings.criteria, &self.settings.page);

        let html = self.market.fetch_page(&query.url).await?;
        let listings = extract_listings(&html);
        info!("Extracted {} listing(s)", listings.len());

        let candidates: Vec<Listing> = listings
            .into_iter()
            .filter(|listing| self.settings.band.accepts(listing))
            .collect();
        info!("{} candidate(s) within the price band", candidates.len());

        for mut listing in candidates {
            if listing.id.is_none() {
                listing.id = self.resolve_id(&listing).await;
            }

            if listing.id.is_none() {
                warn!("Skipping {}: listing id unresolved", listing.name);
                continue;
            }

            self.attempt(&listing).await;
        }

        Ok(())
    }

    async fn resolve_id(&self, listing: &Listing) -> Option<String> {
        match self.market.fetch_page(&listing.url).await {
            Ok(html) => resolve_listing_id(&html),
            Err(e) => {
                warn!("Failed to fetch detail page for {}: {e}", listing.name);
                None
            }
        }
    }

    // A failed or rejected purchase only costs this one candidate.
    async fn attempt(&self, listing: &Listing) {
        match self.market.buy_listing(listing, &self.settings.terms).await {
            Ok(outcome) if outcome.success => {
                info!("Bought {} for {:.2}", listing.name, listing.price);
            }
            Ok(outcome) => {
                warn!(
                    "Purchase of {} rejected: {}",
                    listing.name,
                    outcome.reason.unwrap_or_else(|| "no reason given".to_string())
                );
            }
            Err(e) => {
                error!("Purchase attempt for {} failed: {e}", listing.name);
            }
        }
    }
}
