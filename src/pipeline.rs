//! One run: search, scrape each hit, dedupe, render, send.

use chrono::Local;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::browser::{fetch_listing_page, fetch_results_page, Browser, Session};
use crate::config::Config;
use crate::dedupe::dedupe;
use crate::digest::Digest;
use crate::error::ScrapeError;
use crate::models::{Listing, ListingSummary};
use crate::notify::Notifier;
use crate::parsers::{extract_details, extract_listings};
use crate::storage::SeenStore;

/// A listing whose page could not be scraped.
#[derive(Debug)]
pub struct ListingFailure {
    pub summary: ListingSummary,
    pub error: ScrapeError,
}

/// What the scraping half of a run produced.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Hits on the results page, before dedupe.
    pub found: usize,
    pub listings: Vec<Listing>,
    pub failures: Vec<ListingFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent(String),
    Failed(String),
    /// Nothing new and empty digests are disabled.
    Skipped,
}

#[derive(Debug)]
pub struct RunReport {
    pub scrape: ScrapeReport,
    /// Listings that went into the digest, after cross-run filtering.
    pub delivered_listings: usize,
    pub delivery: Delivery,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunReport),
    /// The results page could not be loaded; nothing was sent.
    Failed(ScrapeError),
    /// Another run was still in progress.
    Overlapped,
}

pub struct Pipeline {
    config: Arc<Config>,
    browser: Arc<dyn Browser>,
    notifier: Arc<dyn Notifier>,
    seen: Option<Arc<dyn SeenStore>>,
    run_guard: Mutex<()>,
}

impl Pipeline {
    pub fn new(
        config: Arc<Config>,
        browser: Arc<dyn Browser>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            browser,
            notifier,
            seen: None,
            run_guard: Mutex::new(()),
        }
    }

    /// Suppress listings already delivered by earlier runs.
    pub fn with_seen_store(mut self, store: Arc<dyn SeenStore>) -> Self {
        self.seen = Some(store);
        self
    }

    /// Runs the whole pipeline unless a previous run is still going. Never
    /// returns an error: every failure is logged and reported in the outcome.
    pub async fn run(&self) -> RunOutcome {
        let Ok(_running) = self.run_guard.try_lock() else {
            warn!("Previous run still in progress, skipping this trigger");
            return RunOutcome::Overlapped;
        };

        info!(
            "--- Starting job search run at {} ---",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let scrape = match self.scrape().await {
            Ok(scrape) => scrape,
            Err(e) => {
                error!("Job search failed, skipping this run: {}", e);
                return RunOutcome::Failed(e);
            }
        };

        let listings = self.filter_seen(&scrape.listings).await;
        let delivered_listings = listings.len();
        let delivery = self.deliver(&listings).await;

        info!(
            "Run completed: {} found, {} scraped, {} failed, {} delivered",
            scrape.found,
            scrape.listings.len(),
            scrape.failures.len(),
            delivered_listings
        );

        RunOutcome::Completed(RunReport {
            scrape,
            delivered_listings,
            delivery,
        })
    }

    /// Loads the results page and every hit on it, repeats included, then
    /// dedupes the scraped listings. Only a failure to load the results page
    /// is an error; listing failures are collected.
    pub async fn scrape(&self) -> Result<ScrapeReport, ScrapeError> {
        let session = self.browser.new_session().await?;

        info!("Searching for jobs...");
        let results = fetch_results_page(
            session.as_ref(),
            &self.config.search_url,
            &self.config.search_query(),
        )
        .await?;

        let summaries = extract_listings(&results);
        drop(results);

        let found = summaries.len();
        if found == 0 {
            warn!("No listings found on the results page");
        } else {
            info!("Found {} listings", found);
        }

        let mut report = ScrapeReport {
            found,
            ..ScrapeReport::default()
        };

        for (index, summary) in summaries.into_iter().enumerate() {
            if index > 0 {
                self.pause().await;
            }

            info!("Scraping listing: {}", summary.title);
            match scrape_listing(session.as_ref(), &summary).await {
                Ok(listing) => report.listings.push(listing),
                Err(error) => {
                    warn!("Error scraping {}: {}", summary.title, error);
                    report.failures.push(ListingFailure { summary, error });
                }
            }
        }

        // A repeat can succeed where an earlier copy of the same hit failed
        report.listings = dedupe(report.listings);

        Ok(report)
    }

    async fn filter_seen(&self, listings: &[Listing]) -> Vec<Listing> {
        let Some(store) = &self.seen else {
            return listings.to_vec();
        };

        let mut fresh = Vec::with_capacity(listings.len());
        for listing in listings {
            match store.has_seen(&listing.listing_id()).await {
                Ok(true) => {}
                Ok(false) => fresh.push(listing.clone()),
                Err(e) => {
                    // Better a repeat than a silently dropped listing
                    warn!("Seen store lookup failed for {}: {}", listing.title, e);
                    fresh.push(listing.clone());
                }
            }
        }

        let skipped = listings.len() - fresh.len();
        if skipped > 0 {
            info!("Skipping {} listings delivered in earlier runs", skipped);
        }
        fresh
    }

    async fn deliver(&self, listings: &[Listing]) -> Delivery {
        if listings.is_empty() && !self.config.send_empty_digest {
            info!("No new listings, not sending an email");
            return Delivery::Skipped;
        }

        let digest = Digest::build(
            &self.config.email.subject,
            &self.config.email.heading,
            listings,
        );

        match self.notifier.send(&digest).await {
            Ok(response) => {
                info!("Email sent with {} listings", digest.count);
                self.mark_delivered(listings).await;
                Delivery::Sent(response)
            }
            Err(e) => {
                error!("Error sending email: {}", e);
                Delivery::Failed(e.to_string())
            }
        }
    }

    async fn mark_delivered(&self, listings: &[Listing]) {
        let Some(store) = &self.seen else {
            return;
        };

        let ids = listings.iter().map(Listing::listing_id).collect::<Vec<_>>();
        if let Err(e) = store.mark_seen(&ids).await {
            error!("Failed to record delivered listings: {}", e);
        }
    }

    async fn pause(&self) {
        let [a, b] = self.config.detail_delay_ms;
        let (min, max) = (a.min(b), a.max(b));
        if max == 0 {
            return;
        }

        let millis = rand::thread_rng().gen_range(min..=max);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

/// Visits one listing page. The page is dropped, and so closed, on every path.
pub async fn scrape_listing(
    session: &dyn Session,
    summary: &ListingSummary,
) -> Result<Listing, ScrapeError> {
    let page = fetch_listing_page(session, &summary.link).await?;
    let details = extract_details(&page);
    Ok(Listing::new(summary.clone(), details))
}
