//! Page fetching.
//!
//! A [`Browser`] hands out one [`Session`] per run. A session is an isolated
//! browsing context (its own cookie jar and user agent) that loads pages.
//! Each loaded [`Page`] is a scoped resource: dropping it closes it.

mod http;
mod search;

pub use http::HttpBrowser;
pub use search::build_search_url;

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::error::ScrapeError;

/// Load state a navigation waits for before handing back the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// No outstanding requests. Used for the results page.
    NetworkIdle,
    /// The document has been parsed. Used for listing pages.
    DomContentLoaded,
}

#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_session(&self) -> Result<Box<dyn Session>, ScrapeError>;
}

#[async_trait]
pub trait Session: Send + Sync {
    async fn goto(&self, url: &Url, wait: WaitUntil) -> Result<Page, ScrapeError>;

    fn user_agent(&self) -> &str;
}

/// A loaded document. Parsed on demand since `scraper::Html` is not `Send`.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    body: String,
}

impl Page {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Opens the search results page for `query`.
pub async fn fetch_results_page(
    session: &dyn Session,
    search_url: &str,
    query: &str,
) -> Result<Page, ScrapeError> {
    let url = build_search_url(search_url, query)?;
    session.goto(&url, WaitUntil::NetworkIdle).await
}

pub async fn fetch_listing_page(session: &dyn Session, url: &Url) -> Result<Page, ScrapeError> {
    session.goto(url, WaitUntil::DomContentLoaded).await
}
