use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{Browser, Page, Session, WaitUntil};
use crate::error::ScrapeError;

const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.5735.134 Safari/537.36";

/// Plain HTTP browser. Each session is a fresh `reqwest` client, so cookies
/// never leak between runs.
pub struct HttpBrowser {
    user_agents: Vec<String>,
    timeout: Duration,
}

impl HttpBrowser {
    pub fn new(user_agents: Vec<String>, timeout: Duration) -> Self {
        Self {
            user_agents,
            timeout,
        }
    }

    fn pick_user_agent(&self) -> String {
        let mut rng = rand::thread_rng();
        match self.user_agents.choose(&mut rng) {
            Some(agent) => agent.clone(),
            None => {
                warn!("User agent pool is empty, using fallback");
                FALLBACK_USER_AGENT.to_string()
            }
        }
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_session(&self) -> Result<Box<dyn Session>, ScrapeError> {
        let user_agent = self.pick_user_agent();

        let client = ClientBuilder::new()
            .user_agent(user_agent.clone())
            .cookie_store(true)
            .timeout(self.timeout)
            .pool_max_idle_per_host(6)
            .build()
            .map_err(ScrapeError::Client)?;

        debug!("Opened browsing session as {}", user_agent);
        Ok(Box::new(HttpSession { client, user_agent }))
    }
}

struct HttpSession {
    client: Client,
    user_agent: String,
}

#[async_trait]
impl Session for HttpSession {
    // Both load states resolve once the whole document has been read; there
    // are no subresources to wait for over plain HTTP.
    async fn goto(&self, url: &Url, wait: WaitUntil) -> Result<Page, ScrapeError> {
        debug!("Navigating to {} (waiting for {:?})", url, wait);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ScrapeError::Navigation {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP error {}: {}", status, url);
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        // Redirects are followed, so relative links resolve against the final URL
        let final_url = response.url().clone();
        let body = response.text().await.map_err(|source| ScrapeError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(Page::new(final_url, body))
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
