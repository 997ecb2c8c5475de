use anyhow::{bail, Context, Result};
use url::Url;

use job_digest::browser::{Browser, HttpBrowser, Session, WaitUntil};
use job_digest::config::Config;
use job_digest::parsers::{extract_listings, EXTRACTION_RULES};

/// Fetches one page and reports what the extractors see on it.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    job_digest::init_tracing()?;

    let Some(target) = std::env::args().nth(1) else {
        bail!("usage: probe-selectors <url>");
    };
    let url = Url::parse(&target).with_context(|| format!("Invalid URL {}", target))?;

    let config = Config::load()?;
    let browser = HttpBrowser::new(config.user_agents.clone(), config.request_timeout());
    let session = browser.new_session().await?;

    println!("Fetching {} as {}", url, session.user_agent());
    let page = session.goto(&url, WaitUntil::NetworkIdle).await?;
    let document = page.document();

    println!("\nExtraction rules:");
    for rule in EXTRACTION_RULES.iter() {
        match rule.apply(&document) {
            Some(text) => {
                let preview: String = text.chars().take(80).collect();
                println!("  {:?} {:<24} matched: {}", rule.field, rule.selector, preview);
            }
            None => println!("  {:?} {:<24} no match", rule.field, rule.selector),
        }
    }

    let listings = extract_listings(&page);
    println!("\nFound {} result headings", listings.len());
    println!("{}", serde_json::to_string_pretty(&listings)?);

    Ok(())
}
