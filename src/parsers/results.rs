use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::element_text;
use crate::browser::Page;
use crate::models::ListingSummary;

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3").expect("Invalid heading selector"));

#[derive(Deserialize)]
struct RedirectQuery {
    q: Option<String>,
    url: Option<String>,
}

/// Every level-3 heading on a results page that sits inside a link, as a
/// `(title, link)` pair in document order.
pub fn extract_listings(page: &Page) -> Vec<ListingSummary> {
    let document = page.document();

    document
        .select(&HEADING_SELECTOR)
        .filter_map(|heading| {
            let title = element_text(&heading);
            let href = enclosing_link(heading)?.value().attr("href")?;
            let link = resolve_link(page.url(), href)?;

            if title.is_empty() {
                debug!("Skipping untitled result linking to {}", link);
                return None;
            }

            Some(ListingSummary::new(title, link))
        })
        .collect()
}

/// Nearest `<a href>` at or above `element`.
fn enclosing_link(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|el| el.value().name() == "a" && el.value().attr("href").is_some())
}

/// Resolves `href` against the page and unwraps search engine redirects
/// (`/url?q=<target>`). Only http(s) targets are kept.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let link = base.join(href).ok()?;
    let link = unwrap_redirect(&link).unwrap_or(link);

    matches!(link.scheme(), "http" | "https").then_some(link)
}

fn unwrap_redirect(link: &Url) -> Option<Url> {
    if link.path() != "/url" {
        return None;
    }

    let query: RedirectQuery = serde_urlencoded::from_str(link.query()?).ok()?;
    let target = query.q.or(query.url)?;
    Url::parse(&target).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(body: &str) -> Page {
        Page::new(
            Url::parse("https://www.google.com/search?q=phd").unwrap(),
            body,
        )
    }

    #[test]
    fn extracts_headings_inside_links() {
        let page = page(
            r#"<html><body>
                <div><a href="https://www.linkedin.com/jobs/view/1"><h3>PhD in Animal Science</h3></a></div>
                <div><a href="https://www.indeed.com/viewjob?jk=2"><div><h3>Research Fellow,
                    Agricultural Science</h3></div></a></div>
            </body></html>"#,
        );

        let listings = extract_listings(&page);

        assert_eq!(
            listings,
            vec![
                ListingSummary::new(
                    "PhD in Animal Science",
                    Url::parse("https://www.linkedin.com/jobs/view/1").unwrap()
                ),
                ListingSummary::new(
                    "Research Fellow, Agricultural Science",
                    Url::parse("https://www.indeed.com/viewjob?jk=2").unwrap()
                ),
            ]
        );
    }

    #[test]
    fn drops_headings_without_enclosing_link() {
        let page = page(
            r#"<h3>People also ask</h3>
               <a name="anchor"><h3>No href</h3></a>
               <a href="https://x.com/post/1"><h3>Kept</h3></a>"#,
        );

        let listings = extract_listings(&page);

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Kept");
    }

    #[test]
    fn resolves_relative_and_redirect_links() {
        let page = page(
            r#"<a href="/url?q=https://www.researchgate.net/job/42&sa=U&ved=abc"><h3>Redirected</h3></a>
               <a href="/travel/flights"><h3>Relative</h3></a>"#,
        );

        let listings = extract_listings(&page);

        assert_eq!(
            listings[0].link.as_str(),
            "https://www.researchgate.net/job/42"
        );
        assert_eq!(
            listings[1].link.as_str(),
            "https://www.google.com/travel/flights"
        );
    }

    #[test]
    fn ignores_non_http_links_and_empty_titles() {
        let page = page(
            r#"<a href="javascript:void(0)"><h3>Script</h3></a>
               <a href="mailto:someone@example.com"><h3>Mail</h3></a>
               <a href="https://x.com/1"><h3>   </h3></a>"#,
        );

        assert!(extract_listings(&page).is_empty());
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(extract_listings(&page("<html></html>")).is_empty());
    }
}
