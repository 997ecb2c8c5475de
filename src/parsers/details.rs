use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::element_text;
use crate::browser::Page;
use crate::models::{ListingDetails, NO_DESCRIPTION, NO_REQUIREMENTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Description,
    Requirements,
}

impl DetailField {
    pub fn placeholder(&self) -> &'static str {
        match self {
            DetailField::Description => NO_DESCRIPTION,
            DetailField::Requirements => NO_REQUIREMENTS,
        }
    }
}

/// One selector to try for one field.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub selector: &'static str,
    pub field: DetailField,
    compiled: Selector,
}

impl ExtractionRule {
    fn new(selector: &'static str, field: DetailField) -> Self {
        Self {
            selector,
            field,
            compiled: Selector::parse(selector).expect("Invalid extraction selector"),
        }
    }

    /// Text of the first element matching this rule, if it has any.
    pub fn apply(&self, document: &Html) -> Option<String> {
        document
            .select(&self.compiled)
            .map(|element| element_text(&element))
            .find(|text| !text.is_empty())
    }
}

/// Rules in priority order. Within a field, the first rule that yields text
/// wins; the generic `p` rule is the last resort for descriptions.
pub static EXTRACTION_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(".jobDescriptionContent", DetailField::Description),
        ExtractionRule::new(".job-desc", DetailField::Description),
        ExtractionRule::new(".description", DetailField::Description),
        ExtractionRule::new("p", DetailField::Description),
        ExtractionRule::new(".qualifications", DetailField::Requirements),
        ExtractionRule::new(".requirements", DetailField::Requirements),
        ExtractionRule::new(".req-list", DetailField::Requirements),
    ]
});

pub fn extract_field(document: &Html, field: DetailField) -> String {
    EXTRACTION_RULES
        .iter()
        .filter(|rule| rule.field == field)
        .find_map(|rule| rule.apply(document))
        .unwrap_or_else(|| field.placeholder().to_string())
}

/// Description and requirements of a listing page, with placeholders for
/// anything not found.
pub fn extract_details(page: &Page) -> ListingDetails {
    let document = page.document();

    ListingDetails {
        description: extract_field(&document, DetailField::Description),
        requirements: extract_field(&document, DetailField::Requirements),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use url::Url;

    fn page(body: &str) -> Page {
        Page::new(Url::parse("https://jobs.example.org/posting/7").unwrap(), body)
    }

    #[test]
    fn falls_back_to_placeholders() {
        let details = extract_details(&page("<html><body><div>Nothing here</div></body></html>"));

        assert_eq!(
            details,
            ListingDetails {
                description: "No description available".to_string(),
                requirements: "No requirements listed".to_string(),
            }
        );
    }

    #[test]
    fn prefers_specific_description_over_paragraph() {
        let details = extract_details(&page(
            r#"<p>Cookie banner</p>
               <div class="jobDescriptionContent">Three-year PhD on dairy cattle health.</div>"#,
        ));

        assert_eq!(details.description, "Three-year PhD on dairy cattle health.");
    }

    #[test]
    fn paragraph_is_last_resort() {
        let details = extract_details(&page("<p></p><p>Join our lab in Wageningen.</p>"));
        assert_eq!(details.description, "Join our lab in Wageningen.");
    }

    #[test]
    fn empty_match_falls_through_to_next_rule() {
        let details = extract_details(&page(
            r#"<div class="qualifications">  </div>
               <ul class="req-list"><li>MSc in Animal Science</li><li>R or SQL</li></ul>"#,
        ));

        assert_eq!(details.requirements, "MSc in Animal Science R or SQL");
        assert_eq!(details.description, "No description available");
    }

    #[test]
    fn every_field_has_rules() {
        for field in [DetailField::Description, DetailField::Requirements] {
            assert!(EXTRACTION_RULES.iter().any(|rule| rule.field == field));
        }
    }
}
