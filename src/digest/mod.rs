//! Rendering of a run's listings into the email body.

mod plain;
mod template;

pub use plain::render_plain;
pub use template::render_html;

use crate::models::Listing;

/// The formatted output of one run. Exists only until the email is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub html: String,
    pub text: String,
    pub count: usize,
}

impl Digest {
    pub fn build(subject: &str, heading: &str, listings: &[Listing]) -> Self {
        Self {
            subject: subject.to_string(),
            html: render_html(heading, listings),
            text: render_plain(heading, listings),
            count: listings.len(),
        }
    }
}
