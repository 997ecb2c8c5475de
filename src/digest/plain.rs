use crate::models::Listing;

/// Plain-text alternative of [`super::render_html`].
pub fn render_plain(heading: &str, listings: &[Listing]) -> String {
    let mut body = format!("{}\n", heading);

    if listings.is_empty() {
        body.push_str("\nNo new openings found in this run.\n");
        return body;
    }

    for (index, listing) in listings.iter().enumerate() {
        body.push_str(&format!("\n{}. {}\n", index + 1, listing.title));
        if !listing.description.is_empty() {
            body.push_str(&format!("   Description: {}\n", listing.description));
        }
        if !listing.requirements.is_empty() {
            body.push_str(&format!("   Requirements: {}\n", listing.requirements));
        }
        body.push_str(&format!("   Apply: {}\n", listing.link));
    }

    body
}
