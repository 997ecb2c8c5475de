use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::{Listing, EMOJI_DESCRIPTION, EMOJI_LINK, EMOJI_REQUIREMENTS};

const ITEM_STYLE: &str = "margin-bottom: 20px; border-bottom: 1px solid #eee; padding-bottom: 10px;";
const LINK_STYLE: &str = "color: #1a73e8; text-decoration: none;";

/// Numbered HTML list of `listings` under `heading`. Pure: equal input gives
/// byte-identical output.
pub fn render_html(heading: &str, listings: &[Listing]) -> String {
    let mut body = format!("<h1>{}</h1><ul>", encode_text(heading));

    for (index, listing) in listings.iter().enumerate() {
        let href = encode_double_quoted_attribute(listing.link.as_str());

        body.push_str(&format!(
            r#"
      <li style="{ITEM_STYLE}">
        <h3><a href="{href}">{} {}</a></h3>"#,
            index + 1,
            encode_text(&listing.title),
        ));

        if !listing.description.is_empty() {
            body.push_str(&format!(
                r#"
        <p><strong>{EMOJI_DESCRIPTION} Description:</strong> {}</p>"#,
                encode_text(&listing.description)
            ));
        }

        if !listing.requirements.is_empty() {
            body.push_str(&format!(
                r#"
        <p><strong>{EMOJI_REQUIREMENTS} Requirements:</strong> {}</p>"#,
                encode_text(&listing.requirements)
            ));
        }

        body.push_str(&format!(
            r#"
        <p><a href="{href}" style="{LINK_STYLE}">{EMOJI_LINK} Apply Here</a></p>
      </li>"#
        ));
    }

    body.push_str("</ul>");
    body
}
