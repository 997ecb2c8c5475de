pub mod listing;

pub use listing::*;

// Placeholder text used when a listing page has no matching element
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_REQUIREMENTS: &str = "No requirements listed";

// Emoji constants used in the digest template
pub const EMOJI_DESCRIPTION: &str = "📄";
pub const EMOJI_REQUIREMENTS: &str = "📋";
pub const EMOJI_LINK: &str = "🔗";
