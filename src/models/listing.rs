use super::{NO_DESCRIPTION, NO_REQUIREMENTS};
use serde::{Deserialize, Serialize};
use url::Url;

/// Identity of a listing. Two listings are the same only when both the title
/// and the link match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingKey {
    pub title: String,
    pub link: String,
}

// NewType pattern for the persisted form of a key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// A search hit before its listing page has been visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub title: String,
    pub link: Url,
}

impl ListingSummary {
    pub fn new(title: impl Into<String>, link: Url) -> Self {
        Self {
            title: title.into(),
            link,
        }
    }

    pub fn key(&self) -> ListingKey {
        ListingKey {
            title: self.title.clone(),
            link: self.link.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetails {
    pub description: String,
    pub requirements: String,
}

impl Default for ListingDetails {
    fn default() -> Self {
        Self {
            description: NO_DESCRIPTION.to_string(),
            requirements: NO_REQUIREMENTS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub link: Url,
    pub description: String,
    pub requirements: String,
}

impl Listing {
    pub fn new(summary: ListingSummary, details: ListingDetails) -> Self {
        Self {
            title: summary.title,
            link: summary.link,
            description: details.description,
            requirements: details.requirements,
        }
    }

    pub fn key(&self) -> ListingKey {
        ListingKey {
            title: self.title.clone(),
            link: self.link.to_string(),
        }
    }

    /// Stable digest of the identity key, used by the seen store.
    pub fn listing_id(&self) -> ListingId {
        use md5::Context;

        let key = self.key();
        let mut hasher = Context::new();
        hasher.consume(key.title.as_bytes());
        // Unit separator keeps "a" + "bc" distinct from "ab" + "c"
        hasher.consume(b"\x1f");
        hasher.consume(key.link.as_bytes());

        ListingId(format!("{:x}", hasher.compute()))
    }
}

/// Anything that carries a listing identity can be deduplicated.
pub trait Keyed {
    fn identity(&self) -> ListingKey;
}

impl Keyed for Listing {
    fn identity(&self) -> ListingKey {
        self.key()
    }
}

impl Keyed for ListingSummary {
    fn identity(&self) -> ListingKey {
        self.key()
    }
}
