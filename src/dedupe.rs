use std::collections::HashSet;

use crate::models::Keyed;

/// Drops repeated listings, keeping the first occurrence of each
/// `(title, link)` key and the original order of the survivors.
pub fn dedupe<T: Keyed>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.identity()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Listing, ListingDetails, ListingSummary};
    use pretty_assertions::assert_eq;
    use url::Url;

    fn summary(title: &str, link: &str) -> ListingSummary {
        ListingSummary::new(title, Url::parse(link).unwrap())
    }

    fn titles(items: &[ListingSummary]) -> Vec<(&str, &str)> {
        items
            .iter()
            .map(|item| (item.title.as_str(), item.link.as_str()))
            .collect()
    }

    #[test]
    fn removes_exact_repeats_in_order() {
        let input = vec![
            summary("A", "http://x/1"),
            summary("A", "http://x/1"),
            summary("B", "http://x/2"),
        ];

        let output = dedupe(input);

        assert_eq!(titles(&output), vec![("A", "http://x/1"), ("B", "http://x/2")]);
    }

    #[test]
    fn same_title_or_same_link_alone_is_distinct() {
        let input = vec![
            summary("A", "http://x/1"),
            summary("A", "http://x/2"),
            summary("B", "http://x/1"),
        ];

        assert_eq!(dedupe(input.clone()), input);
    }

    #[test]
    fn first_occurrence_wins() {
        let first = Listing::new(
            summary("A", "http://x/1"),
            ListingDetails {
                description: "first".to_string(),
                requirements: String::new(),
            },
        );
        let second = Listing::new(summary("A", "http://x/1"), ListingDetails::default());

        let output = dedupe(vec![first.clone(), second]);

        assert_eq!(output, vec![first]);
    }

    #[test]
    fn is_idempotent() {
        let input = vec![
            summary("C", "http://x/3"),
            summary("A", "http://x/1"),
            summary("C", "http://x/3"),
            summary("A", "http://x/1"),
            summary("B", "http://x/2"),
        ];

        let once = dedupe(input);
        let twice = dedupe(once.clone());

        assert_eq!(once, twice);
        assert_eq!(
            titles(&once),
            vec![("C", "http://x/3"), ("A", "http://x/1"), ("B", "http://x/2")]
        );
    }

    #[test]
    fn empty_input() {
        assert!(dedupe(Vec::<ListingSummary>::new()).is_empty());
    }
}
