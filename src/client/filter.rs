use crate::models::{FilterState, Review};

/// Reviews whose text contains the search term (case-insensitive) and whose
/// sentiment passes the filter, in their original order.
pub fn filter_reviews<'a>(reviews: &'a [Review], filter: &FilterState) -> Vec<&'a Review> {
    let needle = filter.search_term.to_lowercase();
    reviews
        .iter()
        .filter(|r| filter.sentiment_filter.matches(r.sentiment))
        .filter(|r| needle.is_empty() || r.review.to_lowercase().contains(&needle))
        .collect()
}
