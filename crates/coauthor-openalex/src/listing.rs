//! Paged OpenAlex list endpoints: query parameters, `results` extraction,
//! and the bounded scan over the author listing.

use indicatif::ProgressBar;
use serde::de::DeserializeOwned;
use serde_json::Value;

use coauthor_core::{Fetcher, Transport};

use crate::config::Config;
use crate::schema::AuthorRow;

/// `filter`, `per-page`, `page` query parameters.
pub fn listing_query(filter: &str, per_page: u32, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("filter", filter.to_string()),
        ("per-page", per_page.to_string()),
        ("page", page.to_string()),
    ]
}

/// Pull the `results` array out of a list response.
///
/// A response without a `results` array counts as an empty page. Single
/// results that fail to deserialize are dropped.
pub fn parse_results<T: DeserializeOwned>(value: Value, what: &str) -> Vec<T> {
    let results = match value {
        Value::Object(mut map) => map.remove("results"),
        _ => None,
    };
    let Some(Value::Array(items)) = results else {
        log::warn!("{what}: response has no results array");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(row) => Some(row),
            Err(e) => {
                log::debug!("{what}: skipping malformed result: {e}");
                None
            }
        })
        .collect()
}

/// Outcome of a bounded listing scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListingStats {
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub results: usize,
}

/// Fetch author listing pages `1..=max_pages` and hand each page to `on_page`.
///
/// A page whose fetch fails is logged and skipped; the scan always runs to
/// the page bound.
pub fn scan_author_listing<T: Transport>(
    fetcher: &Fetcher<T>,
    config: &Config,
    stage: &str,
    pb: &ProgressBar,
    mut on_page: impl FnMut(Vec<AuthorRow>),
) -> ListingStats {
    let url = config.authors_url();
    let filter = config.authors_filter();
    let mut stats = ListingStats::default();

    for page in 1..=config.max_pages {
        pb.set_message(format!("page {page}/{}", config.max_pages));
        log::debug!("{stage}: fetching page {page}/{}", config.max_pages);

        let query = listing_query(&filter, config.per_page, page);
        let Some(value) = fetcher.fetch_json(&url, &query) else {
            log::warn!("{stage}: failed to retrieve page {page}, skipping");
            stats.pages_failed += 1;
            continue;
        };

        let rows: Vec<AuthorRow> = parse_results(value, stage);
        stats.pages_fetched += 1;
        stats.results += rows.len();
        on_page(rows);
    }
    stats
}
