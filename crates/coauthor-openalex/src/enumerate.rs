//! Candidate author enumeration

use coauthor_core::{Fetcher, ProgressContext, Transport};

use crate::config::Config;
use crate::listing::{ListingStats, scan_author_listing};

/// Collect author ids from the filtered listing, in API order.
///
/// Duplicates are kept; results without an id are dropped.
pub fn enumerate_authors<T: Transport>(
    fetcher: &Fetcher<T>,
    config: &Config,
    progress: &ProgressContext,
) -> (Vec<String>, ListingStats) {
    let pb = progress.stage_line("authors");
    let mut ids = Vec::new();

    let stats = scan_author_listing(fetcher, config, "authors", &pb, |rows| {
        ids.extend(rows.into_iter().filter_map(|row| row.id));
    });

    pb.finish_and_clear();
    log::info!(
        "Enumerated {} authors from {}/{} pages",
        ids.len(),
        stats.pages_fetched,
        config.max_pages
    );
    (ids, stats)
}
