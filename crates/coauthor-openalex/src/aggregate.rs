//! Per-author, per-year co-authorship tallies
//!
//! Each year keeps a single ordered mapping co-author id -> (name, count),
//! so ids and names can never drift apart at export time.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use coauthor_core::{Fetcher, ProgressContext, Transport, fmt_num};

use crate::config::{Config, YearRange};
use crate::listing::{listing_query, parse_results};
use crate::schema::WorkRow;

/// Log progress every N authors when no progress bar is visible
const LOG_INTERVAL: usize = 100;

/// One co-author's activity with the main author in one year
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoAuthorTally {
    /// First non-empty display name seen for this id
    pub display_name: String,
    /// Shared works counted
    pub count: u32,
}

/// Co-authors of one main author in one year, ordered by co-author id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearTally {
    coauthors: BTreeMap<String, CoAuthorTally>,
}

impl YearTally {
    /// Count one shared work with `id`.
    pub fn record(&mut self, id: &str, display_name: Option<&str>) {
        let tally = self.coauthors.entry(id.to_string()).or_default();
        tally.count += 1;
        if tally.display_name.is_empty() {
            if let Some(name) = display_name {
                tally.display_name = name.to_string();
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&CoAuthorTally> {
        self.coauthors.get(id)
    }

    /// Shared-work count for `id` (0 if never seen).
    pub fn count(&self, id: &str) -> u32 {
        self.get(id).map_or(0, |t| t.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CoAuthorTally)> {
        self.coauthors.iter().map(|(id, t)| (id.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.coauthors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coauthors.is_empty()
    }
}

/// All in-range co-authorships of one main author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorAggregate {
    author_id: String,
    years: BTreeMap<i32, YearTally>,
}

impl AuthorAggregate {
    pub fn new(author_id: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            years: BTreeMap::new(),
        }
    }

    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    /// Fold one work into the tallies.
    ///
    /// Works outside `years` or without a year are ignored. The main author
    /// is never recorded as their own co-author. Returns whether the work's
    /// year was in range.
    pub fn add_work(&mut self, work: &WorkRow, years: YearRange) -> bool {
        let Some(year) = work.publication_year.filter(|y| years.contains(*y)) else {
            return false;
        };
        for (id, name) in work.authors() {
            if id == self.author_id {
                continue;
            }
            self.years.entry(year).or_default().record(id, name);
        }
        true
    }

    /// Tally for `year`, if any co-author was seen that year.
    pub fn year(&self, year: i32) -> Option<&YearTally> {
        self.years.get(&year)
    }

    /// Non-empty years, ascending.
    pub fn years(&self) -> impl Iterator<Item = (i32, &YearTally)> {
        self.years.iter().map(|(y, t)| (*y, t))
    }

    /// Number of (year, co-author) pairs.
    pub fn pair_count(&self) -> usize {
        self.years.values().map(YearTally::len).sum()
    }
}

/// Aggregates for all processed authors, in first-aggregated order.
#[derive(Debug, Default)]
pub struct CoauthorStore {
    authors: Vec<AuthorAggregate>,
    index: FxHashMap<String, usize>,
}

impl CoauthorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, author_id: &str) -> bool {
        self.index.contains_key(author_id)
    }

    /// Insert, or replace an existing aggregate in place (keeping its position).
    pub fn insert(&mut self, aggregate: AuthorAggregate) {
        match self.index.get(aggregate.author_id()) {
            Some(&i) => self.authors[i] = aggregate,
            None => {
                self.index
                    .insert(aggregate.author_id().to_string(), self.authors.len());
                self.authors.push(aggregate);
            }
        }
    }

    pub fn get(&self, author_id: &str) -> Option<&AuthorAggregate> {
        self.index.get(author_id).map(|&i| &self.authors[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthorAggregate> {
        self.authors.iter()
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

/// Counters from one aggregation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregateStats {
    pub requested: usize,
    pub aggregated: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub works_seen: usize,
}

/// Fetch one author's works and tally them.
///
/// Reads pages `1..=max_work_pages`, stopping at the first short page.
/// Returns `None` if any page fails; nothing partial is kept.
pub fn aggregate_author<T: Transport>(
    fetcher: &Fetcher<T>,
    config: &Config,
    author_id: &str,
) -> Option<(AuthorAggregate, usize)> {
    let url = config.works_url();
    let filter = config.works_filter(author_id);
    let mut aggregate = AuthorAggregate::new(author_id);
    let mut works_seen = 0;

    for page in 1..=config.max_work_pages {
        let query = listing_query(&filter, config.per_page, page);
        let Some(value) = fetcher.fetch_json(&url, &query) else {
            log::warn!("Failed to retrieve works page {page} for author {author_id}, skipping author");
            return None;
        };
        let works: Vec<WorkRow> = parse_results(value, "works");
        works_seen += works.len();
        for work in &works {
            aggregate.add_work(work, config.years);
        }
        if works.len() < config.per_page as usize {
            break;
        }
    }
    Some((aggregate, works_seen))
}

/// Aggregate every author in `author_ids`, one at a time.
///
/// Authors already aggregated are not fetched again; failed authors are
/// logged and left out of the store.
pub fn aggregate_authors<T: Transport>(
    fetcher: &Fetcher<T>,
    config: &Config,
    author_ids: &[String],
    progress: &ProgressContext,
) -> (CoauthorStore, AggregateStats) {
    let pb = progress.count_bar("works", author_ids.len() as u64);
    let mut store = CoauthorStore::new();
    let mut stats = AggregateStats {
        requested: author_ids.len(),
        ..Default::default()
    };

    for (i, author_id) in author_ids.iter().enumerate() {
        pb.inc(1);
        if store.contains(author_id) {
            log::debug!("{author_id}: already aggregated, skipping duplicate");
            stats.duplicates += 1;
            continue;
        }

        match aggregate_author(fetcher, config, author_id) {
            Some((aggregate, works)) => {
                log::debug!(
                    "{author_id}: {works} works, {} co-author pairs",
                    aggregate.pair_count()
                );
                stats.works_seen += works;
                stats.aggregated += 1;
                store.insert(aggregate);
            }
            None => stats.skipped += 1,
        }

        if !progress.is_tty() && (i + 1) % LOG_INTERVAL == 0 {
            log::info!(
                "Aggregated {}/{} authors ({} skipped)",
                fmt_num(i + 1),
                fmt_num(author_ids.len()),
                stats.skipped
            );
        }
    }

    pb.finish_and_clear();
    log::info!(
        "Aggregated {} authors from {} works ({} skipped, {} duplicates)",
        fmt_num(stats.aggregated),
        fmt_num(stats.works_seen),
        stats.skipped,
        stats.duplicates
    );
    (store, stats)
}
