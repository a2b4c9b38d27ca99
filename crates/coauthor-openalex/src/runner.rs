//! Pipeline orchestration: enumerate -> aggregate -> enrich -> export

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;

use coauthor_core::{Fetcher, HttpTransport, ProgressContext, Transport, fmt_num};

use crate::aggregate::aggregate_authors;
use crate::config::Config;
use crate::enrich::collect_profiles;
use crate::enumerate::enumerate_authors;
use crate::export::export_csv;

/// Run the co-authorship pipeline against the live API
pub fn run(config: &Config, progress: &ProgressContext) -> anyhow::Result<RunSummary> {
    config.validate()?;
    let fetcher: Fetcher<HttpTransport> =
        Fetcher::from_config(&config.http).context("Failed to build HTTP client")?;
    run_with(&fetcher, config, progress)
}

/// Run the pipeline over any transport
pub fn run_with<T: Transport>(
    fetcher: &Fetcher<T>,
    config: &Config,
    progress: &ProgressContext,
) -> anyhow::Result<RunSummary> {
    let start = Instant::now();
    config.validate()?;

    log::info!(
        "Concept {}: {} pages x {} authors, years {} ({} years), {} attempts per request",
        config.concept,
        config.max_pages,
        config.per_page,
        config.years,
        config.years.num_years(),
        fetcher.max_attempts()
    );

    let (author_ids, author_pages) = enumerate_authors(fetcher, config, progress);
    let (store, agg) = aggregate_authors(fetcher, config, &author_ids, progress);
    let (profiles, profile_pages) = collect_profiles(fetcher, config, progress);

    let unenriched = store
        .iter()
        .filter(|a| !profiles.contains_key(a.author_id()))
        .count();
    if unenriched > 0 {
        log::warn!("{unenriched} aggregated authors have no profile");
    }

    let rows_written = export_csv(&config.output_path, &store, &profiles, config.years)?;

    let summary = RunSummary {
        authors_enumerated: author_ids.len(),
        author_pages_failed: author_pages.pages_failed,
        authors_aggregated: agg.aggregated,
        authors_skipped: agg.skipped,
        duplicate_authors: agg.duplicates,
        works_seen: agg.works_seen,
        profiles: profiles.len(),
        profile_pages_failed: profile_pages.pages_failed,
        unenriched_authors: unenriched,
        rows_written,
        output_path: config.output_path.clone(),
        elapsed: start.elapsed(),
    };
    summary.log();
    Ok(summary)
}

/// Summary of pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub authors_enumerated: usize,
    pub author_pages_failed: u32,
    pub authors_aggregated: usize,
    pub authors_skipped: usize,
    pub duplicate_authors: usize,
    pub works_seen: usize,
    pub profiles: usize,
    pub profile_pages_failed: u32,
    pub unenriched_authors: usize,
    pub rows_written: usize,
    pub output_path: PathBuf,
    pub elapsed: std::time::Duration,
}

impl RunSummary {
    /// Label/value pairs for tabular display.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "Authors enumerated",
                format!(
                    "{} ({} pages failed)",
                    fmt_num(self.authors_enumerated),
                    self.author_pages_failed
                ),
            ),
            (
                "Authors aggregated",
                format!(
                    "{} ({} skipped, {} duplicates)",
                    fmt_num(self.authors_aggregated),
                    self.authors_skipped,
                    self.duplicate_authors
                ),
            ),
            ("Works seen", fmt_num(self.works_seen)),
            (
                "Profiles",
                format!(
                    "{} ({} pages failed, {} authors unenriched)",
                    fmt_num(self.profiles),
                    self.profile_pages_failed,
                    self.unenriched_authors
                ),
            ),
            ("Rows written", fmt_num(self.rows_written)),
            ("Output", self.output_path.display().to_string()),
            ("Time", format!("{:.1}s", self.elapsed.as_secs_f64())),
        ]
    }

    pub fn log(&self) {
        log::info!("=== Pipeline Summary ===");
        for (label, value) in self.rows() {
            log::info!("{label}: {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeApi;
    use serde_json::json;

    #[test]
    fn run_with_fake_api() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            max_pages: 1,
            output_path: dir.path().join("out.csv"),
            ..Default::default()
        };
        let api = FakeApi::new()
            .page(
                &config.authors_url(),
                &config.authors_filter(),
                1,
                json!([{"id": "A", "display_name": "Alice", "summary_stats": {"h_index": 4}}]),
            )
            .page(
                &config.works_url(),
                &config.works_filter("A"),
                1,
                json!([{"publication_year": 2020, "authorships": [
                    {"author": {"id": "A", "display_name": "Alice"}},
                    {"author": {"id": "B", "display_name": "Bob"}}
                ]}]),
            );
        let fetcher = api.into_fetcher();

        let summary = run_with(&fetcher, &config, &ProgressContext::hidden()).unwrap();
        assert_eq!(summary.authors_enumerated, 1);
        assert_eq!(summary.authors_aggregated, 1);
        assert_eq!(summary.profiles, 1);
        assert_eq!(summary.rows_written, 1);

        let csv = std::fs::read_to_string(&config.output_path).unwrap();
        assert_eq!(csv.lines().nth(1), Some("A,Alice,4,,,,,2020,B,Bob,1"));
    }

    #[test]
    fn run_with_rejects_invalid_config() {
        let config = Config {
            per_page: 500,
            ..Default::default()
        };
        let fetcher = FakeApi::new().into_fetcher();
        assert!(run_with(&fetcher, &config, &ProgressContext::hidden()).is_err());
        assert!(fetcher.transport().calls().is_empty());
    }

    #[test]
    fn zero_work_pages_rejected_before_fetching() {
        let config = Config {
            max_pages: 1,
            max_work_pages: 0,
            ..Default::default()
        };
        let fetcher = FakeApi::new()
            .page(
                &config.authors_url(),
                &config.authors_filter(),
                1,
                json!([{"id": "A"}]),
            )
            .page(
                &config.works_url(),
                &config.works_filter("A"),
                1,
                json!([{"publication_year": 2020, "authorships": [
                    {"author": {"id": "A"}},
                    {"author": {"id": "B", "display_name": "Bob"}}
                ]}]),
            )
            .into_fetcher();
        assert!(run_with(&fetcher, &config, &ProgressContext::hidden()).is_err());
        assert!(fetcher.transport().calls().is_empty());
    }

    #[test]
    fn summary_rows_and_log() {
        let summary = RunSummary {
            authors_enumerated: 3000,
            author_pages_failed: 0,
            authors_aggregated: 2990,
            authors_skipped: 10,
            duplicate_authors: 0,
            works_seen: 123_456,
            profiles: 3000,
            profile_pages_failed: 0,
            unenriched_authors: 0,
            rows_written: 45_000,
            output_path: PathBuf::from("out.csv"),
            elapsed: std::time::Duration::from_secs(90),
        };
        let rows = summary.rows();
        assert_eq!(rows[4], ("Rows written", "45,000".to_string()));
        assert_eq!(rows[6].1, "90.0s");
        // Just verify it doesn't panic
        summary.log();
    }
}
