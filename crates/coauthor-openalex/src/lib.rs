//! Coauthor OpenAlex - co-authorship tables from the OpenAlex REST API
//!
//! Enumerates the authors tagged with a concept, tallies their co-authors
//! per publication year, joins in author profiles and writes one CSV row
//! per (author, year, co-author).
//!
//! # Example
//!
//! ```no_run
//! use coauthor_core::ProgressContext;
//! use coauthor_openalex::{Config, run};
//!
//! let config = Config {
//!     max_pages: 1,
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &ProgressContext::new()).expect("Pipeline failed");
//! println!("Wrote {} rows", summary.rows_written);
//! ```

pub mod aggregate;
pub mod config;
pub mod enrich;
pub mod enumerate;
pub mod export;
pub mod listing;
pub mod runner;
pub mod schema;

#[cfg(test)]
mod testutil;

// Re-exports for convenience
pub use aggregate::{AuthorAggregate, CoAuthorTally, CoauthorStore, YearTally};
pub use config::{Config, YearRange};
pub use enrich::{AuthorProfile, ProfileMap};
pub use runner::{RunSummary, run, run_with};
