//! Co-authorship pipeline configuration

use std::ops::RangeInclusive;
use std::path::PathBuf;

use coauthor_core::HttpConfig;

/// OpenAlex REST API root
pub const OPENALEX_API_URL: &str = "https://api.openalex.org";

/// Concept selecting the candidate authors and their works
pub const DEFAULT_CONCEPT: &str = "https://openalex.org/C2985322473";

/// Largest page size OpenAlex accepts
pub const MAX_PER_PAGE: u32 = 200;

/// Author listing pages to scan (15 x 200 = up to 3000 authors)
pub const DEFAULT_MAX_PAGES: u32 = 15;

/// Works pages per author; 1 reads only the first page
pub const DEFAULT_MAX_WORK_PAGES: u32 = 1;

/// First and last publication year counted (inclusive)
pub const DEFAULT_FIRST_YEAR: i32 = 1950;
pub const DEFAULT_LAST_YEAR: i32 = 2023;

/// Output CSV path
pub const DEFAULT_OUTPUT: &str = "co_authorship_data.csv";

/// Closed range of publication years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    first: i32,
    last: i32,
}

impl YearRange {
    /// `None` when `first > last`.
    pub fn new(first: i32, last: i32) -> Option<Self> {
        (first <= last).then_some(Self { first, last })
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last(&self) -> i32 {
        self.last
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.first..=self.last).contains(&year)
    }

    /// Years in ascending order.
    pub fn iter(&self) -> RangeInclusive<i32> {
        self.first..=self.last
    }

    /// Number of years in the range (always at least 1).
    pub fn num_years(&self) -> usize {
        (self.last - self.first) as usize + 1
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST_YEAR,
            last: DEFAULT_LAST_YEAR,
        }
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// Runtime configuration for the co-authorship pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// API root, without trailing slash
    pub api_url: String,
    /// Concept id used in both the author and the works filter
    pub concept: String,
    /// Page size for every listing request
    pub per_page: u32,
    /// Author listing pages to scan, starting at page 1
    pub max_pages: u32,
    /// Works pages per author; paging also stops at the first short page
    pub max_work_pages: u32,
    /// Publication years counted
    pub years: YearRange,
    /// Output CSV file
    pub output_path: PathBuf,
    /// Transport and retry settings
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: OPENALEX_API_URL.to_string(),
            concept: DEFAULT_CONCEPT.to_string(),
            per_page: MAX_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            max_work_pages: DEFAULT_MAX_WORK_PAGES,
            years: YearRange::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Reject settings the API or the pipeline cannot honor.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_PER_PAGE).contains(&self.per_page),
            "per_page must be between 1 and {MAX_PER_PAGE}, got {}",
            self.per_page
        );
        anyhow::ensure!(!self.concept.is_empty(), "concept must not be empty");
        anyhow::ensure!(self.max_pages >= 1, "max_pages must be at least 1");
        anyhow::ensure!(
            self.max_work_pages >= 1,
            "max_work_pages must be at least 1"
        );
        anyhow::ensure!(
            self.http.max_attempts >= 1,
            "max_attempts must be at least 1"
        );
        Ok(())
    }

    /// `{api}/authors`
    pub fn authors_url(&self) -> String {
        format!("{}/authors", self.api_url.trim_end_matches('/'))
    }

    /// `{api}/works`
    pub fn works_url(&self) -> String {
        format!("{}/works", self.api_url.trim_end_matches('/'))
    }

    /// Filter for the candidate author listing.
    pub fn authors_filter(&self) -> String {
        format!("concepts.id:{}", self.concept)
    }

    /// Filter for one author's works within the concept.
    pub fn works_filter(&self, author_id: &str) -> String {
        format!("concepts.id:{},author.id:{author_id}", self.concept)
    }
}
