//! Author profile enrichment from a second pass over the author listing

use rustc_hash::FxHashMap;

use coauthor_core::{Fetcher, ProgressContext, Transport, fmt_num};

use crate::config::Config;
use crate::listing::{ListingStats, scan_author_listing};
use crate::schema::AuthorRow;

/// Profile attributes joined onto every exported row of an author
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorProfile {
    pub display_name: Option<String>,
    pub h_index: Option<i32>,
    pub i10_index: Option<i32>,
    pub two_yr_mean_citedness: Option<f64>,
    /// Last known institution name, empty if unknown
    pub institution: String,
    /// Last known institution country code, empty if unknown
    pub country_code: String,
}

impl AuthorProfile {
    pub fn from_row(row: &AuthorRow) -> Self {
        let (institution, country_code) = row
            .last_institution()
            .map(|inst| {
                (
                    inst.display_name.clone().unwrap_or_default(),
                    inst.country_code.clone().unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        Self {
            display_name: row.display_name.clone(),
            h_index: row.h_index(),
            i10_index: row.i10_index(),
            two_yr_mean_citedness: row.two_yr_mean_citedness(),
            institution,
            country_code,
        }
    }
}

/// Author id -> profile
pub type ProfileMap = FxHashMap<String, AuthorProfile>;

/// Re-scan the author listing and collect a profile per author id.
///
/// Later records for the same id replace earlier ones. Failed pages leave
/// their authors unenriched.
pub fn collect_profiles<T: Transport>(
    fetcher: &Fetcher<T>,
    config: &Config,
    progress: &ProgressContext,
) -> (ProfileMap, ListingStats) {
    let pb = progress.stage_line("profiles");
    let mut profiles = ProfileMap::default();

    let stats = scan_author_listing(fetcher, config, "profiles", &pb, |rows| {
        for row in rows {
            let profile = AuthorProfile::from_row(&row);
            if let Some(id) = row.id {
                profiles.insert(id, profile);
            }
        }
    });

    pb.finish_and_clear();
    if stats.pages_failed > 0 {
        log::warn!(
            "{} profile pages failed; their authors export without profile fields",
            stats.pages_failed
        );
    }
    log::info!("Collected {} author profiles", fmt_num(profiles.len()));
    (profiles, stats)
}
