//! Denormalized co-authorship table: one CSV row per
//! (main author, year, co-author).

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::aggregate::{CoAuthorTally, CoauthorStore};
use crate::config::YearRange;
use crate::enrich::{AuthorProfile, ProfileMap};

/// Header row, always written
pub const HEADER: [&str; 11] = [
    "Main Author ID",
    "Author Name",
    "H-Index",
    "I-Index",
    "Two-Year Mean Citedness",
    "Institution",
    "Country Code",
    "Publication Year",
    "Co-Author ID",
    "Co-Author Display Name",
    "Co-Author Counts",
];

/// One output row; `None` fields serialize as empty cells.
#[derive(Debug, Serialize, PartialEq)]
pub struct OutputRow<'a> {
    pub main_author_id: &'a str,
    pub author_name: Option<&'a str>,
    pub h_index: Option<i32>,
    pub i10_index: Option<i32>,
    pub two_yr_mean_citedness: Option<f64>,
    pub institution: &'a str,
    pub country_code: &'a str,
    pub publication_year: i32,
    pub coauthor_id: &'a str,
    pub coauthor_display_name: &'a str,
    pub coauthor_count: u32,
}

impl<'a> OutputRow<'a> {
    fn new(
        main_author_id: &'a str,
        profile: Option<&'a AuthorProfile>,
        publication_year: i32,
        coauthor_id: &'a str,
        tally: &'a CoAuthorTally,
    ) -> Self {
        Self {
            main_author_id,
            author_name: profile.and_then(|p| p.display_name.as_deref()),
            h_index: profile.and_then(|p| p.h_index),
            i10_index: profile.and_then(|p| p.i10_index),
            two_yr_mean_citedness: profile.and_then(|p| p.two_yr_mean_citedness),
            institution: profile.map_or("", |p| p.institution.as_str()),
            country_code: profile.map_or("", |p| p.country_code.as_str()),
            publication_year,
            coauthor_id,
            coauthor_display_name: &tally.display_name,
            coauthor_count: tally.count,
        }
    }
}

/// Rows in export order: authors as aggregated, years ascending, co-authors by id.
///
/// Only years the author has tallies for are visited; years outside `years`
/// are skipped. Authors without a profile still produce rows, with empty
/// profile fields.
pub fn output_rows<'a>(
    store: &'a CoauthorStore,
    profiles: &'a ProfileMap,
    years: YearRange,
) -> impl Iterator<Item = OutputRow<'a>> + 'a {
    store.iter().flat_map(move |author| {
        let main = author.author_id();
        let profile = profiles.get(main);
        author
            .years()
            .filter(move |(year, _)| years.contains(*year))
            .flat_map(move |(year, tally)| {
                tally
                    .iter()
                    .filter(move |(id, _)| *id != main)
                    .map(move |(id, t)| OutputRow::new(main, profile, year, id, t))
            })
    })
}

/// Write the header and `rows` as CSV. Returns the number of data rows.
pub fn write_rows<'a, W: Write>(
    writer: W,
    rows: impl IntoIterator<Item = OutputRow<'a>>,
) -> anyhow::Result<usize> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(HEADER)
        .context("Failed to write CSV header")?;

    let mut written = 0usize;
    for row in rows {
        csv.serialize(&row).context("Failed to write CSV record")?;
        written += 1;
    }
    csv.flush().context("Failed to flush CSV")?;
    Ok(written)
}

/// Export the joined table to `path`, creating parent directories.
pub fn export_csv(
    path: &Path,
    store: &CoauthorStore,
    profiles: &ProfileMap,
    years: YearRange,
) -> anyhow::Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let rows = write_rows(BufWriter::new(file), output_rows(store, profiles, years))
        .with_context(|| format!("Failed to export {}", path.display()))?;
    log::info!("Wrote {rows} rows to {}", path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AuthorAggregate;
    use crate::schema::WorkRow;
    use serde_json::json;

    fn aggregate(main: &str, works: serde_json::Value) -> AuthorAggregate {
        let mut agg = AuthorAggregate::new(main);
        let works: Vec<WorkRow> = serde_json::from_value(works).unwrap();
        for w in &works {
            agg.add_work(w, YearRange::default());
        }
        agg
    }

    fn to_csv(store: &CoauthorStore, profiles: &ProfileMap) -> String {
        let mut buf = Vec::new();
        write_rows(&mut buf, output_rows(store, profiles, YearRange::default())).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_only_for_empty_store() {
        let csv = to_csv(&CoauthorStore::new(), &ProfileMap::default());
        assert_eq!(
            csv,
            "Main Author ID,Author Name,H-Index,I-Index,Two-Year Mean Citedness,\
             Institution,Country Code,Publication Year,Co-Author ID,\
             Co-Author Display Name,Co-Author Counts\n"
        );
    }

    #[test]
    fn enriched_row() {
        let mut store = CoauthorStore::new();
        store.insert(aggregate(
            "A",
            json!([{"publication_year": 2020, "authorships": [
                {"author": {"id": "A", "display_name": "Alice"}},
                {"author": {"id": "B", "display_name": "Bob"}}
            ]}]),
        ));
        let mut profiles = ProfileMap::default();
        profiles.insert(
            "A".into(),
            AuthorProfile {
                display_name: Some("Alice".into()),
                h_index: Some(10),
                i10_index: Some(11),
                two_yr_mean_citedness: Some(1.5),
                institution: "Uni, Town".into(),
                country_code: "GB".into(),
            },
        );

        let csv = to_csv(&store, &profiles);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "A,Alice,10,11,1.5,\"Uni, Town\",GB,2020,B,Bob,1");
    }

    #[test]
    fn unenriched_author_keeps_rows() {
        let mut store = CoauthorStore::new();
        store.insert(aggregate(
            "Z",
            json!([{"publication_year": 1999, "authorships": [
                {"author": {"id": "Z"}},
                {"author": {"id": "Y", "display_name": "Yan"}}
            ]}]),
        ));
        let csv = to_csv(&store, &ProfileMap::default());
        assert_eq!(csv.lines().nth(1), Some("Z,,,,,,,1999,Y,Yan,1"));
    }

    #[test]
    fn rows_ordered_by_author_year_coauthor() {
        let mut store = CoauthorStore::new();
        store.insert(aggregate(
            "M",
            json!([
                {"publication_year": 2001, "authorships": [
                    {"author": {"id": "M"}}, {"author": {"id": "C", "display_name": "Cy"}}
                ]},
                {"publication_year": 2000, "authorships": [
                    {"author": {"id": "M"}},
                    {"author": {"id": "B", "display_name": "Bo"}},
                    {"author": {"id": "A", "display_name": "Al"}}
                ]}
            ]),
        ));
        store.insert(aggregate(
            "K",
            json!([{"publication_year": 1990, "authorships": [
                {"author": {"id": "K"}}, {"author": {"id": "M", "display_name": "Em"}}
            ]}]),
        ));

        let profiles = ProfileMap::default();
        let keys: Vec<(&str, i32, &str)> =
            output_rows(&store, &profiles, YearRange::default())
                .map(|r| (r.main_author_id, r.publication_year, r.coauthor_id))
                .collect();
        assert_eq!(
            keys,
            vec![
                ("M", 2000, "A"),
                ("M", 2000, "B"),
                ("M", 2001, "C"),
                ("K", 1990, "M"),
            ]
        );
    }

    #[test]
    fn main_author_never_in_coauthor_column() {
        let mut store = CoauthorStore::new();
        store.insert(aggregate(
            "A",
            json!([
                {"publication_year": 2005, "authorships": [
                    {"author": {"id": "A"}}, {"author": {"id": "A"}}, {"author": {"id": "B"}}
                ]},
                {"publication_year": 2006, "authorships": [{"author": {"id": "A"}}]}
            ]),
        ));
        let profiles = ProfileMap::default();
        let rows: Vec<OutputRow> = output_rows(&store, &profiles, YearRange::default()).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r.coauthor_id != r.main_author_id));
    }

    #[test]
    fn rows_limited_to_requested_years() {
        let mut store = CoauthorStore::new();
        store.insert(aggregate(
            "A",
            json!([
                {"publication_year": 1960, "authorships": [
                    {"author": {"id": "A"}}, {"author": {"id": "B", "display_name": "Bo"}}
                ]},
                {"publication_year": 2010, "authorships": [
                    {"author": {"id": "A"}}, {"author": {"id": "C", "display_name": "Cy"}}
                ]}
            ]),
        ));
        let profiles = ProfileMap::default();

        let wide = YearRange::new(0, 100_000).unwrap();
        let years: Vec<i32> = output_rows(&store, &profiles, wide)
            .map(|r| r.publication_year)
            .collect();
        assert_eq!(years, vec![1960, 2010]);

        let narrow = YearRange::new(2000, 2020).unwrap();
        let ids: Vec<&str> = output_rows(&store, &profiles, narrow)
            .map(|r| r.coauthor_id)
            .collect();
        assert_eq!(ids, vec!["C"]);
    }

    #[test]
    fn export_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        let n = export_csv(
            &path,
            &CoauthorStore::new(),
            &ProfileMap::default(),
            YearRange::default(),
        )
        .unwrap();
        assert_eq!(n, 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Main Author ID,"));
    }
}
