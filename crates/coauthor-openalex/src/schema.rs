//! OpenAlex API objects, deserialized leniently.
//!
//! Every field defaults when missing or null, so partial upstream objects
//! never fail a page.

use serde::{Deserialize, Deserializer};

/// Treat `null` like a missing array.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// === Authors ===

/// Author object from the `/authors` listing
#[derive(Debug, Deserialize, Default)]
pub struct AuthorRow {
    /// OpenAlex ID (e.g., "https://openalex.org/A5023888391")
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub summary_stats: Option<SummaryStats>,

    /// Single-institution field used by older API responses
    #[serde(default)]
    pub last_known_institution: Option<InstitutionRef>,

    /// Array form used by newer API responses
    #[serde(default, deserialize_with = "nullable_vec")]
    pub last_known_institutions: Vec<InstitutionRef>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct SummaryStats {
    #[serde(default)]
    pub h_index: Option<i32>,
    #[serde(default)]
    pub i10_index: Option<i32>,
    #[serde(rename = "2yr_mean_citedness", default)]
    pub two_yr_mean_citedness: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct InstitutionRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl AuthorRow {
    pub fn h_index(&self) -> Option<i32> {
        self.summary_stats.as_ref().and_then(|s| s.h_index)
    }

    pub fn i10_index(&self) -> Option<i32> {
        self.summary_stats.as_ref().and_then(|s| s.i10_index)
    }

    pub fn two_yr_mean_citedness(&self) -> Option<f64> {
        self.summary_stats
            .as_ref()
            .and_then(|s| s.two_yr_mean_citedness)
    }

    /// `last_known_institution`, else the first of `last_known_institutions`.
    pub fn last_institution(&self) -> Option<&InstitutionRef> {
        self.last_known_institution
            .as_ref()
            .or_else(|| self.last_known_institutions.first())
    }
}

// === Works ===

/// Work object from the `/works` listing
#[derive(Debug, Deserialize, Default)]
pub struct WorkRow {
    #[serde(default)]
    pub publication_year: Option<i32>,

    /// Authorships in byline order
    #[serde(default, deserialize_with = "nullable_vec")]
    pub authorships: Vec<Authorship>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Authorship {
    #[serde(default)]
    pub author: Option<AuthorRef>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuthorRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl WorkRow {
    /// `(id, display_name)` for every authorship that names an author id.
    pub fn authors(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.authorships
            .iter()
            .filter_map(|a| a.author.as_ref())
            .filter_map(|a| Some((a.id.as_deref()?, a.display_name.as_deref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_AUTHOR: &str = r#"{
        "id": "https://openalex.org/A5023888391",
        "display_name": "John Doe",
        "summary_stats": {"h_index": 25, "i10_index": 50, "2yr_mean_citedness": 3.5},
        "last_known_institution": {
            "id": "https://openalex.org/I27837315",
            "display_name": "University of Michigan",
            "country_code": "US"
        }
    }"#;

    #[test]
    fn parse_author_row() {
        let row: AuthorRow = serde_json::from_str(SAMPLE_AUTHOR).unwrap();
        assert_eq!(row.id.as_deref(), Some("https://openalex.org/A5023888391"));
        assert_eq!(row.display_name.as_deref(), Some("John Doe"));
        assert_eq!(row.h_index(), Some(25));
        assert_eq!(row.i10_index(), Some(50));
        assert!((row.two_yr_mean_citedness().unwrap() - 3.5).abs() < f64::EPSILON);
        let inst = row.last_institution().unwrap();
        assert_eq!(inst.display_name.as_deref(), Some("University of Michigan"));
        assert_eq!(inst.country_code.as_deref(), Some("US"));
    }

    #[test]
    fn institution_array_fallback() {
        let json = r#"{
            "id": "https://openalex.org/A1",
            "last_known_institutions": [
                {"display_name": "ETH Zurich", "country_code": "CH"},
                {"display_name": "EPFL", "country_code": "CH"}
            ]
        }"#;
        let row: AuthorRow = serde_json::from_str(json).unwrap();
        let inst = row.last_institution().unwrap();
        assert_eq!(inst.display_name.as_deref(), Some("ETH Zurich"));
    }

    #[test]
    fn minimal_author() {
        let json = r#"{"id": "https://openalex.org/A1", "summary_stats": null,
                       "last_known_institution": null, "last_known_institutions": null}"#;
        let row: AuthorRow = serde_json::from_str(json).unwrap();
        assert!(row.display_name.is_none());
        assert!(row.h_index().is_none());
        assert!(row.last_institution().is_none());
    }

    #[test]
    fn parse_work_row() {
        let json = r#"{
            "id": "https://openalex.org/W1",
            "publication_year": 2020,
            "authorships": [
                {"author": {"id": "https://openalex.org/A1", "display_name": "Alice"}},
                {"author": {"id": null, "display_name": "Anonymous"}},
                {"author": {"id": "https://openalex.org/A2", "display_name": null}},
                {"institutions": []}
            ]
        }"#;
        let row: WorkRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.publication_year, Some(2020));
        let authors: Vec<_> = row.authors().collect();
        assert_eq!(
            authors,
            vec![
                ("https://openalex.org/A1", Some("Alice")),
                ("https://openalex.org/A2", None),
            ]
        );
    }

    #[test]
    fn work_without_authorships() {
        let row: WorkRow =
            serde_json::from_str(r#"{"publication_year": null, "authorships": null}"#).unwrap();
        assert!(row.publication_year.is_none());
        assert_eq!(row.authors().count(), 0);
    }
}
