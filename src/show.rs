//! Show records as served by the catalog endpoint

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// One podcast show from the catalog.
///
/// Only `id` and `title` are required. Matching is done on `title`,
/// list rows are keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl Show {
    /// Minimal record, mostly useful for tests and fixtures
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            seasons: None,
            image: None,
            genres: Vec::new(),
            updated: None,
        }
    }

    /// Display names for the genre ids, in catalog order
    pub fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|&g| genre_name(g)).collect()
    }

    /// `updated` parsed as an RFC 3339 timestamp
    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        self.updated
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    /// Human readable last-updated date, falling back to the raw value
    pub fn updated_label(&self) -> Option<String> {
        match self.updated_at() {
            Some(dt) => Some(dt.format("%-d %b %Y").to_string()),
            None => self.updated.clone(),
        }
    }
}

/// Name for a catalog genre id
pub fn genre_name(id: u32) -> String {
    match id {
        1 => "Personal Growth".to_string(),
        2 => "Investigative Journalism".to_string(),
        3 => "History".to_string(),
        4 => "Comedy".to_string(),
        5 => "Entertainment".to_string(),
        6 => "Business".to_string(),
        7 => "Fiction".to_string(),
        8 => "News".to_string(),
        9 => "Kids and Family".to_string(),
        n => format!("Genre {}", n),
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}
