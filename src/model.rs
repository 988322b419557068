//! Data shapes shared by the scraper, the snapshot store and the HTTP layer
//!
//! Field names on the wire follow the snapshot file the portfolio site
//! already reads (`articles`, `citations`, `hIndex`, ...).

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One row of the profile's publication table
///
/// The title is the identity key; Scholar exposes nothing stronger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub authors: String,
    /// Venue line as printed under the authors
    pub publication: String,
    pub year: String,
    /// Citation count as displayed (may be empty)
    #[serde(rename = "citations")]
    pub citation_count: String,
}

/// Header block of a Scholar profile page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileHeader {
    pub name: String,
    pub affiliation: String,
    pub h_index: String,
    pub i10_index: String,
    #[serde(rename = "citations")]
    pub total_citations: String,
}

/// The full result of one aggregation run, as persisted in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub name: String,
    pub affiliation: String,
    pub h_index: String,
    pub i10_index: String,
    #[serde(rename = "citations")]
    pub total_citations: String,
    #[serde(rename = "articles")]
    pub publications: Vec<Publication>,
    /// Millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
    #[serde(with = "timestamp_millis")]
    pub last_updated: DateTime<Utc>,
}

impl ProfileSummary {
    /// Combines a profile header with the merged publication list
    ///
    /// `last_updated` is truncated to whole milliseconds so the value
    /// survives a trip through the snapshot file unchanged.
    pub fn new(
        header: ProfileHeader,
        publications: Vec<Publication>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            name: header.name,
            affiliation: header.affiliation,
            h_index: header.h_index,
            i10_index: header.i10_index,
            total_citations: header.total_citations,
            publications,
            last_updated: last_updated.trunc_subsecs(3),
        }
    }
}

/// RFC 3339 timestamps with exactly three fractional digits and a `Z` suffix
mod timestamp_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
