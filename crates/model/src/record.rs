use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::value::{format_utc, Value};

/// A movie row as stored by the service and in the reference dataset.
///
/// `id` is assigned by the service on insert, so reference records
/// usually leave it unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub year: i64,
    /// Running time in minutes.
    pub duration: i64,
    #[serde(rename = "mpaaRating")]
    pub rating: String,
    #[serde(with = "time::serde::rfc3339")]
    pub release_date: OffsetDateTime,
    pub best_picture_winner: bool,
}

impl Record {
    /// Read one field as a runtime value.
    ///
    /// A missing identity reads as `Int(0)`; identities assigned by the
    /// service are always positive.
    pub fn field(&self, field: FieldId) -> Value {
        match field {
            FieldId::Id => Value::Int(self.id.unwrap_or(0)),
            FieldId::Title => Value::Text(self.title.clone()),
            FieldId::Year => Value::Int(self.year),
            FieldId::Duration => Value::Int(self.duration),
            FieldId::Rating => Value::Text(self.rating.clone()),
            FieldId::ReleaseDate => Value::DateTime(self.release_date),
            FieldId::BestPictureWinner => Value::Bool(self.best_picture_winner),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Movie[title={:?}, year={}, duration={}, rating={:?}, releaseDate={}, bestPictureWinner={}",
            self.title,
            self.year,
            self.duration,
            self.rating,
            format_utc(&self.release_date),
            self.best_picture_winner
        )?;
        if let Some(id) = self.id {
            write!(f, ", id={}", id)?;
        }
        write!(f, "]")
    }
}

// ──────────────────────────────────────────────
// Field identifiers
// ──────────────────────────────────────────────

/// Names a column of [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Id,
    Title,
    Year,
    Duration,
    Rating,
    ReleaseDate,
    BestPictureWinner,
}

impl FieldId {
    pub const ALL: [FieldId; 7] = [
        FieldId::Id,
        FieldId::Title,
        FieldId::Year,
        FieldId::Duration,
        FieldId::Rating,
        FieldId::ReleaseDate,
        FieldId::BestPictureWinner,
    ];

    /// Fields that carry content, as opposed to the service-assigned identity.
    pub const CONTENT: [FieldId; 6] = [
        FieldId::Title,
        FieldId::Year,
        FieldId::Duration,
        FieldId::Rating,
        FieldId::ReleaseDate,
        FieldId::BestPictureWinner,
    ];

    /// Column name used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            FieldId::Id => "id",
            FieldId::Title => "title",
            FieldId::Year => "year",
            FieldId::Duration => "duration",
            FieldId::Rating => "mpaaRating",
            FieldId::ReleaseDate => "releaseDate",
            FieldId::BestPictureWinner => "bestPictureWinner",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ──────────────────────────────────────────────
// Dataset
// ──────────────────────────────────────────────

/// The immutable reference table that local evaluation runs against.
///
/// Record order is significant: it is the stable order that ties fall
/// back to, and position `i` corresponds to service identity `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Reference record for a service identity (1-based).
    pub fn by_identity(&self, id: i64) -> Option<&Record> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.records.get(index)
    }

    /// Copy of the dataset with identities `1..=N` assigned in order.
    pub fn with_identities(&self) -> Dataset {
        Dataset {
            records: self
                .records
                .iter()
                .zip(1i64..)
                .map(|(r, id)| r.clone().with_id(id))
                .collect(),
        }
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Record {
        Record {
            id: None,
            title: "Pulp Fiction".to_string(),
            year: 1994,
            duration: 154,
            rating: "R".to_string(),
            release_date: datetime!(1994-10-14 0:00 UTC),
            best_picture_winner: false,
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for f in FieldId::ALL {
            assert_eq!(FieldId::from_wire_name(f.wire_name()), Some(f));
        }
        assert_eq!(FieldId::from_wire_name("Rating"), None);
    }

    #[test]
    fn record_serializes_with_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["mpaaRating"], "R");
        assert_eq!(json["releaseDate"], "1994-10-14T00:00:00Z");
        assert_eq!(json["bestPictureWinner"], false);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn dataset_identity_lookup_is_one_based() {
        let ds = Dataset::new(vec![sample()]);
        assert!(ds.by_identity(0).is_none());
        assert!(ds.by_identity(-1).is_none());
        assert_eq!(ds.by_identity(1).map(|r| r.year), Some(1994));
        assert_eq!(ds.with_identities().records()[0].id, Some(1));
    }

    #[test]
    fn display_lists_fields() {
        let text = sample().with_id(7).to_string();
        assert!(text.starts_with("Movie[title=\"Pulp Fiction\""));
        assert!(text.ends_with("id=7]"));
    }
}
