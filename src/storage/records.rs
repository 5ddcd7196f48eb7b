//! Row types returned by the storage boundary.
//!
//! These mirror the already-normalized relational rows the engine is fed
//! with; nothing here is computed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matches::MatchId;
use crate::participant::ExternalParticipant;

/// Series identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    /// Creates a series id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Event row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event identifier.
    pub id: String,
    /// Event name.
    pub name: String,
}

/// Tournament row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRecord {
    /// Tournament identifier.
    pub id: String,
    /// Owning event.
    pub event_id: String,
    /// Tournament name.
    pub name: String,
}

/// Map played at an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMap {
    /// Map identifier.
    pub id: i64,
    /// Event the map was played at.
    pub event_id: String,
    /// Map name.
    pub name: String,
}

/// Series row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Series identifier.
    pub id: SeriesId,
    /// Series name.
    pub name: String,
    /// When the series was played, if known.
    #[serde(default)]
    pub played: Option<DateTime<Utc>>,
    /// Owning tournament.
    pub tournament_id: String,
}

/// A series row joined with its tournament and event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDetail {
    /// The series row itself.
    pub series: SeriesRecord,
    /// Name of the owning tournament.
    pub tournament_name: String,
    /// Event owning the tournament.
    pub event_id: String,
    /// Name of that event.
    pub event_name: String,
}

/// External participant row tagged with the series it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Series the participant took part in.
    pub series_id: SeriesId,
    /// The participant, flattened into the row.
    #[serde(flatten)]
    pub participant: ExternalParticipant,
}

/// Lightweight reference from a match to its series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRef {
    /// Match identifier.
    pub id: MatchId,
    /// Series the match belongs to.
    pub series_id: SeriesId,
}
