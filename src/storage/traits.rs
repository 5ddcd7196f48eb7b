//! Abstract retrieval traits for series data.
//!
//! The engine never queries storage itself. Callers read matches and
//! participant rows through a [`SeriesStore`], which may be a live database,
//! a cached wrapper, or the in-memory backend used by tests.

use thiserror::Error;

use crate::matches::Match;
use crate::participant::ExternalParticipant;
use crate::storage::records::{
    EventMap, EventRecord, MatchRef, ParticipantRecord, SeriesDetail, SeriesId, SeriesRecord,
    TournamentRecord,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Series not found.
    #[error("Series not found: {0}")]
    SeriesNotFound(SeriesId),

    /// Key already exists.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),

    /// Connection failed.
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Read access to series, their matches and their external participants.
///
/// All list reads return rows in stored order. Ordering matters: matches are
/// fed to inference in this order, and reconciliation ties fall back to it.
pub trait SeriesStore: Send + Sync {
    /// Series row joined with its tournament and event. `None` if any part of the join is missing.
    fn series(&self, id: &SeriesId) -> Result<Option<SeriesDetail>, StorageError>;

    /// External participants of one series.
    fn participants(&self, id: &SeriesId) -> Result<Vec<ExternalParticipant>, StorageError>;

    /// Matches of one series, fully materialized.
    fn matches(&self, id: &SeriesId) -> Result<Vec<Match>, StorageError>;

    /// All events.
    fn events(&self) -> Result<Vec<EventRecord>, StorageError>;

    /// All tournaments.
    fn tournaments(&self) -> Result<Vec<TournamentRecord>, StorageError>;

    /// All series rows.
    fn all_series(&self) -> Result<Vec<SeriesRecord>, StorageError>;

    /// All external participants, tagged with their series.
    fn all_participants(&self) -> Result<Vec<ParticipantRecord>, StorageError>;

    /// Every match that belongs to a series.
    fn match_refs(&self) -> Result<Vec<MatchRef>, StorageError>;

    /// All event maps.
    fn event_maps(&self) -> Result<Vec<EventMap>, StorageError>;
}

impl<S: SeriesStore + ?Sized> SeriesStore for std::sync::Arc<S> {
    fn series(&self, id: &SeriesId) -> Result<Option<SeriesDetail>, StorageError> {
        (**self).series(id)
    }

    fn participants(&self, id: &SeriesId) -> Result<Vec<ExternalParticipant>, StorageError> {
        (**self).participants(id)
    }

    fn matches(&self, id: &SeriesId) -> Result<Vec<Match>, StorageError> {
        (**self).matches(id)
    }

    fn events(&self) -> Result<Vec<EventRecord>, StorageError> {
        (**self).events()
    }

    fn tournaments(&self) -> Result<Vec<TournamentRecord>, StorageError> {
        (**self).tournaments()
    }

    fn all_series(&self) -> Result<Vec<SeriesRecord>, StorageError> {
        (**self).all_series()
    }

    fn all_participants(&self) -> Result<Vec<ParticipantRecord>, StorageError> {
        (**self).all_participants()
    }

    fn match_refs(&self) -> Result<Vec<MatchRef>, StorageError> {
        (**self).match_refs()
    }

    fn event_maps(&self) -> Result<Vec<EventMap>, StorageError> {
        (**self).event_maps()
    }
}
