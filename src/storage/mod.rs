//! Storage boundary.
//!
//! The [`SeriesStore`] trait is the interface to the relational source the
//! engine's inputs come from. [`InMemorySeriesStore`] is the reference
//! backend for tests, the CLI and embedded use.

mod memory;
mod records;
mod traits;

pub use memory::InMemorySeriesStore;
pub use records::{
    EventMap, EventRecord, MatchRef, ParticipantRecord, SeriesDetail, SeriesId, SeriesRecord,
    TournamentRecord,
};
pub use traits::{SeriesStore, StorageError};
