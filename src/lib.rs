//! # series-sides - Participant resolution for multi-match series
//!
//! Match records expose individual players and win/loss outcomes, but not
//! which persistent participant each player belonged to. This crate infers
//! that from co-occurrence and win attribution, then reconciles the inferred
//! groups with an independently recorded list of named participants.
//!
//! ## Pipeline
//!
//! - **Group inference** ([`infer_groups`]): players linked as teammates,
//!   directly or through returning players, form one group; each match's win
//!   is credited to the group of its winners.
//! - **Reconciliation** ([`reconcile`]): groups ranked by wins are paired with
//!   external participants ranked by score.
//! - **Enrichment** ([`get_sides`]): each player id is resolved to its most
//!   recently seen display identity.
//!
//! All three stages are pure and synchronous. The storage, cache, gather and
//! view modules are the surrounding plumbing that feeds them.
//!
//! ## Usage
//!
//! ```rust
//! use series_sides::{get_sides, ExternalParticipant, Match, Player, Team};
//!
//! let ab = Team::new(vec![Player::new("a", "A"), Player::new("b", "B")]);
//! let cd = Team::new(vec![Player::new("c", "C"), Player::new("d", "D")]);
//! let matches = vec![
//!     Match::from_teams(1, "de", vec![ab.clone(), cd.clone()], 0),
//!     Match::from_teams(2, "de", vec![ab.clone(), cd.clone()], 0),
//!     Match::from_teams(3, "de", vec![ab, cd], 1),
//! ];
//! let participants = vec![
//!     ExternalParticipant::new("X", 2, true),
//!     ExternalParticipant::new("Y", 1, false),
//! ];
//!
//! let sides = get_sides(&matches, &participants);
//! assert_eq!(sides[0].participant.name, "X");
//! assert_eq!(sides[0].users.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod error;
pub mod matches;
pub mod participant;
pub mod player;

// Resolution engine
pub mod inference;
pub mod reconcile;
pub mod sides;

// Boundaries
pub mod cache;
pub mod config;
pub mod gather;
pub mod storage;
pub mod view;

pub use error::{SidesError, SidesResult};
pub use matches::{Match, MatchId, PlatformId, Team};
pub use participant::{EnrichedParticipant, ExternalParticipant, Side, UserIdentity};
pub use player::{Player, UserId};

pub use inference::{infer_groups, InferredGroup, ParticipantGraph};
pub use reconcile::reconcile;
pub use sides::{get_sides, Roster};

pub use cache::{CachedSeriesStore, Memo};
pub use config::{CacheConfig, ConfigError, GatherConfig, SidesConfig};
pub use storage::{InMemorySeriesStore, SeriesId, SeriesStore, StorageError};
pub use view::{get_events, get_many_series, get_series, EventView, SeriesView};
