//! Participant records on both sides of reconciliation.
//!
//! [`ExternalParticipant`] comes from an independent source (typically a
//! bracket provider) and knows names and scores but not players.
//! [`EnrichedParticipant`] joins it with an inferred player group, and
//! [`Side`] further resolves each player id to a [`UserIdentity`].

use serde::{Deserialize, Serialize};

use crate::matches::PlatformId;
use crate::player::UserId;

/// Externally recorded participant of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalParticipant {
    /// Display name from the bracket.
    pub name: String,
    /// Series score from the bracket.
    pub score: i64,
    /// Whether the bracket marks this participant as the series winner.
    #[serde(default)]
    pub winner: bool,
}

impl ExternalParticipant {
    /// Creates an external participant record.
    #[must_use]
    pub fn new(name: impl Into<String>, score: i64, winner: bool) -> Self {
        Self {
            name: name.into(),
            score,
            winner,
        }
    }
}

/// An inferred player group paired with its external participant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedParticipant {
    /// Players of the inferred group.
    pub user_ids: Vec<UserId>,

    /// Matches credited to the inferred group.
    pub win_count: usize,

    /// Copied from the external record.
    pub winner: bool,
    /// Copied from the external record.
    pub name: String,
    /// Copied from the external record.
    pub score: i64,

    /// Series-wide platform id.
    pub platform_id: PlatformId,
}

/// Display identity of a player, as last seen in the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Platform user id.
    pub id: UserId,
    /// Account name, falling back to the in-game name.
    pub name: String,
    /// Platform of the match this identity was last seen in.
    pub platform_id: PlatformId,
}

/// Final per-participant output: the enriched record plus resolved users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Side {
    /// Enriched record, flattened into the side on the wire.
    #[serde(flatten)]
    pub participant: EnrichedParticipant,

    /// Identities of the group's players, in group order.
    pub users: Vec<UserIdentity>,
}
