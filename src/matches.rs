//! Match records: one game within a series.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::{Player, UserId};

/// Match identifier as assigned by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(i64);

impl MatchId {
    /// Wraps a raw match id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the platform (or region) a match was recorded on.
///
/// Ordered lexically; a series reports the greatest platform id seen.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(String);

impl PlatformId {
    /// Creates a platform id.
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

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlatformId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Players that played together on one side of one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team members, possibly including unresolved players.
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Team {
    /// Creates a team from its players.
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Known user ids on this team, in roster order. Unresolved players are skipped.
    pub fn user_ids(&self) -> impl Iterator<Item = &UserId> {
        self.players.iter().filter_map(|p| p.user_id.as_ref())
    }

    /// Returns true if the team has no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// One game within a series.
///
/// `teams` partition `players` into opposing sides; `winning_team` repeats
/// the players of the side that won. A match with no recorded winner has
/// `winning_team: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Match identifier.
    pub id: MatchId,

    /// Platform the match was played on.
    pub platform_id: PlatformId,

    /// Everyone who played, across all teams.
    #[serde(default)]
    pub players: Vec<Player>,

    /// The side that won, if recorded.
    #[serde(default)]
    pub winning_team: Option<Team>,

    /// Opposing sides.
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl Match {
    /// Creates a match from its teams and the index of the winning team.
    ///
    /// `players` is the concatenation of all teams. An out-of-range
    /// `winner` leaves the match without a winning team.
    #[must_use]
    pub fn from_teams(id: i64, platform_id: impl Into<String>, teams: Vec<Team>, winner: usize) -> Self {
        let players = teams.iter().flat_map(|t| t.players.iter().cloned()).collect();
        let winning_team = teams.get(winner).cloned();
        Self {
            id: MatchId::new(id),
            platform_id: PlatformId::new(platform_id),
            players,
            winning_team,
            teams,
        }
    }

    /// Known user ids on the winning side. Empty when no winner was recorded.
    pub fn winner_ids(&self) -> impl Iterator<Item = &UserId> {
        self.winning_team.iter().flat_map(Team::user_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_teams_fills_players_and_winner() {
        let m = Match::from_teams(
            7,
            "voobly",
            vec![
                Team::new(vec![Player::new("a", "A"), Player::new("b", "B")]),
                Team::new(vec![Player::new("c", "C")]),
            ],
            1,
        );
        assert_eq!(m.players.len(), 3);
        let winners: Vec<_> = m.winner_ids().map(UserId::as_str).collect();
        assert_eq!(winners, vec!["c"]);
    }

    #[test]
    fn out_of_range_winner_means_no_winner() {
        let m = Match::from_teams(1, "de", vec![Team::new(vec![Player::new("a", "A")])], 4);
        assert!(m.winning_team.is_none());
        assert_eq!(m.winner_ids().count(), 0);
    }

    #[test]
    fn team_user_ids_skip_unknown_players() {
        let team = Team::new(vec![Player::anonymous("guest"), Player::new("x", "X")]);
        let ids: Vec<_> = team.user_ids().cloned().collect();
        assert_eq!(ids, vec![UserId::new("x")]);
    }

    #[test]
    fn match_deserializes_with_missing_collections() {
        let m: Match = serde_json::from_str(r#"{"id": 3, "platform_id": "de"}"#).unwrap();
        assert_eq!(m.id, MatchId::new(3));
        assert!(m.players.is_empty());
        assert!(m.teams.is_empty());
        assert!(m.winning_team.is_none());
    }

    #[test]
    fn platform_ids_order_lexically() {
        assert!(PlatformId::new("voobly") > PlatformId::new("de"));
    }
}
