//! Identity enrichment and the full resolution pipeline.

use std::collections::HashMap;

use crate::inference::infer_groups;
use crate::matches::Match;
use crate::participant::{EnrichedParticipant, ExternalParticipant, Side, UserIdentity};
use crate::player::UserId;
use crate::reconcile::reconcile;

/// Display identities of every known player in a series.
///
/// Built by scanning matches in order; a later match overwrites the name and
/// platform recorded for a returning player.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    users: HashMap<UserId, UserIdentity>,
}

impl Roster {
    /// Builds the roster from every player row of every match.
    #[must_use]
    pub fn from_matches(matches: &[Match]) -> Self {
        let mut users = HashMap::new();
        for m in matches {
            for player in &m.players {
                let Some(id) = &player.user_id else {
                    continue;
                };
                users.insert(
                    id.clone(),
                    UserIdentity {
                        id: id.clone(),
                        name: player.display_name().to_string(),
                        platform_id: m.platform_id.clone(),
                    },
                );
            }
        }
        log::debug!("roster has {} users", users.len());
        Self { users }
    }

    /// Looks up one user.
    #[must_use]
    pub fn get(&self, id: &UserId) -> Option<&UserIdentity> {
        self.users.get(id)
    }

    /// Number of known users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if no users are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Resolves ids in order, skipping empty ids and ids not on the roster.
    #[must_use]
    pub fn resolve(&self, ids: &[UserId]) -> Vec<UserIdentity> {
        ids.iter()
            .filter(|id| !id.is_empty())
            .filter_map(|id| self.users.get(id).cloned())
            .collect()
    }

    /// Attaches resolved users to each participant.
    #[must_use]
    pub fn enrich(&self, participants: Vec<EnrichedParticipant>) -> Vec<Side> {
        participants
            .into_iter()
            .map(|participant| {
                let users = self.resolve(&participant.user_ids);
                Side { participant, users }
            })
            .collect()
    }
}

/// Resolves the sides of a series: infer groups from `matches`, pair them with
/// `participants` by rank, then attach user identities.
///
/// # Examples
///
/// ```
/// use series_sides::{get_sides, ExternalParticipant, Match, Player, Team};
///
/// let ab = Team::new(vec![Player::new("a", "A"), Player::new("b", "B")]);
/// let cd = Team::new(vec![Player::new("c", "C"), Player::new("d", "D")]);
/// let matches = vec![
///     Match::from_teams(1, "de", vec![ab.clone(), cd.clone()], 0),
///     Match::from_teams(2, "de", vec![ab, cd], 0),
/// ];
/// let participants = vec![
///     ExternalParticipant::new("Blue", 0, false),
///     ExternalParticipant::new("Red", 2, true),
/// ];
///
/// let sides = get_sides(&matches, &participants);
/// assert_eq!(sides[0].participant.name, "Red");
/// assert_eq!(sides[0].users[0].name, "A");
/// ```
#[must_use]
pub fn get_sides(matches: &[Match], participants: &[ExternalParticipant]) -> Vec<Side> {
    let groups = infer_groups(matches);
    let enriched = reconcile(&groups, participants);
    Roster::from_matches(matches).enrich(enriched)
}
