use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::inference::DisjointSet;
use crate::matches::{Match, MatchId, PlatformId};
use crate::player::UserId;

/// Kind of a node in the participant graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// One per match; credited to the component of the winning players.
    Win(MatchId),
    /// One per distinct known user id.
    Player(UserId),
}

/// A set of players believed to be one persistent participant of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredGroup {
    /// Members in the order they first appeared in the series.
    pub user_ids: Vec<UserId>,

    /// Matches in the series this group is credited with winning.
    pub win_count: usize,

    /// Greatest platform id over every match in the series.
    pub platform_id: PlatformId,
}

/// Connectivity graph of players and wins across a series.
///
/// Edges are never stored: every edge is folded straight into a union-find,
/// which is all weak connectivity needs. Node indices follow insertion
/// order (each match's win node, then its not-yet-seen players), and that
/// order is what makes the output deterministic.
#[derive(Debug, Clone, Default)]
pub struct ParticipantGraph {
    nodes: Vec<NodeKind>,
    players: HashMap<UserId, usize>,
    sets: DisjointSet,
    platform_ids: Vec<PlatformId>,
}

impl ParticipantGraph {
    /// Builds the graph for an ordered series of matches.
    ///
    /// Only ids listed in some match's `players` become player nodes; team
    /// entries referring to any other id are ignored.
    #[must_use]
    pub fn from_matches(matches: &[Match]) -> Self {
        let mut graph = Self::default();

        let mut win_nodes = Vec::with_capacity(matches.len());
        for m in matches {
            win_nodes.push(graph.add_node(NodeKind::Win(m.id)));
            for id in m.players.iter().filter_map(|p| p.user_id.as_ref()) {
                if !graph.players.contains_key(id) {
                    let index = graph.add_node(NodeKind::Player(id.clone()));
                    graph.players.insert(id.clone(), index);
                }
            }
            graph.platform_ids.push(m.platform_id.clone());
        }

        for (m, &win) in matches.iter().zip(&win_nodes) {
            graph.link_match(m, win);
        }

        log::debug!(
            "participant graph: {} matches, {} players, {} nodes",
            matches.len(),
            graph.players.len(),
            graph.nodes.len()
        );
        graph
    }

    fn add_node(&mut self, kind: NodeKind) -> usize {
        let index = self.sets.push();
        self.nodes.push(kind);
        index
    }

    fn player_index(&self, id: &UserId) -> Option<usize> {
        self.players.get(id).copied()
    }

    fn link_match(&mut self, m: &Match, win: usize) {
        match &m.winning_team {
            None => log::warn!("match {} has no winning team; its win stays unattributed", m.id),
            Some(team) if team.is_empty() => {
                log::warn!("match {} has an empty winning team; its win stays unattributed", m.id);
            }
            Some(_) => {}
        }

        let winners: Vec<usize> = m.winner_ids().filter_map(|id| self.player_index(id)).collect();
        for player in winners {
            self.sets.union(player, win);
        }

        // Linking every member to the first one connects the same pairs as
        // linking every ordered pair.
        for team in &m.teams {
            let members: Vec<usize> = team.user_ids().filter_map(|id| self.player_index(id)).collect();
            if let Some((&first, rest)) = members.split_first() {
                for &other in rest {
                    self.sets.union(first, other);
                }
            }
        }

        log::trace!("linked match {} ({} teams)", m.id, m.teams.len());
    }

    /// Number of nodes (win and player).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct known players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Returns true if both ids are known players of the same component.
    pub fn connected(&mut self, a: &UserId, b: &UserId) -> bool {
        match (self.player_index(a), self.player_index(b)) {
            (Some(a), Some(b)) => self.sets.find(a) == self.sets.find(b),
            _ => false,
        }
    }

    /// Collapses the graph into one group per connected component.
    ///
    /// Groups are ordered by the first node of each component; members keep
    /// node order. A component with no players (a win nobody could be
    /// credited with) still yields a group with an empty member list.
    #[must_use]
    pub fn into_groups(mut self) -> Vec<InferredGroup> {
        let Some(platform_id) = self.platform_ids.iter().max().cloned() else {
            return Vec::new();
        };

        let mut slot_by_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<InferredGroup> = Vec::new();
        let nodes = std::mem::take(&mut self.nodes);

        for (index, kind) in nodes.into_iter().enumerate() {
            let root = self.sets.find(index);
            let slot = *slot_by_root.entry(root).or_insert_with(|| {
                groups.push(InferredGroup {
                    user_ids: Vec::new(),
                    win_count: 0,
                    platform_id: platform_id.clone(),
                });
                groups.len() - 1
            });

            match kind {
                NodeKind::Win(_) => groups[slot].win_count += 1,
                NodeKind::Player(id) => groups[slot].user_ids.push(id),
            }
        }

        log::debug!("inferred {} participant groups", groups.len());
        groups
    }
}

/// Infers persistent participant groups from an ordered series of matches.
///
/// Players land in one group when they were ever teammates, directly or
/// through a chain of shared teammates across matches. Each match's win is
/// credited to the group of its winning players. The groups partition all
/// known user ids, and their win counts sum to the number of matches.
///
/// # Examples
///
/// ```
/// use series_sides::{infer_groups, Match, Player, Team};
///
/// let ab = Team::new(vec![Player::new("a", "A"), Player::new("b", "B")]);
/// let cd = Team::new(vec![Player::new("c", "C"), Player::new("d", "D")]);
/// let matches = vec![
///     Match::from_teams(1, "de", vec![ab.clone(), cd.clone()], 0),
///     Match::from_teams(2, "de", vec![ab, cd], 1),
/// ];
///
/// let groups = infer_groups(&matches);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups.iter().map(|g| g.win_count).sum::<usize>(), 2);
/// ```
#[must_use]
pub fn infer_groups(matches: &[Match]) -> Vec<InferredGroup> {
    ParticipantGraph::from_matches(matches).into_groups()
}
