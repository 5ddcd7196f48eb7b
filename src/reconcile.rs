//! Reconciliation of inferred groups with external participant records.
//!
//! Groups are ranked by win count and externals by score, both descending,
//! and paired by rank. There is no secondary key: ties keep input order
//! (both sorts are stable), and unmatched entries of the longer list are
//! dropped.

use crate::inference::InferredGroup;
use crate::participant::{EnrichedParticipant, ExternalParticipant};

/// Pairs inferred groups with external participants by rank.
///
/// Returns `min(groups.len(), external.len())` participants. Neither input is
/// modified.
///
/// # Examples
///
/// ```
/// use series_sides::{reconcile, ExternalParticipant, InferredGroup, PlatformId, UserId};
///
/// let groups = vec![
///     InferredGroup { user_ids: vec![UserId::new("c")], win_count: 1, platform_id: PlatformId::new("de") },
///     InferredGroup { user_ids: vec![UserId::new("a")], win_count: 2, platform_id: PlatformId::new("de") },
/// ];
/// let external = vec![
///     ExternalParticipant::new("X", 2, true),
///     ExternalParticipant::new("Y", 1, false),
/// ];
///
/// let paired = reconcile(&groups, &external);
/// assert_eq!(paired[0].name, "X");
/// assert_eq!(paired[0].user_ids, vec![UserId::new("a")]);
/// ```
#[must_use]
pub fn reconcile(groups: &[InferredGroup], external: &[ExternalParticipant]) -> Vec<EnrichedParticipant> {
    if groups.len() != external.len() {
        log::warn!(
            "reconciling {} inferred groups with {} external participants; {} unmatched dropped",
            groups.len(),
            external.len(),
            groups.len().abs_diff(external.len())
        );
    }

    let mut ranked_groups: Vec<&InferredGroup> = groups.iter().collect();
    ranked_groups.sort_by(|a, b| b.win_count.cmp(&a.win_count));

    let mut ranked_external: Vec<&ExternalParticipant> = external.iter().collect();
    ranked_external.sort_by(|a, b| b.score.cmp(&a.score));

    ranked_groups
        .into_iter()
        .zip(ranked_external)
        .map(|(group, participant)| EnrichedParticipant {
            user_ids: group.user_ids.clone(),
            win_count: group.win_count,
            winner: participant.winner,
            name: participant.name.clone(),
            score: participant.score,
            platform_id: group.platform_id.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::PlatformId;
    use crate::player::UserId;

    fn group(ids: &[&str], win_count: usize) -> InferredGroup {
        InferredGroup {
            user_ids: ids.iter().map(|id| UserId::new(*id)).collect(),
            win_count,
            platform_id: PlatformId::new("de"),
        }
    }

    #[test]
    fn pairs_by_rank() {
        let groups = vec![group(&["c", "d"], 1), group(&["a", "b"], 2)];
        let external = vec![
            ExternalParticipant::new("Y", 1, false),
            ExternalParticipant::new("X", 2, true),
        ];

        let paired = reconcile(&groups, &external);
        assert_eq!(paired.len(), 2);
        assert_eq!(paired[0].name, "X");
        assert!(paired[0].winner);
        assert_eq!(paired[0].user_ids, vec![UserId::new("a"), UserId::new("b")]);
        assert_eq!(paired[0].win_count, 2);
        assert_eq!(paired[1].name, "Y");
        assert_eq!(paired[1].score, 1);
    }

    #[test]
    fn truncates_to_shorter_list() {
        let groups = vec![group(&["a"], 2), group(&["b"], 1), group(&["c"], 0)];
        let external = vec![ExternalParticipant::new("X", 2, true)];
        assert_eq!(reconcile(&groups, &external).len(), 1);
        assert_eq!(reconcile(&groups[..1], &[]).len(), 0);
        assert!(reconcile(&[], &external).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let groups = vec![group(&["first"], 1), group(&["second"], 1)];
        let external = vec![
            ExternalParticipant::new("P", 3, true),
            ExternalParticipant::new("Q", 3, false),
        ];
        let paired = reconcile(&groups, &external);
        assert_eq!(paired[0].user_ids, vec![UserId::new("first")]);
        assert_eq!(paired[0].name, "P");
        assert_eq!(paired[1].user_ids, vec![UserId::new("second")]);
        assert_eq!(paired[1].name, "Q");
    }

    #[test]
    fn inputs_are_not_reordered() {
        let groups = vec![group(&["b"], 0), group(&["a"], 5)];
        let external = vec![ExternalParticipant::new("low", 0, false), ExternalParticipant::new("high", 5, true)];
        let _ = reconcile(&groups, &external);
        assert_eq!(groups[0].win_count, 0);
        assert_eq!(external[0].name, "low");
    }
}
