//! In-memory storage backend.
//!
//! Thread-safe implementation of [`SeriesStore`] over plain vectors. Rows are
//! kept in insertion order, which is the order every read returns them in.

use std::sync::RwLock;

use crate::matches::Match;
use crate::participant::ExternalParticipant;
use crate::storage::records::{
    EventMap, EventRecord, MatchRef, ParticipantRecord, SeriesDetail, SeriesId, SeriesRecord,
    TournamentRecord,
};
use crate::storage::traits::{SeriesStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct State {
    events: Vec<EventRecord>,
    tournaments: Vec<TournamentRecord>,
    series: Vec<SeriesRecord>,
    participants: Vec<ParticipantRecord>,
    matches: Vec<(Option<SeriesId>, Match)>,
    maps: Vec<EventMap>,
}

/// In-memory series store.
#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    state: RwLock<State>,
}

impl InMemorySeriesStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event. Returns error if the id already exists.
    pub fn insert_event(&self, event: EventRecord) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("event.insert"))?;
        if state.events.iter().any(|e| e.id == event.id) {
            return Err(StorageError::DuplicateKey(event.id));
        }
        state.events.push(event);
        Ok(())
    }

    /// Insert a tournament. Returns error if the id already exists.
    pub fn insert_tournament(&self, tournament: TournamentRecord) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("tournament.insert"))?;
        if state.tournaments.iter().any(|t| t.id == tournament.id) {
            return Err(StorageError::DuplicateKey(tournament.id));
        }
        state.tournaments.push(tournament);
        Ok(())
    }

    /// Insert a series. Returns error if the id already exists.
    pub fn insert_series(&self, series: SeriesRecord) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("series.insert"))?;
        if state.series.iter().any(|s| s.id == series.id) {
            return Err(StorageError::DuplicateKey(series.id.to_string()));
        }
        state.series.push(series);
        Ok(())
    }

    /// Append an external participant to a series.
    pub fn insert_participant(
        &self,
        series_id: SeriesId,
        participant: ExternalParticipant,
    ) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("participant.insert"))?;
        state.participants.push(ParticipantRecord {
            series_id,
            participant,
        });
        Ok(())
    }

    /// Append a match, optionally attached to a series.
    ///
    /// Returns error if a match with the same id already exists.
    pub fn insert_match(&self, series_id: Option<SeriesId>, m: Match) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("match.insert"))?;
        if state.matches.iter().any(|(_, existing)| existing.id == m.id) {
            return Err(StorageError::DuplicateKey(m.id.to_string()));
        }
        state.matches.push((series_id, m));
        Ok(())
    }

    /// Insert an event map.
    pub fn insert_event_map(&self, map: EventMap) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("map.insert"))?;
        if state.maps.iter().any(|m| m.id == map.id) {
            return Err(StorageError::DuplicateKey(map.id.to_string()));
        }
        state.maps.push(map);
        Ok(())
    }
}

impl SeriesStore for InMemorySeriesStore {
    fn series(&self, id: &SeriesId) -> Result<Option<SeriesDetail>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("series.get"))?;
        let Some(series) = state.series.iter().find(|s| &s.id == id) else {
            return Ok(None);
        };
        let Some(tournament) = state.tournaments.iter().find(|t| t.id == series.tournament_id) else {
            return Ok(None);
        };
        let Some(event) = state.events.iter().find(|e| e.id == tournament.event_id) else {
            return Ok(None);
        };

        Ok(Some(SeriesDetail {
            series: series.clone(),
            tournament_name: tournament.name.clone(),
            event_id: event.id.clone(),
            event_name: event.name.clone(),
        }))
    }

    fn participants(&self, id: &SeriesId) -> Result<Vec<ExternalParticipant>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("participant.list"))?;
        Ok(state
            .participants
            .iter()
            .filter(|p| &p.series_id == id)
            .map(|p| p.participant.clone())
            .collect())
    }

    fn matches(&self, id: &SeriesId) -> Result<Vec<Match>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("match.list"))?;
        Ok(state
            .matches
            .iter()
            .filter(|(series_id, _)| series_id.as_ref() == Some(id))
            .map(|(_, m)| m.clone())
            .collect())
    }

    fn events(&self) -> Result<Vec<EventRecord>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("event.list"))?;
        Ok(state.events.clone())
    }

    fn tournaments(&self) -> Result<Vec<TournamentRecord>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("tournament.list"))?;
        Ok(state.tournaments.clone())
    }

    fn all_series(&self) -> Result<Vec<SeriesRecord>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("series.list"))?;
        Ok(state.series.clone())
    }

    fn all_participants(&self) -> Result<Vec<ParticipantRecord>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("participant.list_all"))?;
        Ok(state.participants.clone())
    }

    fn match_refs(&self) -> Result<Vec<MatchRef>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("match.refs"))?;
        Ok(state
            .matches
            .iter()
            .filter_map(|(series_id, m)| {
                series_id.as_ref().map(|series_id| MatchRef {
                    id: m.id,
                    series_id: series_id.clone(),
                })
            })
            .collect())
    }

    fn event_maps(&self) -> Result<Vec<EventMap>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("map.list"))?;
        Ok(state.maps.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::{MatchId, Team};
    use crate::player::Player;

    fn seeded() -> InMemorySeriesStore {
        let store = InMemorySeriesStore::new();
        store
            .insert_event(EventRecord { id: "nac3".to_string(), name: "NAC 3".to_string() })
            .unwrap();
        store
            .insert_tournament(TournamentRecord {
                id: "nac3-main".to_string(),
                event_id: "nac3".to_string(),
                name: "Main Event".to_string(),
            })
            .unwrap();
        store
            .insert_series(SeriesRecord {
                id: SeriesId::new("s1"),
                name: "Final".to_string(),
                played: None,
                tournament_id: "nac3-main".to_string(),
            })
            .unwrap();
        store
    }

    fn one_v_one(id: i64) -> Match {
        Match::from_teams(
            id,
            "de",
            vec![Team::new(vec![Player::new("a", "A")]), Team::new(vec![Player::new("b", "B")])],
            0,
        )
    }

    #[test]
    fn series_joins_tournament_and_event() {
        let store = seeded();
        let detail = store.series(&SeriesId::new("s1")).unwrap().unwrap();
        assert_eq!(detail.tournament_name, "Main Event");
        assert_eq!(detail.event_id, "nac3");
        assert_eq!(detail.event_name, "NAC 3");
        assert!(store.series(&SeriesId::new("nope")).unwrap().is_none());
    }

    #[test]
    fn series_with_dangling_tournament_is_absent() {
        let store = seeded();
        store
            .insert_series(SeriesRecord {
                id: SeriesId::new("orphan"),
                name: "Orphan".to_string(),
                played: None,
                tournament_id: "missing".to_string(),
            })
            .unwrap();
        assert!(store.series(&SeriesId::new("orphan")).unwrap().is_none());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let store = seeded();
        let err = store
            .insert_event(EventRecord { id: "nac3".to_string(), name: "again".to_string() })
            .unwrap_err();
        assert_eq!(err, StorageError::DuplicateKey("nac3".to_string()));

        store.insert_match(None, one_v_one(1)).unwrap();
        assert!(matches!(
            store.insert_match(Some(SeriesId::new("s1")), one_v_one(1)),
            Err(StorageError::DuplicateKey(_))
        ));
    }

    #[test]
    fn matches_keep_insertion_order_and_series_scope() {
        let store = seeded();
        let s1 = SeriesId::new("s1");
        store.insert_match(Some(s1.clone()), one_v_one(3)).unwrap();
        store.insert_match(None, one_v_one(4)).unwrap();
        store.insert_match(Some(s1.clone()), one_v_one(2)).unwrap();

        let ids: Vec<MatchId> = store.matches(&s1).unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![MatchId::new(3), MatchId::new(2)]);

        let refs = store.match_refs().unwrap();
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.series_id == s1));
    }

    #[test]
    fn participants_are_scoped_to_series() {
        let store = seeded();
        store
            .insert_participant(SeriesId::new("s1"), ExternalParticipant::new("X", 2, true))
            .unwrap();
        store
            .insert_participant(SeriesId::new("s2"), ExternalParticipant::new("Z", 0, false))
            .unwrap();

        let got = store.participants(&SeriesId::new("s1")).unwrap();
        assert_eq!(got, vec![ExternalParticipant::new("X", 2, true)]);
        assert_eq!(store.all_participants().unwrap().len(), 2);
    }
}
