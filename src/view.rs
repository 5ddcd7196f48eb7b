//! Presentation views over stored series.
//!
//! Fetches the rows a view needs concurrently, runs side resolution where the
//! view has sides, and nests the rows into event → tournament → series.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SidesResult;
use crate::gather::{try_join3, try_join_all};
use crate::matches::MatchId;
use crate::participant::{ExternalParticipant, Side};
use crate::sides::get_sides;
use crate::storage::{EventMap, SeriesId, SeriesStore, StorageError};

/// Event a series view belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    /// Event identifier.
    pub id: String,
    /// Event name.
    pub name: String,
}

/// Tournament a series view belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRef {
    /// Tournament identifier.
    pub id: String,
    /// Tournament name.
    pub name: String,
    /// Owning event.
    pub event: EventRef,
}

/// One series with its resolved sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesView {
    /// Series identifier.
    pub id: SeriesId,
    /// Series name.
    pub name: String,
    /// When the series was played, if known.
    pub played: Option<DateTime<Utc>>,
    /// External participants as stored.
    pub participants: Vec<ExternalParticipant>,
    /// Matches in stored order.
    pub match_ids: Vec<MatchId>,
    /// Resolved sides, best ranked first.
    pub sides: Vec<Side>,
    /// Owning tournament and event.
    pub tournament: TournamentRef,
}

/// Series entry inside an event listing. Sides are not resolved here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Series identifier.
    pub id: SeriesId,
    /// Series name.
    pub name: String,
    /// When the series was played, if known.
    pub played: Option<DateTime<Utc>>,
    /// External participants as stored.
    pub participants: Vec<ExternalParticipant>,
    /// Matches in stored order.
    pub match_ids: Vec<MatchId>,
}

/// Tournament inside an event listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentView {
    /// Tournament identifier.
    pub id: String,
    /// Tournament name.
    pub name: String,
    /// Series of this tournament, in stored order.
    pub series: Vec<SeriesSummary>,
}

/// Event with everything nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    /// Event identifier.
    pub id: String,
    /// Event name.
    pub name: String,
    /// Maps played at the event.
    pub maps: Vec<EventMap>,
    /// Tournaments of the event, in stored order.
    pub tournaments: Vec<TournamentView>,
}

/// Fetch one series and resolve its sides.
///
/// # Errors
/// `StorageError::SeriesNotFound` if the series (or its tournament/event)
/// does not exist; any read error otherwise.
pub fn get_series<S: SeriesStore + ?Sized>(store: &S, id: &SeriesId) -> SidesResult<SeriesView> {
    let (detail, participants, matches) = try_join3(
        || Ok(store.series(id)?),
        || Ok(store.participants(id)?),
        || Ok(store.matches(id)?),
    )?;
    let detail = detail.ok_or_else(|| StorageError::SeriesNotFound(id.clone()))?;

    let sides = get_sides(&matches, &participants);
    let series = detail.series;
    Ok(SeriesView {
        id: series.id,
        name: series.name,
        played: series.played,
        match_ids: matches.iter().map(|m| m.id).collect(),
        participants,
        sides,
        tournament: TournamentRef {
            id: series.tournament_id,
            name: detail.tournament_name,
            event: EventRef {
                id: detail.event_id,
                name: detail.event_name,
            },
        },
    })
}

/// [`get_series`] for many ids, fetched concurrently. Fails if any one fails.
pub fn get_many_series<S: SeriesStore + ?Sized>(
    store: &S,
    ids: &[SeriesId],
    max_concurrency: usize,
) -> SidesResult<Vec<SeriesView>> {
    let tasks: Vec<_> = ids.iter().map(|id| move || get_series(store, id)).collect();
    try_join_all(tasks, max_concurrency)
}

fn group_by_key<T, K, F>(rows: Vec<T>, key: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut grouped: HashMap<K, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

/// Every event with its maps, tournaments, and their series.
///
/// All six listings are read concurrently. Children keep store order within
/// their parent.
pub fn get_events<S: SeriesStore + ?Sized>(store: &S) -> SidesResult<Vec<EventView>> {
    let ((events, tournaments, series), (participants, match_refs, maps), ()) = try_join3(
        || {
            try_join3(
                || Ok(store.events()?),
                || Ok(store.tournaments()?),
                || Ok(store.all_series()?),
            )
        },
        || {
            try_join3(
                || Ok(store.all_participants()?),
                || Ok(store.match_refs()?),
                || Ok(store.event_maps()?),
            )
        },
        || Ok(()),
    )?;

    let mut tournaments_by_event = group_by_key(tournaments, |t| t.event_id.clone());
    let mut series_by_tournament = group_by_key(series, |s| s.tournament_id.clone());
    let mut participants_by_series = group_by_key(participants, |p| p.series_id.clone());
    let mut matches_by_series = group_by_key(match_refs, |m| m.series_id.clone());
    let mut maps_by_event = group_by_key(maps, |m| m.event_id.clone());

    let views: Vec<EventView> = events
        .into_iter()
        .map(|event| {
            let tournaments = tournaments_by_event
                .remove(&event.id)
                .unwrap_or_default()
                .into_iter()
                .map(|tournament| TournamentView {
                    series: series_by_tournament
                        .remove(&tournament.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|series| SeriesSummary {
                            participants: participants_by_series
                                .remove(&series.id)
                                .unwrap_or_default()
                                .into_iter()
                                .map(|p| p.participant)
                                .collect(),
                            match_ids: matches_by_series
                                .remove(&series.id)
                                .unwrap_or_default()
                                .into_iter()
                                .map(|m| m.id)
                                .collect(),
                            id: series.id,
                            name: series.name,
                            played: series.played,
                        })
                        .collect(),
                    id: tournament.id,
                    name: tournament.name,
                })
                .collect();

            EventView {
                maps: maps_by_event.remove(&event.id).unwrap_or_default(),
                id: event.id,
                name: event.name,
                tournaments,
            }
        })
        .collect();

    log::debug!("assembled {} event views", views.len());
    Ok(views)
}
