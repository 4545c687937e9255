//! Fetching through a SeasonSource: which failures are fatal and which
//! only become diagnostics.

use gaffer_core::{
    config::SeasonRules,
    diagnostic::{count_kind, DiagnosticKind},
    error::{SeasonError, SeasonResult},
    free_transfers::{BalanceSource, FreeTransfers},
    records::{
        Catalogue, ChipUsageEvent, ClubEntry, GameweekPicks, PlayerEntry, Position, RawPick, TransferRecord,
        WeeklyRecord,
    },
    snapshot::Staleness,
    source::{collect_inputs, snapshot_from_source, SeasonSource, SnapshotRequest},
    types::{Event, Price, TeamId},
};
use std::{cell::RefCell, collections::HashMap, io};

const TEAM: TeamId = 77;

#[derive(Default)]
struct FakeSource {
    catalogue:         Option<Catalogue>,
    catalogue_fails:   bool,
    records:           Vec<WeeklyRecord>,
    picks:             HashMap<Event, GameweekPicks>,
    transfers_fail:    bool,
    limit:             Option<u32>,
    picks_requested:   RefCell<Vec<Event>>,
}

fn fetch_failed() -> SeasonError {
    SeasonError::Io(io::Error::new(io::ErrorKind::Other, "connection reset"))
}

impl SeasonSource for FakeSource {
    fn catalogue(&self) -> SeasonResult<Option<Catalogue>> {
        if self.catalogue_fails {
            return Err(fetch_failed());
        }
        Ok(self.catalogue.clone())
    }

    fn weekly_records(&self, _team_id: TeamId) -> SeasonResult<Vec<WeeklyRecord>> {
        Ok(self.records.clone())
    }

    fn chip_events(&self, _team_id: TeamId) -> SeasonResult<Vec<ChipUsageEvent>> {
        Ok(Vec::new())
    }

    fn picks(&self, _team_id: TeamId, event: Event) -> SeasonResult<Option<GameweekPicks>> {
        self.picks_requested.borrow_mut().push(event);
        Ok(self.picks.get(&event).cloned())
    }

    fn transfers(&self, _team_id: TeamId) -> SeasonResult<Vec<TransferRecord>> {
        if self.transfers_fail {
            return Err(fetch_failed());
        }
        Ok(Vec::new())
    }

    fn transfer_limit(&self, _team_id: TeamId) -> SeasonResult<Option<u32>> {
        Ok(self.limit)
    }
}

fn catalogue() -> Catalogue {
    let players = (1..=15)
        .map(|id| PlayerEntry {
            id,
            web_name: format!("P{id}"),
            first_name: String::new(),
            second_name: String::new(),
            club: 1,
            position: Position::Midfielder,
            now_cost: Price::from_tenths(55),
            fitness_percent: None,
            news: String::new(),
            form: 2.0,
            total_points: 10,
            minutes: 300,
            selected_by_percent: 1.0,
        })
        .collect();
    Catalogue::new(players, vec![ClubEntry { id: 1, name: "Club".into(), short_name: "CLB".into() }])
}

fn picks(event: Event) -> GameweekPicks {
    let picks = (1..=15u8)
        .map(|slot| RawPick {
            element: u32::from(slot),
            lineup_slot: slot,
            is_captain: slot == 1,
            is_vice_captain: slot == 2,
            multiplier: if slot > 11 { 0 } else { 1 },
            selling_price: Some(Price::from_tenths(54)),
        })
        .collect();
    GameweekPicks { event, picks, active_chip: None, entry_history: None }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn source() -> FakeSource {
    init_logging();
    FakeSource {
        catalogue: Some(catalogue()),
        records: (1..=5).map(|gw| WeeklyRecord::transfers(gw, 1, 0)).collect(),
        ..FakeSource::default()
    }
}

fn request(target_event: Event) -> SnapshotRequest {
    SnapshotRequest { team_id: TEAM, target_event }
}

#[test]
fn previous_picks_only_fetched_when_latest_missing() {
    let mut src = source();
    src.picks.insert(6, picks(6));
    collect_inputs(&src, &request(6)).unwrap();
    assert_eq!(*src.picks_requested.borrow(), vec![6]);

    let mut src = source();
    src.picks.insert(5, picks(5));
    let inputs = collect_inputs(&src, &request(6)).unwrap();
    assert_eq!(*src.picks_requested.borrow(), vec![6, 5]);
    assert!(inputs.latest_picks.is_none());
    assert_eq!(inputs.previous_picks.as_ref().map(|p| p.event), Some(5));
}

#[test]
fn lagging_picks_give_a_stale_snapshot() {
    let mut src = source();
    src.picks.insert(5, picks(5));
    let snap = snapshot_from_source(&src, &request(6), &SeasonRules::default()).unwrap();

    assert_eq!(snap.staleness, Staleness::StaleByOne { requested: 6, used: 5 });
    assert_eq!(snap.picks.len(), 15);
    assert!(count_kind(&snap.diagnostics, DiagnosticKind::MissingData) >= 1);
}

#[test]
fn failed_transfer_log_fetch_is_only_a_diagnostic() {
    let mut src = source();
    src.picks.insert(6, picks(6));
    src.transfers_fail = true;
    let snap = snapshot_from_source(&src, &request(6), &SeasonRules::default()).unwrap();

    assert!(snap.transfers.this_week.is_empty());
    assert!(snap
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::MissingData && d.message.contains("transfer log")));
}

#[test]
fn catalogue_failures_are_fatal() {
    let mut src = source();
    src.catalogue = None;
    assert!(matches!(
        collect_inputs(&src, &request(6)),
        Err(SeasonError::CatalogueMissing { team_id: TEAM })
    ));

    let mut src = source();
    src.catalogue_fails = true;
    let err = snapshot_from_source(&src, &request(6), &SeasonRules::default()).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn reported_limit_overrides_reconstruction() {
    let mut src = source();
    src.picks.insert(6, picks(6));
    src.limit = Some(3);
    let snap = snapshot_from_source(&src, &request(6), &SeasonRules::default()).unwrap();

    // One transfer a week spends the weekly grant, so the balance sits at 1.
    assert_eq!(snap.free_transfers.reconstructed, 1);
    assert_eq!(snap.available_free_transfers(), FreeTransfers::Limited(3));
    assert_eq!(snap.free_transfers.source, BalanceSource::Authoritative);
    assert_eq!(count_kind(&snap.diagnostics, DiagnosticKind::AmbiguousState), 1);
}
