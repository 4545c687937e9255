//! Typed input records. Everything the engine consumes arrives in one
//! of these shapes, already converted from upstream payloads by the
//! `upstream` module.

use crate::{
    config::SeasonRules,
    diagnostic::Diagnostic,
    error::{reject_event, SeasonError, SeasonResult},
    types::{Event, PlayerId, Price},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Weekly history ─────────────────────────────────────────────────

/// One played gameweek for a team. Counts are signed so malformed
/// upstream rows can be represented and rejected rather than wrapped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyRecord {
    pub event:           Event,
    pub points:          i32,
    pub total_points:    i32,
    pub transfers_made:  i32,
    pub transfer_cost:   i32,
    pub bank:            Price,
    pub squad_value:     Price,
    pub points_on_bench: i32,
    pub overall_rank:    Option<u64>,
}

impl WeeklyRecord {
    /// A record with only the transfer fields set. Handy for callers
    /// that only care about free-transfer reconstruction.
    pub fn transfers(event: Event, transfers_made: i32, transfer_cost: i32) -> Self {
        Self {
            event,
            points: 0,
            total_points: 0,
            transfers_made,
            transfer_cost,
            bank: Price::ZERO,
            squad_value: Price::ZERO,
            points_on_bench: 0,
            overall_rank: None,
        }
    }

    pub fn validate(&self, rules: &SeasonRules) -> SeasonResult<()> {
        if self.event == 0 || self.event > rules.last_event {
            return Err(reject_event(self.event, "event number out of season range"));
        }
        if self.transfers_made < 0 {
            return Err(reject_event(self.event, format!("negative transfers_made {}", self.transfers_made)));
        }
        if self.transfer_cost < 0 {
            return Err(reject_event(self.event, format!("negative transfer_cost {}", self.transfer_cost)));
        }
        if self.transfer_cost > 0 && rules.hit_cost <= 0 {
            return Err(reject_event(
                self.event,
                format!("transfer_cost {} cannot be split into hits of {}", self.transfer_cost, rules.hit_cost),
            ));
        }
        if self.transfer_cost.checked_rem(rules.hit_cost).is_some_and(|r| r != 0) {
            return Err(reject_event(
                self.event,
                format!("transfer_cost {} is not a multiple of {}", self.transfer_cost, rules.hit_cost),
            ));
        }
        if self.bank.tenths() < 0 {
            return Err(reject_event(self.event, format!("negative bank {}", self.bank)));
        }
        Ok(())
    }
}

/// Keep the well-formed records in strictly ascending event order.
/// Each rejected row yields one InvalidInput diagnostic; the rest survive.
pub fn accept_ordered(records: &[WeeklyRecord], rules: &SeasonRules) -> (Vec<WeeklyRecord>, Vec<Diagnostic>) {
    let mut kept: Vec<WeeklyRecord> = Vec::with_capacity(records.len());
    let mut diagnostics = Vec::new();

    for record in records {
        let verdict = record.validate(rules).and_then(|_| match kept.last() {
            Some(prev) if record.event <= prev.event => Err(reject_event(
                record.event,
                format!("out of order after gameweek {}", prev.event),
            )),
            _ => Ok(()),
        });

        match verdict {
            Ok(()) => kept.push(record.clone()),
            Err(e) => {
                log::debug!("gw={} weekly record rejected: {e}", record.event);
                diagnostics.push(Diagnostic::from_error(Some(record.event), &e));
            }
        }
    }

    (kept, diagnostics)
}

// ── Chips ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ChipKind {
    Wildcard,
    FreeHit,
    BenchBoost,
    TripleCaptain,
}

impl ChipKind {
    pub const ALL: [ChipKind; 4] = [
        ChipKind::Wildcard,
        ChipKind::FreeHit,
        ChipKind::BenchBoost,
        ChipKind::TripleCaptain,
    ];

    /// Parse the upstream chip name.
    pub fn from_api(name: &str) -> Option<Self> {
        match name {
            "wildcard" => Some(ChipKind::Wildcard),
            "freehit" => Some(ChipKind::FreeHit),
            "bboost" => Some(ChipKind::BenchBoost),
            "3xc" => Some(ChipKind::TripleCaptain),
            _ => None,
        }
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            ChipKind::Wildcard => "wildcard",
            ChipKind::FreeHit => "freehit",
            ChipKind::BenchBoost => "bboost",
            ChipKind::TripleCaptain => "3xc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChipKind::Wildcard => "Wildcard",
            ChipKind::FreeHit => "Free Hit",
            ChipKind::BenchBoost => "Bench Boost",
            ChipKind::TripleCaptain => "Triple Captain",
        }
    }

    /// Chips that lift the transfer limit for the week they are played.
    pub fn grants_unlimited_transfers(&self) -> bool {
        matches!(self, ChipKind::Wildcard | ChipKind::FreeHit)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            ChipKind::Wildcard => 0,
            ChipKind::FreeHit => 1,
            ChipKind::BenchBoost => 2,
            ChipKind::TripleCaptain => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChipUsageEvent {
    pub chip:  ChipKind,
    pub event: Event,
}

impl ChipUsageEvent {
    pub fn new(chip: ChipKind, event: Event) -> Self {
        Self { chip, event }
    }
}

/// The chip played in a given gameweek, if any. First match wins when
/// upstream reports more than one.
pub fn chip_played_in(chips: &[ChipUsageEvent], event: Event) -> Option<ChipKind> {
    chips.iter().find(|c| c.event == event).map(|c| c.chip)
}

// ── Picks ──────────────────────────────────────────────────────────

/// Slots 1-11 start, 12-15 sit on the bench.
pub const STARTING_SLOTS: u8 = 11;
pub const SQUAD_SIZE: u8 = 15;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawPick {
    pub element:         PlayerId,
    pub lineup_slot:     u8,
    pub is_captain:      bool,
    pub is_vice_captain: bool,
    pub multiplier:      u8,
    /// Absent for some players transferred in this gameweek.
    pub selling_price:   Option<Price>,
}

impl RawPick {
    pub fn validate(&self) -> SeasonResult<()> {
        if self.lineup_slot == 0 || self.lineup_slot > SQUAD_SIZE {
            return Err(SeasonError::invalid(
                format!("pick for player {}", self.element),
                format!("lineup slot {} outside 1..={SQUAD_SIZE}", self.lineup_slot),
            ));
        }
        Ok(())
    }
}

/// One gameweek's picks response for a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameweekPicks {
    pub event:         Event,
    pub picks:         Vec<RawPick>,
    pub active_chip:   Option<ChipKind>,
    pub entry_history: Option<WeeklyRecord>,
}

// ── Transfers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferRecord {
    pub event:            Event,
    pub element_in:       PlayerId,
    pub element_in_cost:  Price,
    pub element_out:      PlayerId,
    pub element_out_cost: Price,
    pub time:             Option<DateTime<Utc>>,
}

// ── Reference catalogue ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    #[serde(rename = "GKP")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    /// Upstream `element_type`: 1=GKP, 2=DEF, 3=MID, 4=FWD.
    pub fn from_element_type(element_type: u8) -> Option<Self> {
        match element_type {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    pub fn short(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClubEntry {
    pub id:         u32,
    pub name:       String,
    pub short_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerEntry {
    pub id:                  PlayerId,
    pub web_name:            String,
    pub first_name:          String,
    pub second_name:         String,
    pub club:                u32,
    pub position:            Position,
    pub now_cost:            Price,
    /// Chance of playing next round, 0-100. None means no flag set.
    pub fitness_percent:     Option<u8>,
    pub news:                String,
    pub form:                f64,
    pub total_points:        i32,
    pub minutes:             u32,
    pub selected_by_percent: f64,
}

impl PlayerEntry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.second_name).trim().to_string()
    }
}

/// Players and clubs reference data, keyed by upstream id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogue {
    pub players: HashMap<PlayerId, PlayerEntry>,
    pub clubs:   HashMap<u32, ClubEntry>,
}

impl Catalogue {
    pub fn new(players: Vec<PlayerEntry>, clubs: Vec<ClubEntry>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
            clubs: clubs.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerEntry> {
        self.players.get(&id)
    }

    pub fn club(&self, id: u32) -> Option<&ClubEntry> {
        self.clubs.get(&id)
    }

    /// Display name for a player, "?" when unknown.
    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id).map(|p| p.web_name.clone()).unwrap_or_else(|| "?".into())
    }
}
