//! Squad snapshot: the composed, immutable state of one team at one
//! gameweek. This is the unit every downstream consumer reads.
//!
//! A snapshot is built fresh on every request and never mutated.
//! There is no snapshot history: the next request supersedes it.
//!
//! COMPOSITION ORDER (fixed):
//!   1. Catalogue check        (the only fatal condition)
//!   2. Picks selection        (latest, else previous gameweek, marked stale)
//!   3. Per-pick price and availability
//!   4. Free transfers         (history + open gameweek + upstream limit)
//!   5. Chip windows
//!   6. Transfer log

use crate::{
    availability::{classify, PlayerAvailability},
    chips::{track_chips, ChipWindow},
    config::SeasonRules,
    diagnostic::Diagnostic,
    error::{SeasonError, SeasonResult},
    free_transfers::{accumulate, FreeTransferOutcome, FreeTransfers, TransferContext},
    price::{resolve_price, PriceInfo},
    records::{
        chip_played_in, Catalogue, ChipKind, ChipUsageEvent, GameweekPicks, Position, RawPick,
        TransferRecord, WeeklyRecord, STARTING_SLOTS,
    },
    transfers::{transfer_log, TransferLog},
    types::{Event, PlayerId, Price, SeasonHalf, TeamId},
};
use serde::{Deserialize, Serialize};

/// Everything the builder needs, already fetched.
#[derive(Debug, Clone, Default)]
pub struct SnapshotInputs {
    pub team_id:             TeamId,
    pub target_event:        Event,
    /// Oldest first.
    pub records:             Vec<WeeklyRecord>,
    pub chips:               Vec<ChipUsageEvent>,
    pub latest_picks:        Option<GameweekPicks>,
    /// Only consulted when `latest_picks` is absent.
    pub previous_picks:      Option<GameweekPicks>,
    pub catalogue:           Option<Catalogue>,
    pub transfers:           Vec<TransferRecord>,
    pub authoritative_limit: Option<u32>,
    /// Findings from whoever gathered the inputs.
    pub diagnostics:         Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Staleness {
    Fresh,
    /// Upstream lagged; picks come from an earlier gameweek.
    StaleByOne { requested: Event, used: Event },
    NoPicks,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotPick {
    pub player:          PlayerId,
    pub name:            String,
    pub full_name:       String,
    pub club:            String,
    pub position:        Option<Position>,
    pub lineup_slot:     u8,
    pub is_starting:     bool,
    pub is_captain:      bool,
    pub is_vice_captain: bool,
    pub multiplier:      u8,
    /// None when the player is absent from the catalogue.
    pub price:           Option<PriceInfo>,
    pub fitness_percent: Option<u8>,
    pub news:            String,
    pub availability:    PlayerAvailability,
    pub form:            f64,
    pub total_points:    i32,
    pub minutes:         u32,
    pub ownership:       f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SquadSnapshot {
    pub team_id:         TeamId,
    pub requested_event: Event,
    /// Gameweek the picks belong to.
    pub event:           Option<Event>,
    pub staleness:       Staleness,
    pub season_half:     SeasonHalf,
    /// Ordered by lineup slot.
    pub picks:           Vec<SnapshotPick>,
    pub bank:            Price,
    pub squad_value:     Price,
    pub free_transfers:  FreeTransferOutcome,
    pub chips:           ChipWindow,
    pub active_chip:     Option<ChipKind>,
    pub captains:        Vec<PlayerId>,
    pub vice_captains:   Vec<PlayerId>,
    pub transfers:       TransferLog,
    /// Every finding from every component, in composition order.
    pub diagnostics:     Vec<Diagnostic>,
}

impl SquadSnapshot {
    pub fn starting_xi(&self) -> impl Iterator<Item = &SnapshotPick> {
        self.picks.iter().filter(|p| p.is_starting)
    }

    pub fn bench(&self) -> impl Iterator<Item = &SnapshotPick> {
        self.picks.iter().filter(|p| !p.is_starting)
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.staleness, Staleness::StaleByOne { .. })
    }

    pub fn available_free_transfers(&self) -> FreeTransfers {
        self.free_transfers.available
    }

    pub fn pick(&self, player: PlayerId) -> Option<&SnapshotPick> {
        self.picks.iter().find(|p| p.player == player)
    }

    pub fn owned_players(&self) -> std::collections::HashSet<PlayerId> {
        self.picks.iter().map(|p| p.player).collect()
    }
}

fn compose_pick(
    raw:         &RawPick,
    catalogue:   &Catalogue,
    event:       Event,
    diagnostics: &mut Vec<Diagnostic>,
) -> SnapshotPick {
    let entry = catalogue.player(raw.element);
    if entry.is_none() {
        diagnostics.push(Diagnostic::missing(
            Some(event),
            format!("player {} not in catalogue", raw.element),
        ));
    }

    let price = entry.map(|p| resolve_price(raw.selling_price, p.now_cost));
    if price.is_some_and(|p| !p.sell_price_reported()) {
        diagnostics.push(Diagnostic::missing(
            Some(event),
            format!("no selling price for player {}, using market price", raw.element),
        ));
    }

    let fitness_percent = entry.and_then(|p| p.fitness_percent);
    let news = entry.map(|p| p.news.clone()).unwrap_or_default();

    SnapshotPick {
        player:          raw.element,
        name:            entry.map(|p| p.web_name.clone()).unwrap_or_else(|| "Unknown".into()),
        full_name:       entry.map(|p| p.full_name()).unwrap_or_default(),
        club:            entry
            .and_then(|p| catalogue.club(p.club))
            .map(|c| c.short_name.clone())
            .unwrap_or_else(|| "?".into()),
        position:        entry.map(|p| p.position),
        lineup_slot:     raw.lineup_slot,
        is_starting:     raw.lineup_slot <= STARTING_SLOTS,
        is_captain:      raw.is_captain,
        is_vice_captain: raw.is_vice_captain,
        multiplier:      raw.multiplier,
        price,
        availability:    classify(fitness_percent, &news),
        fitness_percent,
        news,
        form:            entry.map(|p| p.form).unwrap_or(0.0),
        total_points:    entry.map(|p| p.total_points).unwrap_or(0),
        minutes:         entry.map(|p| p.minutes).unwrap_or(0),
        ownership:       entry.map(|p| p.selected_by_percent).unwrap_or(0.0),
    }
}

/// Pick the picks response to build from, falling back one gameweek.
fn select_picks<'a>(
    inputs:      &'a SnapshotInputs,
    diagnostics: &mut Vec<Diagnostic>,
) -> (Option<&'a GameweekPicks>, Staleness) {
    let requested = inputs.target_event;
    match (&inputs.latest_picks, &inputs.previous_picks) {
        (Some(latest), _) => (Some(latest), Staleness::Fresh),
        (None, Some(previous)) => {
            log::warn!(
                "gw={requested} team={} picks missing, falling back to gw={}",
                inputs.team_id,
                previous.event
            );
            diagnostics.push(Diagnostic::missing(
                Some(requested),
                format!("picks not yet published, using gameweek {}", previous.event),
            ));
            if previous.event.checked_add(1) != Some(requested) {
                diagnostics.push(Diagnostic::missing(
                    Some(requested),
                    format!("fallback picks are from gameweek {}, not the one before", previous.event),
                ));
            }
            (Some(previous), Staleness::StaleByOne { requested, used: previous.event })
        }
        (None, None) => {
            log::warn!("gw={requested} team={} no picks available", inputs.team_id);
            diagnostics.push(Diagnostic::missing(Some(requested), "no picks for this or the previous gameweek"));
            (None, Staleness::NoPicks)
        }
    }
}

pub fn build_squad_snapshot(inputs: &SnapshotInputs, rules: &SeasonRules) -> SeasonResult<SquadSnapshot> {
    let team_id = inputs.team_id;
    let target = inputs.target_event;

    let catalogue = match &inputs.catalogue {
        Some(c) if !c.is_empty() => c,
        _ => return Err(SeasonError::CatalogueMissing { team_id }),
    };

    let mut diagnostics = inputs.diagnostics.clone();

    // ── Picks ──────────────────────────────────────
    let (chosen, staleness) = select_picks(inputs, &mut diagnostics);
    let picks_event = chosen.map(|p| p.event);

    let mut raw_picks: Vec<&RawPick> = Vec::new();
    for raw in chosen.map(|p| p.picks.as_slice()).unwrap_or_default() {
        match raw.validate() {
            Ok(()) => raw_picks.push(raw),
            Err(e) => {
                log::debug!("gw={target} team={team_id} pick rejected: {e}");
                diagnostics.push(Diagnostic::from_error(picks_event, &e));
            }
        }
    }
    raw_picks.sort_by_key(|p| p.lineup_slot);

    let pick_event = picks_event.unwrap_or(target);
    let picks: Vec<SnapshotPick> = raw_picks
        .into_iter()
        .map(|raw| compose_pick(raw, catalogue, pick_event, &mut diagnostics))
        .collect();

    let captains = picks.iter().filter(|p| p.is_captain).map(|p| p.player).collect();
    let vice_captains = picks.iter().filter(|p| p.is_vice_captain).map(|p| p.player).collect();

    // ── History ────────────────────────────────────
    // Fresh picks may carry the open gameweek's row before history does.
    let mut records = inputs.records.clone();
    if let Some(row) = inputs.latest_picks.as_ref().and_then(|p| p.entry_history.as_ref()) {
        if !records.iter().any(|r| r.event == row.event) {
            records.push(row.clone());
        }
    }

    let active_chip = match staleness {
        Staleness::Fresh => inputs.latest_picks.as_ref().and_then(|p| p.active_chip),
        _ => None,
    }
    .or_else(|| chip_played_in(&inputs.chips, target));

    // ── Free transfers ─────────────────────────────
    let ctx = TransferContext {
        open_event:          Some(target),
        authoritative_limit: inputs.authoritative_limit,
        active_chip,
        chips:               &inputs.chips,
    };
    let free_transfers = accumulate(&records, &ctx, rules);
    diagnostics.extend(free_transfers.diagnostics.iter().cloned());

    // ── Money ──────────────────────────────────────
    let money_row = chosen
        .and_then(|p| p.entry_history.as_ref())
        .or_else(|| records.iter().filter(|r| r.event <= target).max_by_key(|r| r.event));
    let (bank, squad_value) = match money_row {
        Some(row) => (row.bank, row.squad_value),
        None => {
            diagnostics.push(Diagnostic::missing(Some(target), "no history row for bank, assuming zero"));
            (Price::ZERO, Price::ZERO)
        }
    };

    // ── Chips ──────────────────────────────────────
    let chips = track_chips(&inputs.chips, target, rules);
    diagnostics.extend(chips.diagnostics.iter().cloned());

    // ── Transfer log ───────────────────────────────
    let transfers = transfer_log(&inputs.transfers, target, catalogue, rules.recent_transfer_limit);

    log::info!(
        "gw={target} team={team_id} snapshot: {} picks, bank {bank}, free transfers {}, {:?}, {} diagnostics",
        picks.len(),
        free_transfers.available,
        staleness,
        diagnostics.len()
    );

    Ok(SquadSnapshot {
        team_id,
        requested_event: target,
        event: picks_event,
        staleness,
        season_half: SeasonHalf::of(target),
        picks,
        bank,
        squad_value,
        free_transfers,
        chips,
        active_chip,
        captains,
        vice_captains,
        transfers,
        diagnostics,
    })
}
