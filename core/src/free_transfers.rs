//! Free-transfer reconstruction.
//!
//! Folds the ordered weekly history into the number of penalty-free
//! transfers a manager holds at the start of the open gameweek, and how
//! many of those are still unspent right now.
//!
//! RULES:
//!   - A new entry starts with `initial_free_transfers`.
//!   - Every completed gameweek consumes the free transfers it used,
//!     floors at zero, then grants one more, capped at the bank limit.
//!   - The open gameweek consumes but never grants.
//!   - A Wildcard or Free Hit week consumes nothing. Played in the open
//!     gameweek, it makes transfers unlimited for that week.
//!   - An upstream-reported limit beats reconstruction. Disagreement is
//!     reported as AmbiguousState, never as an error.

use crate::{
    config::SeasonRules,
    diagnostic::Diagnostic,
    records::{accept_ordered, chip_played_in, ChipKind, ChipUsageEvent, WeeklyRecord},
    types::Event,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transfers available without a points hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum FreeTransfers {
    Limited(u8),
    /// Wildcard or Free Hit active: no limit applies this gameweek.
    Unlimited,
}

impl FreeTransfers {
    pub fn count(&self) -> Option<u8> {
        match self {
            FreeTransfers::Limited(n) => Some(*n),
            FreeTransfers::Unlimited => None,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, FreeTransfers::Unlimited)
    }
}

impl fmt::Display for FreeTransfers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreeTransfers::Limited(n) => write!(f, "{n}"),
            FreeTransfers::Unlimited => write!(f, "Unlimited (chip active)"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSource {
    Reconstructed,
    Authoritative,
    ChipActive,
}

/// Balance after one completed gameweek was folded in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceStep {
    pub event:     Event,
    pub free_used: u32,
    pub balance:   u8,
}

/// Inputs besides the weekly history.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferContext<'a> {
    /// The gameweek currently open for transfers. None treats the most
    /// recent record as the open one.
    pub open_event:          Option<Event>,
    /// Transfer limit for the open gameweek as reported upstream.
    pub authoritative_limit: Option<u32>,
    /// Chip played in the open gameweek, when known from the picks.
    pub active_chip:         Option<ChipKind>,
    pub chips:               &'a [ChipUsageEvent],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeTransferOutcome {
    pub open_event:         Option<Event>,
    /// Balance at the start of the open gameweek, before its own activity.
    pub at_gameweek_start:  u8,
    /// What reconstruction alone produced for `at_gameweek_start`.
    pub reconstructed:      u8,
    /// Free transfers that can still be spent right now.
    pub available:          FreeTransfers,
    /// Penalty-free transfers already spent in the open gameweek.
    pub spent_this_week:    u32,
    pub source:             BalanceSource,
    pub steps:              Vec<BalanceStep>,
    pub diagnostics:        Vec<Diagnostic>,
}

/// Transfers in `record` that did not incur a hit.
pub fn free_transfers_used(record: &WeeklyRecord, rules: &SeasonRules) -> u32 {
    let made = record.transfers_made.max(0) as u32;
    if record.transfer_cost <= 0 {
        return made;
    }
    // A non-positive hit cost prices nothing; validation rejects such records.
    let paid = record.transfer_cost.checked_div(rules.hit_cost).unwrap_or(0).max(0) as u32;
    made.saturating_sub(paid)
}

/// One completed-gameweek step of the fold.
pub fn next_balance(balance: u8, free_used: u32, rules: &SeasonRules) -> u8 {
    let remaining = u32::from(balance).saturating_sub(free_used);
    (remaining + 1).min(u32::from(rules.max_banked_free_transfers)) as u8
}

pub fn accumulate(
    records: &[WeeklyRecord],
    ctx:     &TransferContext<'_>,
    rules:   &SeasonRules,
) -> FreeTransferOutcome {
    let cap = rules.max_banked_free_transfers;
    let (valid, mut diagnostics) = accept_ordered(records, rules);

    // Split into completed gameweeks and the open one.
    let (completed, open_record, open_event): (Vec<&WeeklyRecord>, Option<&WeeklyRecord>, Option<Event>) =
        match ctx.open_event {
            Some(open) => {
                let mut completed = Vec::new();
                let mut open_record = None;
                for record in &valid {
                    if record.event < open {
                        completed.push(record);
                    } else if record.event == open {
                        open_record = Some(record);
                    } else {
                        log::debug!("gw={} record is after open gameweek {open}, ignored", record.event);
                        diagnostics.push(Diagnostic::invalid(
                            Some(record.event),
                            format!("record is after the open gameweek {open}"),
                        ));
                    }
                }
                (completed, open_record, Some(open))
            }
            None => match valid.split_last() {
                Some((last, rest)) => (rest.iter().collect(), Some(last), Some(last.event)),
                None => (Vec::new(), None, None),
            },
        };

    let mut balance = rules.initial_free_transfers.min(cap);
    let mut steps = Vec::with_capacity(completed.len());
    for record in completed {
        let free_used = match chip_played_in(ctx.chips, record.event) {
            Some(chip) if chip.grants_unlimited_transfers() => 0,
            _ => free_transfers_used(record, rules),
        };
        balance = next_balance(balance, free_used, rules);
        steps.push(BalanceStep { event: record.event, free_used, balance });
    }
    let reconstructed = balance;

    let active_chip = ctx
        .active_chip
        .or_else(|| open_event.and_then(|e| chip_played_in(ctx.chips, e)));

    if let Some(chip) = active_chip.filter(|c| c.grants_unlimited_transfers()) {
        log::debug!("gw={open_event:?} {} active, transfers unlimited", chip.label());
        return FreeTransferOutcome {
            open_event,
            at_gameweek_start: reconstructed,
            reconstructed,
            available: FreeTransfers::Unlimited,
            spent_this_week: 0,
            source: BalanceSource::ChipActive,
            steps,
            diagnostics,
        };
    }

    let spent_this_week = open_record.map(|r| free_transfers_used(r, rules)).unwrap_or(0);

    let (at_gameweek_start, source) = match ctx.authoritative_limit {
        Some(limit) => {
            let clamped = limit.min(u32::from(cap)) as u8;
            if limit > u32::from(cap) {
                diagnostics.push(Diagnostic::ambiguous(
                    open_event,
                    format!("upstream transfer limit {limit} exceeds cap {cap}, clamped"),
                ));
            }
            if clamped != reconstructed {
                log::warn!(
                    "gw={open_event:?} free transfers disagree: reconstructed {reconstructed}, upstream {clamped}"
                );
                diagnostics.push(Diagnostic::ambiguous(
                    open_event,
                    format!(
                        "reconstructed {reconstructed} free transfers, upstream reports {clamped}; using upstream"
                    ),
                ));
            }
            (clamped, BalanceSource::Authoritative)
        }
        None => (reconstructed, BalanceSource::Reconstructed),
    };

    let available = u32::from(at_gameweek_start).saturating_sub(spent_this_week) as u8;

    FreeTransferOutcome {
        open_event,
        at_gameweek_start,
        reconstructed,
        available: FreeTransfers::Limited(available),
        spent_this_week,
        source,
        steps,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_transfers_do_not_count_as_free() {
        let rules = SeasonRules::default();
        assert_eq!(free_transfers_used(&WeeklyRecord::transfers(3, 2, 4), &rules), 1);
        assert_eq!(free_transfers_used(&WeeklyRecord::transfers(3, 3, 0), &rules), 3);
        assert_eq!(free_transfers_used(&WeeklyRecord::transfers(3, 1, 8), &rules), 0);
    }

    #[test]
    fn step_floors_then_grants_then_caps() {
        let rules = SeasonRules::default();
        assert_eq!(next_balance(1, 3, &rules), 1);
        assert_eq!(next_balance(5, 0, &rules), 5);
        assert_eq!(next_balance(4, 0, &rules), 5);
        assert_eq!(next_balance(2, 1, &rules), 2);
    }
}
