//! Season performance summary over the weekly history.

use crate::{
    config::SeasonRules,
    diagnostic::Diagnostic,
    records::{accept_ordered, chip_played_in, ChipKind, ChipUsageEvent, WeeklyRecord},
    types::{Event, Price},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameweekRow {
    pub event:           Event,
    pub points:          i32,
    /// Points before the transfer hit was deducted.
    pub gross_points:    i32,
    pub total_points:    i32,
    pub overall_rank:    Option<u64>,
    pub bank:            Price,
    pub squad_value:     Price,
    pub transfers_made:  i32,
    pub transfer_cost:   i32,
    pub points_on_bench: i32,
    pub chip:            Option<ChipKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonSummary {
    pub rows:               Vec<GameweekRow>,
    pub total_points:       i32,
    pub average_points:     f64,
    pub best:               Option<GameweekRow>,
    pub worst:              Option<GameweekRow>,
    pub gameweeks_played:   usize,
    pub total_hit_cost:     i32,
    pub total_bench_points: i32,
    pub diagnostics:        Vec<Diagnostic>,
}

pub fn season_summary(records: &[WeeklyRecord], chips: &[ChipUsageEvent], rules: &SeasonRules) -> SeasonSummary {
    let (valid, diagnostics) = accept_ordered(records, rules);

    let rows: Vec<GameweekRow> = valid
        .iter()
        .map(|r| GameweekRow {
            event:           r.event,
            points:          r.points,
            gross_points:    r.points + r.transfer_cost,
            total_points:    r.total_points,
            overall_rank:    r.overall_rank,
            bank:            r.bank,
            squad_value:     r.squad_value,
            transfers_made:  r.transfers_made,
            transfer_cost:   r.transfer_cost,
            points_on_bench: r.points_on_bench,
            chip:            chip_played_in(chips, r.event),
        })
        .collect();

    let played = rows.len();
    let sum: i32 = rows.iter().map(|r| r.points).sum();
    let average_points = if played == 0 {
        0.0
    } else {
        (f64::from(sum) / played as f64 * 10.0).round() / 10.0
    };

    // Earliest gameweek wins ties in both directions.
    let best = rows.iter().fold(None::<&GameweekRow>, |acc, r| match acc {
        Some(b) if b.points >= r.points => Some(b),
        _ => Some(r),
    });
    let worst = rows.iter().fold(None::<&GameweekRow>, |acc, r| match acc {
        Some(w) if w.points <= r.points => Some(w),
        _ => Some(r),
    });

    SeasonSummary {
        total_points: rows.last().map(|r| r.total_points).unwrap_or(0),
        average_points,
        best: best.cloned(),
        worst: worst.cloned(),
        gameweeks_played: played,
        total_hit_cost: rows.iter().map(|r| r.transfer_cost).sum(),
        total_bench_points: rows.iter().map(|r| r.points_on_bench).sum(),
        rows,
        diagnostics,
    }
}
