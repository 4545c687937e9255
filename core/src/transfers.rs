//! Transfer log resolved against the catalogue.

use crate::{
    records::{Catalogue, TransferRecord},
    types::{Event, PlayerId, Price},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferLine {
    pub event:      Event,
    pub player_in:  PlayerId,
    pub name_in:    String,
    pub cost_in:    Price,
    pub player_out: PlayerId,
    pub name_out:   String,
    pub cost_out:   Price,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransferLog {
    /// Transfers made in the target gameweek.
    pub this_week: Vec<TransferLine>,
    /// Latest transfers across the season, newest first.
    pub recent:    Vec<TransferLine>,
}

fn line(record: &TransferRecord, catalogue: &Catalogue) -> TransferLine {
    TransferLine {
        event:      record.event,
        player_in:  record.element_in,
        name_in:    catalogue.player_name(record.element_in),
        cost_in:    record.element_in_cost,
        player_out: record.element_out,
        name_out:   catalogue.player_name(record.element_out),
        cost_out:   record.element_out_cost,
    }
}

pub fn transfer_log(
    records:      &[TransferRecord],
    target_event: Event,
    catalogue:    &Catalogue,
    recent_limit: usize,
) -> TransferLog {
    // Newest first; stable sort keeps upstream order within a gameweek.
    let mut ordered: Vec<&TransferRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.event.cmp(&a.event));

    TransferLog {
        this_week: ordered
            .iter()
            .filter(|r| r.event == target_event)
            .map(|r| line(r, catalogue))
            .collect(),
        recent: ordered
            .iter()
            .take(recent_limit)
            .map(|r| line(r, catalogue))
            .collect(),
    }
}
