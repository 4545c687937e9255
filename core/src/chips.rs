//! Chip windows: which chips are still playable in each season half.
//!
//! Every chip kind is available once in GW1-19 and once in GW20-38.
//! Using it in one half never touches the other half. Availability only
//! ever goes from true to false; duplicate usage events are harmless.

use crate::{
    config::SeasonRules,
    diagnostic::Diagnostic,
    records::{ChipKind, ChipUsageEvent},
    types::{Event, SeasonHalf},
};
use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Serialized as `{"wildcard": {"first": true, "second": false}, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipAvailability {
    /// Indexed by ChipKind, then SeasonHalf.
    slots: [[bool; 2]; 4],
}

impl Default for ChipAvailability {
    fn default() -> Self {
        Self { slots: [[true; 2]; 4] }
    }
}

impl ChipAvailability {
    pub fn is_available(&self, chip: ChipKind, half: SeasonHalf) -> bool {
        self.slots[chip.index()][half.index()]
    }

    /// Returns true if this call flipped the slot.
    pub fn mark_used(&mut self, chip: ChipKind, half: SeasonHalf) -> bool {
        let slot = &mut self.slots[chip.index()][half.index()];
        let was = *slot;
        *slot = false;
        was
    }

    pub fn available_in(&self, half: SeasonHalf) -> Vec<ChipKind> {
        ChipKind::ALL
            .into_iter()
            .filter(|chip| self.is_available(*chip, half))
            .collect()
    }

    /// All (kind, half, available) triples in catalogue order.
    pub fn entries(&self) -> Vec<(ChipKind, SeasonHalf, bool)> {
        ChipKind::ALL
            .into_iter()
            .flat_map(|chip| SeasonHalf::ALL.into_iter().map(move |half| (chip, half)))
            .map(|(chip, half)| (chip, half, self.is_available(chip, half)))
            .collect()
    }
}

impl Serialize for ChipAvailability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ChipKind::ALL.len()))?;
        for chip in ChipKind::ALL {
            let halves: BTreeMap<SeasonHalf, bool> =
                SeasonHalf::ALL.into_iter().map(|half| (half, self.is_available(chip, half))).collect();
            map.serialize_entry(&chip, &halves)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChipAvailability {
    /// Slots absent from the input stay available.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let table = BTreeMap::<ChipKind, BTreeMap<SeasonHalf, bool>>::deserialize(deserializer)?;
        let mut out = Self::default();
        for (chip, halves) in table {
            for (half, available) in halves {
                if !available {
                    out.mark_used(chip, half);
                }
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChipWindow {
    pub availability: ChipAvailability,
    pub current_half: SeasonHalf,
    pub diagnostics:  Vec<Diagnostic>,
}

impl ChipWindow {
    /// Chips that can be recommended for the half the current gameweek is in.
    pub fn playable_now(&self) -> Vec<ChipKind> {
        self.availability.available_in(self.current_half)
    }
}

pub fn track_chips(chips: &[ChipUsageEvent], current_event: Event, rules: &SeasonRules) -> ChipWindow {
    let mut availability = ChipAvailability::default();
    let mut diagnostics = Vec::new();

    for usage in chips {
        if usage.event == 0 || usage.event > rules.last_event {
            log::debug!("gw={} chip {} rejected: event out of range", usage.event, usage.chip.api_name());
            diagnostics.push(Diagnostic::invalid(
                Some(usage.event),
                format!("{} usage at out-of-range gameweek", usage.chip.label()),
            ));
            continue;
        }
        let half = SeasonHalf::of(usage.event);
        if !availability.mark_used(usage.chip, half) {
            log::debug!("gw={} duplicate {} usage in {}", usage.event, usage.chip.label(), half.label());
        }
    }

    ChipWindow {
        availability,
        current_half: SeasonHalf::of(current_event),
        diagnostics,
    }
}
