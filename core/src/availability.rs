//! Player availability classification from fitness signals.
//!
//! Rules are evaluated in a fixed order and the first match wins.
//! Numeric fitness outranks generic note text once injury language is
//! absent, so the order is part of the contract.

use serde::{Deserialize, Serialize};

/// Decreasing fitness confidence, Available first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAvailability {
    Available,
    MinorConcern,
    Doubt,
    MajorDoubt,
    Out,
    Suspended,
}

impl PlayerAvailability {
    pub const ALL: [PlayerAvailability; 6] = [
        PlayerAvailability::Available,
        PlayerAvailability::MinorConcern,
        PlayerAvailability::Doubt,
        PlayerAvailability::MajorDoubt,
        PlayerAvailability::Out,
        PlayerAvailability::Suspended,
    ];

    /// Out, suspended or too unlikely to play to recommend buying.
    pub fn excludes_from_market(&self) -> bool {
        matches!(
            self,
            PlayerAvailability::MajorDoubt | PlayerAvailability::Out | PlayerAvailability::Suspended
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerAvailability::Available => "available",
            PlayerAvailability::MinorConcern => "minor concern",
            PlayerAvailability::Doubt => "doubt",
            PlayerAvailability::MajorDoubt => "major doubt",
            PlayerAvailability::Out => "out",
            PlayerAvailability::Suspended => "suspended",
        }
    }
}

pub fn classify(fitness_percent: Option<u8>, status_note: &str) -> PlayerAvailability {
    let note = status_note.to_lowercase();
    let suspended = note.contains("suspended");

    if fitness_percent == Some(0) || suspended {
        return if suspended {
            PlayerAvailability::Suspended
        } else {
            PlayerAvailability::Out
        };
    }
    if note.contains("injured") && fitness_percent.map_or(true, |f| f <= 25) {
        return PlayerAvailability::Out;
    }
    match fitness_percent {
        Some(f) if f < 25 => return PlayerAvailability::MajorDoubt,
        Some(f) if f < 75 => return PlayerAvailability::Doubt,
        _ => {}
    }
    if !status_note.trim().is_empty() {
        return PlayerAvailability::MinorConcern;
    }
    PlayerAvailability::Available
}
