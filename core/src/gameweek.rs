//! Gameweek calendar: which gameweek is current and which is next.
//!
//! Upstream flips `is_next` some hours after a deadline passes. Until
//! it does, the flagged "next" gameweek is already locked; the first
//! unfinished gameweek by id is the real upcoming one.

use crate::types::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameweekInfo {
    pub id:            Event,
    pub name:          String,
    pub deadline_time: Option<DateTime<Utc>>,
    pub is_current:    bool,
    pub is_next:       bool,
    pub finished:      bool,
}

impl GameweekInfo {
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.deadline_time.is_some_and(|d| d < now)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameweekWindow {
    pub current: Option<GameweekInfo>,
    pub next:    Option<GameweekInfo>,
}

impl GameweekWindow {
    /// The gameweek managers are preparing for: next if known, else current.
    pub fn target_event(&self) -> Option<Event> {
        self.next.as_ref().or(self.current.as_ref()).map(|g| g.id)
    }

    /// Hours until the target gameweek's deadline. Negative once passed.
    pub fn hours_to_deadline(&self, now: DateTime<Utc>) -> Option<f64> {
        let target = self.next.as_ref().or(self.current.as_ref())?;
        let deadline = target.deadline_time?;
        Some((deadline - now).num_seconds() as f64 / 3600.0)
    }
}

pub fn resolve_window(events: &[GameweekInfo], now: DateTime<Utc>) -> GameweekWindow {
    let current = events.iter().find(|e| e.is_current).cloned();
    let mut next = events.iter().find(|e| e.is_next).cloned();

    if next.as_ref().is_some_and(|n| n.deadline_passed(now)) {
        let upcoming = events
            .iter()
            .filter(|e| !e.finished && !e.deadline_passed(now))
            .min_by_key(|e| e.id)
            .cloned();
        if let Some(upcoming) = upcoming {
            log::debug!(
                "gw={} flagged next but deadline passed, using gw={}",
                next.as_ref().map(|n| n.id).unwrap_or_default(),
                upcoming.id
            );
            next = Some(upcoming);
        }
    }

    GameweekWindow { current, next }
}
