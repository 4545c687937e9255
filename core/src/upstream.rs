//! Upstream payload shapes and their conversion into typed records.
//!
//! RULE: Dynamic payloads stop here. Everything past this module works
//! on validated, typed records. Rows that cannot be typed are dropped
//! with an InvalidInput diagnostic; the rest of the payload survives.
//!
//! Prices arrive as integer tenths of a million. Some numeric fields
//! (`form`, `selected_by_percent`) arrive as strings.

use crate::{
    diagnostic::Diagnostic,
    gameweek::GameweekInfo,
    records::{
        Catalogue, ChipKind, ChipUsageEvent, ClubEntry, GameweekPicks, PlayerEntry, Position, RawPick,
        TransferRecord, WeeklyRecord,
    },
    types::{Event, PlayerId, Price},
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Accept `"5.2"`, `5.2`, or null.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A payload list typed one row at a time. A row that does not fit `T`
/// is set aside in `rejected` instead of failing the whole payload.
#[derive(Debug, Clone)]
pub struct Rows<T> {
    pub rows:     Vec<T>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Position in the upstream list.
    pub index:  usize,
    pub id:     Option<u64>,
    pub event:  Option<Event>,
    pub reason: String,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self { rows: Vec::new(), rejected: Vec::new() }
    }
}

impl<T> Rows<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One InvalidInput diagnostic per rejected row.
    pub fn diagnostics(&self, what: &str) -> Vec<Diagnostic> {
        self.rejected
            .iter()
            .map(|r| {
                let id = r.id.map(|id| format!(" (id {id})")).unwrap_or_default();
                Diagnostic::invalid(r.event, format!("{what} row {}{id} dropped: {}", r.index, r.reason))
            })
            .collect()
    }
}

impl<T: Serialize> Serialize for Rows<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Rows<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
        let mut out = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            let id = value.get("id").and_then(Value::as_u64);
            let event = value
                .get("event")
                .and_then(Value::as_u64)
                .and_then(|e| Event::try_from(e).ok());
            match serde_json::from_value::<T>(value) {
                Ok(row) => out.rows.push(row),
                Err(e) => out.rejected.push(RejectedRow { index, id, event, reason: e.to_string() }),
            }
        }
        Ok(out)
    }
}

// ── Bootstrap (players, clubs, calendar) ───────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRow {
    pub id:           PlayerId,
    #[serde(default)]
    pub web_name:     String,
    #[serde(default)]
    pub first_name:   String,
    #[serde(default)]
    pub second_name:  String,
    pub team:         u32,
    pub element_type: u8,
    pub now_cost:     i32,
    #[serde(default)]
    pub chance_of_playing_next_round: Option<i32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub news:         String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub form:         f64,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub minutes:      u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub selected_by_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRow {
    pub id:         u32,
    #[serde(default)]
    pub name:       String,
    #[serde(default)]
    pub short_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    pub id:            Event,
    #[serde(default)]
    pub name:          String,
    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_current:    bool,
    #[serde(default)]
    pub is_next:       bool,
    #[serde(default)]
    pub finished:      bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub elements: Rows<ElementRow>,
    #[serde(default)]
    pub teams:    Rows<TeamRow>,
    #[serde(default)]
    pub events:   Rows<EventRow>,
}

impl Bootstrap {
    pub fn to_catalogue(&self) -> (Catalogue, Vec<Diagnostic>) {
        let mut diagnostics = self.elements.diagnostics("element");
        diagnostics.extend(self.teams.diagnostics("team"));
        let mut players = Vec::with_capacity(self.elements.len());

        for row in self.elements.iter() {
            let Some(position) = Position::from_element_type(row.element_type) else {
                diagnostics.push(Diagnostic::invalid(
                    None,
                    format!("player {} has unknown element_type {}", row.id, row.element_type),
                ));
                continue;
            };
            let fitness_percent = match row.chance_of_playing_next_round {
                None => None,
                Some(c) => match u8::try_from(c) {
                    Ok(c) if c <= 100 => Some(c),
                    _ => {
                        diagnostics.push(Diagnostic::invalid(
                            None,
                            format!("player {} chance of playing {c} outside 0-100, ignored", row.id),
                        ));
                        None
                    }
                },
            };
            players.push(PlayerEntry {
                id: row.id,
                web_name: if row.web_name.is_empty() { "Unknown".into() } else { row.web_name.clone() },
                first_name: row.first_name.clone(),
                second_name: row.second_name.clone(),
                club: row.team,
                position,
                now_cost: Price::from_tenths(row.now_cost),
                fitness_percent,
                news: row.news.clone(),
                form: row.form,
                total_points: row.total_points,
                minutes: row.minutes,
                selected_by_percent: row.selected_by_percent,
            });
        }

        let clubs = self
            .teams
            .iter()
            .map(|t| ClubEntry { id: t.id, name: t.name.clone(), short_name: t.short_name.clone() })
            .collect();

        (Catalogue::new(players, clubs), diagnostics)
    }

    pub fn gameweeks(&self) -> Vec<GameweekInfo> {
        for d in self.events.diagnostics("event") {
            log::warn!("calendar: {d}");
        }
        self.events
            .iter()
            .map(|e| GameweekInfo {
                id:            e.id,
                name:          if e.name.is_empty() { format!("Gameweek {}", e.id) } else { e.name.clone() },
                deadline_time: e.deadline_time,
                is_current:    e.is_current,
                is_next:       e.is_next,
                finished:      e.finished,
            })
            .collect()
    }
}

// ── Entry history ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub event:                Event,
    #[serde(default)]
    pub points:               i32,
    #[serde(default)]
    pub total_points:         i32,
    #[serde(default)]
    pub overall_rank:         Option<u64>,
    #[serde(default)]
    pub bank:                 i32,
    #[serde(default)]
    pub value:                i32,
    #[serde(default)]
    pub event_transfers:      i32,
    #[serde(default)]
    pub event_transfers_cost: i32,
    #[serde(default)]
    pub points_on_bench:      i32,
}

impl HistoryRow {
    pub fn to_record(&self) -> WeeklyRecord {
        WeeklyRecord {
            event:           self.event,
            points:          self.points,
            total_points:    self.total_points,
            transfers_made:  self.event_transfers,
            transfer_cost:   self.event_transfers_cost,
            bank:            Price::from_tenths(self.bank),
            squad_value:     Price::from_tenths(self.value),
            points_on_bench: self.points_on_bench,
            overall_rank:    self.overall_rank,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipRow {
    pub name:  String,
    pub event: Event,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub current: Rows<HistoryRow>,
    #[serde(default)]
    pub chips:   Rows<ChipRow>,
}

impl History {
    pub fn records(&self) -> (Vec<WeeklyRecord>, Vec<Diagnostic>) {
        let records = self.current.iter().map(HistoryRow::to_record).collect();
        (records, self.current.diagnostics("history"))
    }

    pub fn chip_events(&self) -> (Vec<ChipUsageEvent>, Vec<Diagnostic>) {
        let mut diagnostics = self.chips.diagnostics("chip");
        let events = self
            .chips
            .iter()
            .filter_map(|row| match ChipKind::from_api(&row.name) {
                Some(chip) => Some(ChipUsageEvent::new(chip, row.event)),
                None => {
                    diagnostics.push(Diagnostic::invalid(Some(row.event), format!("unknown chip '{}'", row.name)));
                    None
                }
            })
            .collect();
        (events, diagnostics)
    }
}

// ── Picks ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickRow {
    pub element:         PlayerId,
    pub position:        u8,
    #[serde(default = "default_multiplier")]
    pub multiplier:      u8,
    #[serde(default)]
    pub is_captain:      bool,
    #[serde(default)]
    pub is_vice_captain: bool,
    #[serde(default)]
    pub selling_price:   Option<i32>,
}

fn default_multiplier() -> u8 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PicksPayload {
    #[serde(default)]
    pub active_chip:   Option<String>,
    /// Kept untyped so a malformed row costs only the row.
    #[serde(default)]
    pub entry_history: Option<Value>,
    #[serde(default)]
    pub picks:         Rows<PickRow>,
}

impl PicksPayload {
    pub fn to_picks(&self, event: Event) -> (GameweekPicks, Vec<Diagnostic>) {
        let mut diagnostics = self.picks.diagnostics("pick");
        let active_chip = match self.active_chip.as_deref() {
            None => None,
            Some(name) => {
                let chip = ChipKind::from_api(name);
                if chip.is_none() {
                    diagnostics.push(Diagnostic::invalid(Some(event), format!("unknown active chip '{name}'")));
                }
                chip
            }
        };

        let picks = self
            .picks
            .iter()
            .map(|p| RawPick {
                element:         p.element,
                lineup_slot:     p.position,
                is_captain:      p.is_captain,
                is_vice_captain: p.is_vice_captain,
                multiplier:      p.multiplier,
                selling_price:   p.selling_price.map(Price::from_tenths),
            })
            .collect();

        let entry_history = match self.entry_history.clone().filter(|v| !v.is_null()) {
            None => None,
            Some(value) => match serde_json::from_value::<HistoryRow>(value) {
                Ok(row) => Some(row.to_record()),
                Err(e) => {
                    diagnostics.push(Diagnostic::invalid(Some(event), format!("entry_history dropped: {e}")));
                    None
                }
            },
        };

        let picks = GameweekPicks { event, picks, active_chip, entry_history };
        (picks, diagnostics)
    }
}

// ── Entry summary and transfers ────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryTransfers {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntrySummary {
    #[serde(default)]
    pub id:        u64,
    #[serde(default)]
    pub name:      String,
    #[serde(default)]
    pub transfers: Option<EntryTransfers>,
}

impl EntrySummary {
    pub fn transfer_limit(&self) -> Option<u32> {
        self.transfers.as_ref().and_then(|t| t.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRow {
    pub element_in:       PlayerId,
    #[serde(default)]
    pub element_in_cost:  i32,
    pub element_out:      PlayerId,
    #[serde(default)]
    pub element_out_cost: i32,
    pub event:            Event,
    #[serde(default)]
    pub time:             Option<DateTime<Utc>>,
}

impl TransferRow {
    pub fn to_record(&self) -> TransferRecord {
        TransferRecord {
            event:            self.event,
            element_in:       self.element_in,
            element_in_cost:  Price::from_tenths(self.element_in_cost),
            element_out:      self.element_out,
            element_out_cost: Price::from_tenths(self.element_out_cost),
            time:             self.time,
        }
    }
}
