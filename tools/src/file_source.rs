//! SeasonSource over a directory of saved upstream payloads.
//!
//! Layout:
//!   bootstrap.json            players, clubs, calendar
//!   entry_<id>.json           entry summary (transfer limit)
//!   history_<id>.json         weekly history and chips
//!   picks_<id>_<gw>.json      one file per published gameweek
//!   transfers_<id>.json       transfer log
//!
//! A missing file means upstream has nothing yet, not an error.

use gaffer_core::{
    diagnostic::Diagnostic,
    error::SeasonResult,
    gameweek::GameweekInfo,
    records::{Catalogue, ChipUsageEvent, GameweekPicks, TransferRecord, WeeklyRecord},
    source::SeasonSource,
    types::{Event, TeamId},
    upstream::{Bootstrap, EntrySummary, History, PicksPayload, Rows, TransferRow},
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self { data_dir: data_dir.as_ref().to_path_buf() }
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> SeasonResult<Option<T>> {
        let path = self.data_dir.join(name);
        if !path.exists() {
            log::debug!("{} not present", path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn report(&self, what: &str, diagnostics: &[Diagnostic]) {
        for d in diagnostics {
            log::warn!("{what}: {d}");
        }
    }

    pub fn gameweeks(&self) -> SeasonResult<Vec<GameweekInfo>> {
        Ok(self
            .read::<Bootstrap>("bootstrap.json")?
            .map(|b| b.gameweeks())
            .unwrap_or_default())
    }

    pub fn history(&self, team_id: TeamId) -> SeasonResult<History> {
        Ok(self.read(&format!("history_{team_id}.json"))?.unwrap_or_default())
    }
}

impl SeasonSource for FileSource {
    fn catalogue(&self) -> SeasonResult<Option<Catalogue>> {
        let Some(bootstrap) = self.read::<Bootstrap>("bootstrap.json")? else {
            return Ok(None);
        };
        let (catalogue, diagnostics) = bootstrap.to_catalogue();
        self.report("bootstrap", &diagnostics);
        Ok(Some(catalogue))
    }

    fn weekly_records(&self, team_id: TeamId) -> SeasonResult<Vec<WeeklyRecord>> {
        let (records, diagnostics) = self.history(team_id)?.records();
        self.report("history", &diagnostics);
        Ok(records)
    }

    fn chip_events(&self, team_id: TeamId) -> SeasonResult<Vec<ChipUsageEvent>> {
        let (chips, diagnostics) = self.history(team_id)?.chip_events();
        self.report("chips", &diagnostics);
        Ok(chips)
    }

    fn picks(&self, team_id: TeamId, event: Event) -> SeasonResult<Option<GameweekPicks>> {
        let Some(payload) = self.read::<PicksPayload>(&format!("picks_{team_id}_{event}.json"))? else {
            return Ok(None);
        };
        let (picks, diagnostics) = payload.to_picks(event);
        self.report("picks", &diagnostics);
        Ok(Some(picks))
    }

    fn transfers(&self, team_id: TeamId) -> SeasonResult<Vec<TransferRecord>> {
        let rows: Rows<TransferRow> = self.read(&format!("transfers_{team_id}.json"))?.unwrap_or_default();
        self.report("transfers", &rows.diagnostics("transfer"));
        Ok(rows.iter().map(TransferRow::to_record).collect())
    }

    fn transfer_limit(&self, team_id: TeamId) -> SeasonResult<Option<u32>> {
        Ok(self
            .read::<EntrySummary>(&format!("entry_{team_id}.json"))?
            .and_then(|e| e.transfer_limit()))
    }
}
