//! The fetch collaborator seam.
//!
//! RULE: The engine never fetches anything itself. Callers pass an
//! explicit SeasonSource; the engine asks it for each input once per
//! request and keeps nothing between requests.

use crate::{
    config::SeasonRules,
    diagnostic::Diagnostic,
    error::{SeasonError, SeasonResult},
    records::{Catalogue, ChipUsageEvent, GameweekPicks, TransferRecord, WeeklyRecord},
    snapshot::{build_squad_snapshot, SnapshotInputs, SquadSnapshot},
    types::{Event, TeamId},
};

/// The contract every upstream adapter must fulfil.
///
/// Return `Ok(None)` or an empty list when upstream has nothing yet;
/// return `Err` only when the fetch itself failed.
pub trait SeasonSource {
    fn catalogue(&self) -> SeasonResult<Option<Catalogue>>;

    /// Weekly history, oldest first.
    fn weekly_records(&self, team_id: TeamId) -> SeasonResult<Vec<WeeklyRecord>>;

    fn chip_events(&self, team_id: TeamId) -> SeasonResult<Vec<ChipUsageEvent>>;

    fn picks(&self, team_id: TeamId, event: Event) -> SeasonResult<Option<GameweekPicks>>;

    fn transfers(&self, team_id: TeamId) -> SeasonResult<Vec<TransferRecord>>;

    /// Transfer limit upstream reports for the open gameweek, if any.
    fn transfer_limit(&self, team_id: TeamId) -> SeasonResult<Option<u32>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub team_id:      TeamId,
    pub target_event: Event,
}

/// Turn a failed optional fetch into a MissingData finding.
fn soften<T: Default>(
    result:      SeasonResult<T>,
    what:        &str,
    request:     &SnapshotRequest,
    diagnostics: &mut Vec<Diagnostic>,
) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            log::warn!(
                "gw={} team={} {what} fetch failed: {e}",
                request.target_event,
                request.team_id
            );
            diagnostics.push(Diagnostic::from_error(
                Some(request.target_event),
                &SeasonError::missing(format!("{what}: {e}")),
            ));
            T::default()
        }
    }
}

/// Gather every input for one team. Only a catalogue failure is fatal.
pub fn collect_inputs(source: &dyn SeasonSource, request: &SnapshotRequest) -> SeasonResult<SnapshotInputs> {
    let team_id = request.team_id;
    let target = request.target_event;

    let catalogue = match source.catalogue() {
        Ok(Some(c)) => c,
        Ok(None) => return Err(SeasonError::CatalogueMissing { team_id }),
        Err(e) => {
            log::warn!("gw={target} team={team_id} catalogue fetch failed: {e}");
            return Err(SeasonError::CatalogueMissing { team_id });
        }
    };

    let mut diagnostics = Vec::new();
    let records = soften(source.weekly_records(team_id), "weekly history", request, &mut diagnostics);
    let chips = soften(source.chip_events(team_id), "chip history", request, &mut diagnostics);
    let transfers = soften(source.transfers(team_id), "transfer log", request, &mut diagnostics);
    let authoritative_limit = soften(source.transfer_limit(team_id), "transfer limit", request, &mut diagnostics);

    let latest_picks = soften(source.picks(team_id, target), "picks", request, &mut diagnostics);
    let previous_picks = match (&latest_picks, target) {
        (None, t) if t > 1 => soften(source.picks(team_id, t - 1), "previous picks", request, &mut diagnostics),
        _ => None,
    };

    Ok(SnapshotInputs {
        team_id,
        target_event: target,
        records,
        chips,
        latest_picks,
        previous_picks,
        catalogue: Some(catalogue),
        transfers,
        authoritative_limit,
        diagnostics,
    })
}

/// Fetch through `source` and compose the snapshot.
pub fn snapshot_from_source(
    source:  &dyn SeasonSource,
    request: &SnapshotRequest,
    rules:   &SeasonRules,
) -> SeasonResult<SquadSnapshot> {
    let inputs = collect_inputs(source, request)?;
    build_squad_snapshot(&inputs, rules)
}
