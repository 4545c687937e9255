//! season-runner: headless snapshot builder over saved upstream payloads.
//!
//! Usage:
//!   season-runner --team 4242 --data-dir ./data
//!   season-runner --team 4242 --event 24 --json
//!   season-runner --team 4242 --now 2024-11-05T12:00:00Z

mod file_source;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use file_source::FileSource;
use gaffer_core::{
    chips::ChipWindow,
    config::SeasonRules,
    diagnostic::{count_kind, DiagnosticKind},
    gameweek::resolve_window,
    market::market_targets,
    snapshot::SquadSnapshot,
    source::{snapshot_from_source, SeasonSource, SnapshotRequest},
    summary::season_summary,
    types::SeasonHalf,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let team_id: u64 = parse_arg(&args, "--team", 0);
    let json = args.iter().any(|a| a == "--json");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");
    let now: DateTime<Utc> = match args.windows(2).find(|w| w[0] == "--now") {
        Some(w) => DateTime::parse_from_rfc3339(&w[1])
            .with_context(|| format!("--now expects RFC 3339, got {}", w[1]))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    if team_id == 0 {
        anyhow::bail!("--team <id> is required");
    }

    let rules = SeasonRules::load(data_dir)?;
    let source = FileSource::new(data_dir);

    let target_event = match parse_arg(&args, "--event", 0u32) {
        0 => {
            let window = resolve_window(&source.gameweeks()?, now);
            match window.target_event() {
                Some(event) => event,
                None => {
                    // No calendar: the gameweek after the last one played.
                    let last = source.history(team_id)?.current.rows.last().map(|r| r.event).unwrap_or(0);
                    log::info!("no calendar in {data_dir}, assuming gw={}", last + 1);
                    (last + 1).min(rules.last_event)
                }
            }
        }
        event => event,
    };

    if !json {
        println!("Gaffer season-runner");
        println!("  team:      {team_id}");
        println!("  gameweek:  {target_event}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let request = SnapshotRequest { team_id, target_event };
    let snapshot = snapshot_from_source(&source, &request, &rules)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_snapshot(&snapshot);
    print_chips(&snapshot.chips);

    let history = source.history(team_id)?;
    let (chips, _) = history.chip_events();
    let (records, _) = history.records();
    let summary = season_summary(&records, &chips, &rules);
    println!();
    println!("=== SEASON ===");
    println!("  gameweeks:      {}", summary.gameweeks_played);
    println!("  total points:   {}", summary.total_points);
    println!("  avg per gw:     {:.1}", summary.average_points);
    if let (Some(best), Some(worst)) = (&summary.best, &summary.worst) {
        println!("  best / worst:   GW{} {} pts / GW{} {} pts", best.event, best.points, worst.event, worst.points);
    }
    println!("  hits taken:     {} pts", summary.total_hit_cost);

    let catalogue = source.catalogue()?.unwrap_or_default();
    let targets = market_targets(&catalogue, &snapshot.owned_players(), snapshot.bank, &rules.market);
    if !targets.is_empty() {
        println!();
        println!("=== TRANSFER TARGETS ===");
        for t in &targets {
            let afford = if t.affordable { " [affordable]" } else { "" };
            println!(
                "  {:3} {:20} {:4} {} form:{:.1} owned:{:.1}%{afford}",
                t.position.short(), t.name, t.club, t.price, t.form, t.ownership
            );
        }
    }

    Ok(())
}

fn print_snapshot(s: &SquadSnapshot) {
    println!("=== SQUAD ===");
    if s.is_stale() {
        println!("  (picks from an earlier gameweek: {:?})", s.staleness);
    }
    println!("  bank:            {}", s.bank);
    println!("  squad value:     {}", s.squad_value);
    println!("  free transfers:  {} ({:?})", s.free_transfers.available, s.free_transfers.source);
    println!(
        "  active chip:     {}",
        s.active_chip.map(|c| c.label()).unwrap_or("None")
    );

    for (title, starting) in [("STARTING XI", true), ("BENCH", false)] {
        println!();
        println!("  ── {title} ──");
        for p in s.picks.iter().filter(|p| p.is_starting == starting) {
            let role = if p.is_captain { " [C]" } else if p.is_vice_captain { " [VC]" } else { "" };
            let price = p
                .price
                .map(|pr| format!("sell {} / market {}", pr.selling_price, pr.market_price))
                .unwrap_or_else(|| "price unknown".into());
            println!(
                "  {:3} {:20} {:4} {price}  {}{role}",
                p.position.map(|pos| pos.short()).unwrap_or("?"),
                p.name,
                p.club,
                p.availability.label()
            );
        }
    }

    if !s.transfers.this_week.is_empty() {
        println!();
        println!("  ── TRANSFERS THIS GW ({} made) ──", s.transfers.this_week.len());
        for t in &s.transfers.this_week {
            println!("  OUT {} ({}) → IN {} ({})", t.name_out, t.cost_out, t.name_in, t.cost_in);
        }
    }

    if !s.diagnostics.is_empty() {
        let ambiguous = count_kind(&s.diagnostics, DiagnosticKind::AmbiguousState);
        println!();
        println!("  ── DIAGNOSTICS ({}, {ambiguous} ambiguous) ──", s.diagnostics.len());
        for d in &s.diagnostics {
            println!("  {d}");
        }
    }
}

fn print_chips(window: &ChipWindow) {
    println!();
    println!("=== CHIPS ===");
    for half in SeasonHalf::ALL {
        let marker = if half == window.current_half { " (current)" } else { "" };
        let names: Vec<&str> = window.availability.available_in(half).iter().map(|c| c.label()).collect();
        let names = if names.is_empty() { "None remaining".to_string() } else { names.join(", ") };
        println!("  {}{marker}: {names}", half.label());
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
