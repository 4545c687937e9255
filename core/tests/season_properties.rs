//! Property tests over synthetic seasons.
//!
//! Each season is generated from a seeded Pcg64Mcg stream, so every
//! failure reproduces from the seed printed in its message.

use gaffer_core::{
    availability::{classify, PlayerAvailability},
    chips::track_chips,
    config::SeasonRules,
    free_transfers::{accumulate, FreeTransfers, TransferContext},
    price::price_delta,
    records::{ChipKind, ChipUsageEvent, WeeklyRecord},
    types::{Price, SeasonHalf},
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const SEEDS: u64 = 200;

fn synthetic_history(rng: &mut Pcg64Mcg, weeks: u32) -> Vec<WeeklyRecord> {
    (1..=weeks)
        .map(|gw| {
            let made: i32 = rng.gen_range(0..=8);
            let hits: i32 = rng.gen_range(0..=made + 1);
            WeeklyRecord::transfers(gw, made, hits * 4)
        })
        .collect()
}

#[test]
fn balance_stays_within_bounds_at_every_step() {
    let rules = SeasonRules::default();
    for seed in 0..SEEDS {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let weeks = rng.gen_range(0..=38);
        let records = synthetic_history(&mut rng, weeks);
        let limit = if rng.gen_bool(0.3) { Some(rng.gen_range(0..=9)) } else { None };

        let ctx = TransferContext { authoritative_limit: limit, ..Default::default() };
        let out = accumulate(&records, &ctx, &rules);

        for step in &out.steps {
            assert!(step.balance <= 5, "seed {seed}: balance {} at gw{}", step.balance, step.event);
        }
        assert!(out.at_gameweek_start <= 5, "seed {seed}: start {}", out.at_gameweek_start);
        match out.available {
            FreeTransfers::Limited(n) => assert!(n <= out.at_gameweek_start, "seed {seed}: {n} available"),
            FreeTransfers::Unlimited => panic!("seed {seed}: no chip was played"),
        }
    }
}

#[test]
fn every_completed_week_grants_at_least_one() {
    let rules = SeasonRules::default();
    for seed in 0..SEEDS {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let records = synthetic_history(&mut rng, 20);
        let out = accumulate(&records, &TransferContext { open_event: Some(21), ..Default::default() }, &rules);
        assert!(out.steps.iter().all(|s| s.balance >= 1), "seed {seed}");
    }
}

#[test]
fn chip_availability_only_ever_turns_off() {
    let rules = SeasonRules::default();
    for seed in 0..SEEDS {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let mut usages: Vec<ChipUsageEvent> = (0..rng.gen_range(0..12))
            .map(|_| {
                let chip = ChipKind::ALL[rng.gen_range(0..4)];
                ChipUsageEvent::new(chip, rng.gen_range(1..=38))
            })
            .collect();
        usages.sort_by_key(|u| u.event);

        let mut previous = track_chips(&[], 1, &rules).availability;
        for gw in 1..=38 {
            let seen: Vec<ChipUsageEvent> = usages.iter().copied().filter(|u| u.event <= gw).collect();
            let current = track_chips(&seen, gw, &rules).availability;
            for chip in ChipKind::ALL {
                for half in SeasonHalf::ALL {
                    assert!(
                        previous.is_available(chip, half) || !current.is_available(chip, half),
                        "seed {seed}: {chip:?} {half:?} came back at gw{gw}"
                    );
                }
            }
            previous = current;
        }
    }
}

#[test]
fn price_delta_is_antisymmetric() {
    let mut rng = Pcg64Mcg::seed_from_u64(0xC0FFEE);
    for _ in 0..1_000 {
        let a = Price(rng.gen_range(35..=150));
        let b = Price(rng.gen_range(35..=150));
        assert_eq!(price_delta(a, b), -price_delta(b, a), "{a} vs {b}");
    }
}

#[test]
fn classifier_is_total() {
    let notes = [
        "", " ", "Injured", "injured - knee", "Suspended", "suspended until GW12", "Knock",
        "Illness - 75% chance of playing", "Joined on loan", "INJURED AND SUSPENDED",
    ];
    let fitness = std::iter::once(None).chain((0..=100u8).map(Some));
    for f in fitness {
        for note in notes {
            let class = classify(f, note);
            assert!(PlayerAvailability::ALL.contains(&class));
        }
    }
}

#[test]
fn injured_with_unknown_fitness_is_always_out() {
    let mut rng = Pcg64Mcg::seed_from_u64(7);
    let fragments = ["hamstring", "knee", "Injured", "injured", "- return date unknown", "ankle"];
    for _ in 0..500 {
        let mut parts: Vec<&str> = (0..rng.gen_range(0..4)).map(|_| fragments[rng.gen_range(0..fragments.len())]).collect();
        parts.insert(rng.gen_range(0..=parts.len()), "injured");
        let note = parts.join(" ");
        assert_eq!(classify(None, &note), PlayerAvailability::Out, "note: {note}");
    }
}
