use gaffer_core::{
    config::MarketRules,
    market::market_targets,
    records::{Catalogue, ClubEntry, PlayerEntry, Position},
    types::Price,
};
use std::collections::HashSet;

fn entry(id: u32, position: Position, cost: i32, form: f64, fitness: Option<u8>, news: &str) -> PlayerEntry {
    PlayerEntry {
        id,
        web_name: format!("P{id}"),
        first_name: String::new(),
        second_name: String::new(),
        club: 1,
        position,
        now_cost: Price(cost),
        fitness_percent: fitness,
        news: news.into(),
        form,
        total_points: 50,
        minutes: 1000,
        selected_by_percent: 5.0,
    }
}

fn catalogue(players: Vec<PlayerEntry>) -> Catalogue {
    Catalogue::new(players, vec![ClubEntry { id: 1, name: "Club".into(), short_name: "CLB".into() }])
}

#[test]
fn unfit_owned_and_out_of_form_players_are_filtered() {
    let cat = catalogue(vec![
        entry(1, Position::Midfielder, 80, 7.0, None, ""),
        entry(2, Position::Midfielder, 80, 8.0, Some(0), "Suspended"),
        entry(3, Position::Midfielder, 80, 9.0, Some(20), "Knock"),
        entry(4, Position::Midfielder, 80, 6.0, Some(50), "Knock"),
        entry(5, Position::Midfielder, 80, 4.0, None, ""),
        entry(6, Position::Midfielder, 80, 7.5, None, ""),
        entry(7, Position::Goalkeeper, 50, 9.9, None, ""),
    ]);
    let owned: HashSet<u32> = [6].into();

    let targets = market_targets(&cat, &owned, Price(10), &MarketRules::default());
    let ids: Vec<u32> = targets.iter().map(|t| t.player).collect();

    assert_eq!(ids, vec![1, 4], "sorted by form, doubt allowed, major doubt excluded");
    assert_eq!(targets[0].club, "CLB");
}

#[test]
fn affordability_uses_bank_plus_headroom() {
    let cat = catalogue(vec![
        entry(1, Position::Forward, 60, 6.0, None, ""),
        entry(2, Position::Forward, 61, 5.0, None, ""),
    ]);
    let targets = market_targets(&cat, &HashSet::new(), Price(10), &MarketRules::default());

    assert!(targets[0].affordable, "60 <= 10 + 50");
    assert!(!targets[1].affordable);
}

#[test]
fn at_most_n_per_position() {
    let players = (1..=10).map(|id| entry(id, Position::Defender, 45, 5.0 + f64::from(id) / 10.0, None, "")).collect();
    let rules = MarketRules { targets_per_position: 3, ..MarketRules::default() };
    let targets = market_targets(&catalogue(players), &HashSet::new(), Price(0), &rules);

    let ids: Vec<u32> = targets.iter().map(|t| t.player).collect();
    assert_eq!(ids, vec![10, 9, 8]);
}

#[test]
fn thresholds_are_inclusive_and_out_players_are_dropped() {
    let rules = MarketRules::default();
    let mut at_minutes = entry(1, Position::Defender, 45, 5.0, None, "");
    at_minutes.minutes = rules.min_minutes;
    let mut short_minutes = entry(2, Position::Defender, 45, 9.0, None, "");
    short_minutes.minutes = rules.min_minutes - 1;
    let at_form = entry(3, Position::Defender, 45, rules.min_form, None, "");
    let below_form = entry(4, Position::Defender, 45, rules.min_form - 0.1, None, "");
    let out = entry(5, Position::Defender, 45, 8.0, Some(0), "");
    let injured = entry(6, Position::Defender, 45, 8.0, None, "Injured - unknown return date");

    let cat = catalogue(vec![at_minutes, short_minutes, at_form, below_form, out, injured]);
    let ids: Vec<u32> = market_targets(&cat, &HashSet::new(), Price(0), &rules).iter().map(|t| t.player).collect();

    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn equal_form_falls_back_to_id_order() {
    let cat = catalogue(vec![
        entry(30, Position::Forward, 70, 6.0, None, ""),
        entry(12, Position::Forward, 70, 6.0, None, ""),
        entry(21, Position::Forward, 70, 6.0, None, ""),
        entry(5, Position::Midfielder, 70, 5.0, None, ""),
    ]);
    let targets = market_targets(&cat, &HashSet::new(), Price(0), &MarketRules::default());
    let ids: Vec<u32> = targets.iter().map(|t| t.player).collect();

    assert_eq!(ids, vec![5, 12, 21, 30], "midfielders come before forwards");
}

#[test]
fn price_equal_to_budget_is_affordable() {
    let headroom = MarketRules::default().affordability_headroom;
    let cat = catalogue(vec![
        entry(1, Position::Midfielder, 25 + headroom.tenths(), 6.0, None, ""),
        entry(2, Position::Midfielder, 26 + headroom.tenths(), 5.0, None, ""),
    ]);
    let targets = market_targets(&cat, &HashSet::new(), Price(25), &MarketRules::default());

    assert!(targets[0].affordable);
    assert!(!targets[1].affordable);
}
