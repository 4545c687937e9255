//! Transfer market targets: fit, in-form outfield players not already
//! in the squad.

use crate::{
    availability::{classify, PlayerAvailability},
    config::MarketRules,
    records::{Catalogue, PlayerEntry, Position},
    types::{PlayerId, Price},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketTarget {
    pub player:          PlayerId,
    pub name:            String,
    pub club:            String,
    pub position:        Position,
    pub price:           Price,
    pub form:            f64,
    pub ownership:       f64,
    pub fitness_percent: Option<u8>,
    pub availability:    PlayerAvailability,
    pub affordable:      bool,
}

pub const TARGET_POSITIONS: [Position; 3] = [Position::Defender, Position::Midfielder, Position::Forward];

fn eligible(player: &PlayerEntry, owned: &HashSet<PlayerId>, rules: &MarketRules) -> bool {
    !owned.contains(&player.id)
        && player.minutes >= rules.min_minutes
        && player.form >= rules.min_form
        && !classify(player.fitness_percent, &player.news).excludes_from_market()
}

/// Up to `targets_per_position` candidates for each outfield position,
/// best form first. Goalkeepers are never suggested.
pub fn market_targets(
    catalogue: &Catalogue,
    owned:     &HashSet<PlayerId>,
    bank:      Price,
    rules:     &MarketRules,
) -> Vec<MarketTarget> {
    let budget = bank + rules.affordability_headroom;
    let mut out = Vec::new();

    for position in TARGET_POSITIONS {
        let mut candidates: Vec<&PlayerEntry> = catalogue
            .players
            .values()
            .filter(|p| p.position == position && eligible(p, owned, rules))
            .collect();
        // Id breaks ties so the result does not depend on map order.
        candidates.sort_by(|a, b| b.form.total_cmp(&a.form).then(a.id.cmp(&b.id)));

        out.extend(candidates.into_iter().take(rules.targets_per_position).map(|p| MarketTarget {
            player:          p.id,
            name:            p.web_name.clone(),
            club:            catalogue.club(p.club).map(|c| c.short_name.clone()).unwrap_or_else(|| "?".into()),
            position,
            price:           p.now_cost,
            form:            p.form,
            ownership:       p.selected_by_percent,
            fitness_percent: p.fitness_percent,
            availability:    classify(p.fitness_percent, &p.news),
            affordable:      p.now_cost <= budget,
        }));
    }

    out
}
