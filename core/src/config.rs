//! League rules consumed by the engine.
//!
//! Defaults follow the published league rules. A data directory may
//! carry a `rules.json` overriding any subset of fields; the season-half
//! boundary is a league constant in `types` and is not configurable.

use crate::types::{Event, Price};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const RULES_FILE: &str = "rules.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeasonRules {
    /// Free transfers a new entry starts the season with.
    pub initial_free_transfers:   u8,
    /// Banked free transfers never exceed this.
    pub max_banked_free_transfers: u8,
    /// Points deducted per transfer beyond the free allowance.
    pub hit_cost:                 i32,
    pub last_event:               Event,
    /// How many past transfers the snapshot lists, newest first.
    pub recent_transfer_limit:    usize,
    pub market:                   MarketRules,
}

impl Default for SeasonRules {
    fn default() -> Self {
        Self {
            initial_free_transfers:    1,
            max_banked_free_transfers: 5,
            hit_cost:                  4,
            last_event:                38,
            recent_transfer_limit:     5,
            market:                    MarketRules::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketRules {
    pub min_minutes:            u32,
    pub min_form:               f64,
    pub targets_per_position:   usize,
    /// A target is affordable when its price is within bank + headroom,
    /// the headroom standing in for the sale of an outgoing player.
    pub affordability_headroom: Price,
}

impl Default for MarketRules {
    fn default() -> Self {
        Self {
            min_minutes:            200,
            min_form:               4.5,
            targets_per_position:   6,
            affordability_headroom: Price::from_tenths(50),
        }
    }
}

impl SeasonRules {
    /// Load `rules.json` from `data_dir`, falling back to defaults when
    /// the file does not exist. A present but malformed file is an error.
    pub fn load(data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = data_dir.as_ref().join(RULES_FILE);
        if !path.exists() {
            log::info!("no {} in {}, using league defaults", RULES_FILE, data_dir.as_ref().display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let rules: SeasonRules = serde_json::from_str(&content)?;
        rules.check()?;
        Ok(rules)
    }

    /// Reject rule sets the arithmetic cannot work with.
    pub fn check(&self) -> anyhow::Result<()> {
        if self.hit_cost <= 0 {
            anyhow::bail!("hit_cost must be positive, got {}", self.hit_cost);
        }
        if self.max_banked_free_transfers == 0 {
            anyhow::bail!("max_banked_free_transfers must be at least 1");
        }
        if self.initial_free_transfers > self.max_banked_free_transfers {
            anyhow::bail!(
                "initial_free_transfers {} exceeds cap {}",
                self.initial_free_transfers,
                self.max_banked_free_transfers
            );
        }
        if self.last_event == 0 {
            anyhow::bail!("last_event must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_rules_fill_from_defaults() {
        let rules: SeasonRules =
            serde_json::from_str(r#"{"max_banked_free_transfers": 2, "market": {"min_form": 6.0}}"#).unwrap();
        assert_eq!(rules.max_banked_free_transfers, 2);
        assert_eq!(rules.hit_cost, 4);
        assert_eq!(rules.market.min_form, 6.0);
        assert_eq!(rules.market.targets_per_position, 6);
        assert!(rules.check().is_ok());
    }

    #[test]
    fn unusable_rules_are_rejected() {
        let zero_hit = SeasonRules { hit_cost: 0, ..SeasonRules::default() };
        assert!(zero_hit.check().is_err());

        let start_over_cap = SeasonRules {
            initial_free_transfers: 3,
            max_banked_free_transfers: 2,
            ..SeasonRules::default()
        };
        assert!(start_over_cap.check().is_err());
    }

    #[test]
    fn missing_rules_file_means_defaults() {
        let dir = std::env::temp_dir().join("gaffer-rules-absent");
        assert_eq!(SeasonRules::load(&dir).unwrap(), SeasonRules::default());
    }
}
