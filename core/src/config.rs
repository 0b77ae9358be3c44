//! Simulation configuration.
//!
//! Every bound and probability an event routine uses lives here so that
//! tests can pin them. Production values come from
//! `{data_dir}/simulation.json`; any section or field the file omits falls
//! back to `Default`.

use crate::{
    error::{SimError, SimResult},
    types::Tick,
};
use serde::{Deserialize, Serialize};

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "simulation.json";

// ── World generation ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub product_count:  usize,
    pub supplier_count: usize,
    pub company_count:  usize,
    pub base_price_min: f64,
    pub base_price_max: f64,
    /// Chance that a supplier carries a given product at world creation.
    pub carry_probability: f64,
    pub stock_min:  u32,
    pub stock_max:  u32,
    pub budget_min: f64,
    pub budget_max: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            product_count:     30,
            supplier_count:    10,
            company_count:     12,
            base_price_min:    5.0,
            base_price_max:    500.0,
            carry_probability: 0.4,
            stock_min:         10,
            stock_max:         200,
            budget_min:        10_000.0,
            budget_max:        100_000.0,
        }
    }
}

// ── Scheduler ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Events are only evaluated on ticks that are a multiple of this.
    pub tick_interval: Tick,
    pub budget_recharge_probability: f64,
    pub restock_probability:         f64,
    pub inflation_probability:       f64,
    pub availability_probability:    f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval:               1,
            budget_recharge_probability: 0.10,
            restock_probability:         0.25,
            inflation_probability:       0.05,
            availability_probability:    0.05,
        }
    }
}

// ── Event routines ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BudgetRechargeConfig {
    /// Per-company chance of a recharge once the event fires.
    pub probability: f64,
    pub amount_min:  u64,
    pub amount_max:  u64,
}

impl Default for BudgetRechargeConfig {
    fn default() -> Self {
        Self { probability: 0.70, amount_min: 1_000, amount_max: 10_000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RestockConfig {
    /// Per-active-product chance of a restock once the event fires.
    pub probability:  f64,
    pub quantity_min: u32,
    pub quantity_max: u32,
}

impl Default for RestockConfig {
    fn default() -> Self {
        Self { probability: 0.30, quantity_min: 10, quantity_max: 100 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SupplierRechargeConfig {
    pub interval_ticks:       Tick,
    pub supplier_probability: f64,
    pub product_probability:  f64,
    pub quantity_min: u32,
    pub quantity_max: u32,
}

impl Default for SupplierRechargeConfig {
    fn default() -> Self {
        Self {
            interval_ticks:       10,
            supplier_probability: 0.5,
            product_probability:  0.5,
            quantity_min:         5,
            quantity_max:         50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InflationConfig {
    /// Per-active-product chance of being inflated once the event fires.
    pub selection_probability: f64,
    pub pct_min: u32,
    pub pct_max: u32,
    /// Points subtracted from the drawn percentage while penalized.
    pub penalty_pct:       u32,
    /// A penalized percentage never drops below this.
    pub penalty_floor_pct: u32,
    pub penalty_duration_ticks: Tick,
    /// Ticks after an inflation before the price starts coming back.
    pub return_delay_ticks:   Tick,
    pub decay_duration_ticks: Tick,
    /// Permanent markup left once the decay completes.
    pub final_pct: f64,
}

impl Default for InflationConfig {
    fn default() -> Self {
        Self {
            selection_probability:  0.20,
            pct_min:                10,
            pct_max:                40,
            penalty_pct:            15,
            penalty_floor_pct:      5,
            penalty_duration_ticks: 30,
            return_delay_ticks:     5,
            decay_duration_ticks:   20,
            final_pct:              10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Internal gate rolled each time the routine runs.
    pub trigger_probability: f64,
    /// Fraction of each partition toggled when the gate passes.
    pub rate: f64,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self { trigger_probability: 0.5, rate: 0.2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriceRuleConfig {
    pub reference_stock:   f64,
    pub stock_sensitivity: f64,
    pub jitter_min: f64,
    pub jitter_max: f64,
    /// Clamp on the stock factor so prices stay positive and bounded.
    pub min_stock_factor: f64,
    pub max_stock_factor: f64,
}

impl Default for PriceRuleConfig {
    fn default() -> Self {
        Self {
            reference_stock:   50.0,
            stock_sensitivity: 100.0,
            jitter_min:        0.95,
            jitter_max:        1.05,
            min_stock_factor:  0.1,
            max_stock_factor:  3.0,
        }
    }
}

// ── Root ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub world:             WorldConfig,
    pub scheduler:         SchedulerConfig,
    pub budget_recharge:   BudgetRechargeConfig,
    pub restock:           RestockConfig,
    pub supplier_recharge: SupplierRechargeConfig,
    pub inflation:         InflationConfig,
    pub availability:      AvailabilityConfig,
    pub price_rule:        PriceRuleConfig,
}

impl SimConfig {
    /// Load from the data/ directory.
    /// In tests, use SimConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/{CONFIG_FILE}");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for unit tests: a small world, no jitter, and every
    /// probability forced to 1.0 so each roll succeeds.
    pub fn default_test() -> Self {
        Self {
            world: WorldConfig {
                product_count:     6,
                supplier_count:    3,
                company_count:     4,
                carry_probability: 1.0,
                ..WorldConfig::default()
            },
            scheduler: SchedulerConfig {
                tick_interval:               1,
                budget_recharge_probability: 1.0,
                restock_probability:         1.0,
                inflation_probability:       1.0,
                availability_probability:    1.0,
            },
            budget_recharge: BudgetRechargeConfig {
                probability: 1.0,
                ..BudgetRechargeConfig::default()
            },
            restock: RestockConfig {
                probability: 1.0,
                ..RestockConfig::default()
            },
            supplier_recharge: SupplierRechargeConfig {
                interval_ticks:       5,
                supplier_probability: 1.0,
                product_probability:  1.0,
                ..SupplierRechargeConfig::default()
            },
            inflation: InflationConfig {
                selection_probability: 1.0,
                ..InflationConfig::default()
            },
            availability: AvailabilityConfig {
                trigger_probability: 1.0,
                rate: 0.2,
            },
            price_rule: PriceRuleConfig {
                jitter_min: 1.0,
                jitter_max: 1.0,
                ..PriceRuleConfig::default()
            },
        }
    }

    /// Reject bounds that would make a routine misbehave.
    pub fn validate(&self) -> SimResult<()> {
        let probabilities = [
            ("world.carry_probability", self.world.carry_probability),
            ("scheduler.budget_recharge_probability", self.scheduler.budget_recharge_probability),
            ("scheduler.restock_probability", self.scheduler.restock_probability),
            ("scheduler.inflation_probability", self.scheduler.inflation_probability),
            ("scheduler.availability_probability", self.scheduler.availability_probability),
            ("budget_recharge.probability", self.budget_recharge.probability),
            ("restock.probability", self.restock.probability),
            ("supplier_recharge.supplier_probability", self.supplier_recharge.supplier_probability),
            ("supplier_recharge.product_probability", self.supplier_recharge.product_probability),
            ("inflation.selection_probability", self.inflation.selection_probability),
            ("availability.trigger_probability", self.availability.trigger_probability),
            ("availability.rate", self.availability.rate),
        ];
        for (field, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidConfig(format!(
                    "{field} must be within [0, 1], got {p}"
                )));
            }
        }

        let ranges = [
            ("world.base_price", self.world.base_price_min, self.world.base_price_max),
            ("world.stock", self.world.stock_min as f64, self.world.stock_max as f64),
            ("world.budget", self.world.budget_min, self.world.budget_max),
            ("budget_recharge.amount", self.budget_recharge.amount_min as f64, self.budget_recharge.amount_max as f64),
            ("restock.quantity", self.restock.quantity_min as f64, self.restock.quantity_max as f64),
            ("supplier_recharge.quantity", self.supplier_recharge.quantity_min as f64, self.supplier_recharge.quantity_max as f64),
            ("inflation.pct", self.inflation.pct_min as f64, self.inflation.pct_max as f64),
            ("price_rule.jitter", self.price_rule.jitter_min, self.price_rule.jitter_max),
            ("price_rule.stock_factor", self.price_rule.min_stock_factor, self.price_rule.max_stock_factor),
        ];
        for (field, min, max) in ranges {
            if min > max {
                return Err(SimError::InvalidConfig(format!(
                    "{field}: min ({min}) exceeds max ({max})"
                )));
            }
        }

        if self.world.base_price_min <= 0.0 {
            return Err(SimError::InvalidConfig("world.base_price_min must be > 0".into()));
        }
        if self.price_rule.stock_sensitivity <= 0.0 {
            return Err(SimError::InvalidConfig("price_rule.stock_sensitivity must be > 0".into()));
        }
        if self.scheduler.tick_interval == 0 || self.supplier_recharge.interval_ticks == 0 {
            return Err(SimError::InvalidConfig("tick intervals must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SimConfig::default().validate().unwrap();
        SimConfig::default_test().validate().unwrap();
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let json = r#"{ "restock": { "probability": 0.9 }, "scheduler": { "tick_interval": 3 } }"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.restock.probability, 0.9);
        assert_eq!(config.restock.quantity_max, RestockConfig::default().quantity_max);
        assert_eq!(config.scheduler.tick_interval, 3);
        assert_eq!(config.inflation, InflationConfig::default());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut config = SimConfig::default();
        config.inflation.pct_min = 50;
        config.inflation.pct_max = 10;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.restock.probability = 1.5;
        assert!(config.validate().is_err());
    }
}
