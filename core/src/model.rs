//! Entity records: products, suppliers, companies, and the per-product
//! inflation bookkeeping that travels with them.
//!
//! Field names are the snapshot wire names. Changing one breaks every
//! save file on disk.

use crate::types::{CompanyId, EntityId, ProductId, SupplierId, Tick};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Anything a repository can key by integer id.
pub trait Entity: Clone {
    /// Human-readable collection name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> EntityId;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    FinishedGood,
    Consumable,
    RawMaterial,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [
        ProductType::FinishedGood,
        ProductType::Consumable,
        ProductType::RawMaterial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinishedGood => "finished_good",
            Self::Consumable   => "consumable",
            Self::RawMaterial  => "raw_material",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Buy from whichever supplier quotes the lowest unit price.
    Cheapest,
    /// Buy only products of the company's preferred types.
    ByType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id:         ProductId,
    pub name:       String,
    pub base_price: f64,
    pub active:     bool,
    #[serde(rename = "type")]
    pub product_type: ProductType,
}

impl Entity for Product {
    const KIND: &'static str = "product";
    fn id(&self) -> EntityId { self.id }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id:           SupplierId,
    pub company_name: String,
    pub country:      String,
    pub continent:    String,
    /// Units on hand per product. Products the supplier never carried
    /// have no key at all.
    #[serde(default)]
    pub stock_by_product: BTreeMap<ProductId, u32>,
}

impl Supplier {
    pub fn stock_of(&self, product_id: ProductId) -> u32 {
        self.stock_by_product.get(&product_id).copied().unwrap_or(0)
    }

    /// Add `quantity` units, creating the entry if absent. Stock stops
    /// at u32::MAX; hitting the cap is logged.
    /// Returns (stock_before, stock_after).
    pub fn add_stock(&mut self, product_id: ProductId, quantity: u32) -> (u32, u32) {
        let entry = self.stock_by_product.entry(product_id).or_insert(0);
        let before = *entry;
        *entry = match before.checked_add(quantity) {
            Some(after) => after,
            None => {
                log::warn!(
                    "supplier {}: stock of product {product_id} capped at {} (+{quantity} from {before})",
                    self.id,
                    u32::MAX
                );
                u32::MAX
            }
        };
        (before, *entry)
    }
}

impl Entity for Supplier {
    const KIND: &'static str = "supplier";
    fn id(&self) -> EntityId { self.id }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id:      CompanyId,
    pub name:    String,
    pub country: String,
    /// Not clamped; purchases may drive it negative.
    pub budget:  f64,
    /// Budget at creation. Never mutated by the simulation.
    pub budget_initial:  f64,
    pub preferred_types: BTreeSet<ProductType>,
    pub strategy:        Strategy,
}

impl Entity for Company {
    const KIND: &'static str = "company";
    fn id(&self) -> EntityId { self.id }
}

/// Tracks how recently a product was inflated.
///
/// Created on the first inflation of a product, refreshed on every later
/// one, never removed independently of its product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InflationPenaltyTimer {
    pub last_inflation_tick:     Tick,
    pub penalty_active:          bool,
    pub remaining_penalty_ticks: Tick,
}

impl InflationPenaltyTimer {
    pub fn started(tick: Tick, penalty_duration: Tick) -> Self {
        Self {
            last_inflation_tick:     tick,
            penalty_active:          true,
            remaining_penalty_ticks: penalty_duration,
        }
    }

    /// A penalty applies while `tick - last_inflation_tick <= duration`.
    pub fn is_penalized(&self, tick: Tick, penalty_duration: Tick) -> bool {
        tick.saturating_sub(self.last_inflation_tick) <= penalty_duration
    }

    /// Recompute the countdown fields for `tick`.
    pub fn refresh(&mut self, tick: Tick, penalty_duration: Tick) {
        let elapsed = tick.saturating_sub(self.last_inflation_tick);
        self.penalty_active = self.is_penalized(tick, penalty_duration);
        self.remaining_penalty_ticks = penalty_duration.saturating_sub(elapsed);
    }
}

/// A price on its way back down after an inflation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceDecay {
    /// Price before the first inflation of this episode.
    pub original_price: f64,
    pub inflated_price: f64,
    /// Where the trajectory ends: original price plus the residual markup.
    pub final_price:    f64,
    pub applied_tick:   Tick,
}

/// Everything the inflation routine remembers about one product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InflationState {
    pub timer: InflationPenaltyTimer,
    pub decay: Option<PriceDecay>,
}
