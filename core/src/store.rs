//! The entity store: the whole in-memory world.
//!
//! RULE: There is no ambient global state. Routines receive the store
//! as an explicit `&mut EntityStore`.
//!
//! The store is not synchronized. A host that serves reads while the
//! engine ticks must wrap it in a lock or funnel writes through one
//! owner.

use crate::{
    error::SimResult,
    model::{Company, InflationState, Product, Supplier},
    pricing::{PriceRule, PriceTable},
    repository::InMemoryRepository,
    rng::RoutineRng,
    types::ProductId,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    pub products:  InMemoryRepository<Product>,
    pub suppliers: InMemoryRepository<Supplier>,
    pub companies: InMemoryRepository<Company>,
    prices:    PriceTable,
    inflation: BTreeMap<ProductId, InflationState>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw lists. Duplicate ids are rejected.
    pub fn from_parts(
        products: Vec<Product>,
        suppliers: Vec<Supplier>,
        companies: Vec<Company>,
        prices: PriceTable,
    ) -> SimResult<Self> {
        Ok(Self {
            products:  InMemoryRepository::from_items(products)?,
            suppliers: InMemoryRepository::from_items(suppliers)?,
            companies: InMemoryRepository::from_items(companies)?,
            prices,
            inflation: BTreeMap::new(),
        })
    }

    /// Drop every entity, price and inflation record.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Destructive replace: nothing of the previous contents survives.
    pub fn replace_all(&mut self, other: EntityStore) {
        *self = other;
    }

    pub fn active_product_ids(&self) -> Vec<ProductId> {
        self.products.iter().filter(|p| p.active).map(|p| p.id).collect()
    }

    pub fn inactive_product_ids(&self) -> Vec<ProductId> {
        self.products.iter().filter(|p| !p.active).map(|p| p.id).collect()
    }

    // ── Prices ─────────────────────────────────────────────────

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn price(&self, product_id: ProductId, supplier_id: u32) -> Option<f64> {
        self.prices.get(product_id, supplier_id)
    }

    /// Recompute every (product, supplier) quote from current stock.
    /// Returns the number of quotes written.
    pub fn refresh_prices(&mut self, rule: &PriceRule, rng: &mut RoutineRng) -> usize {
        let mut table = PriceTable::new();
        for supplier in self.suppliers.iter() {
            for (&product_id, &stock) in &supplier.stock_by_product {
                match self.products.get_ref(product_id) {
                    Ok(product) => {
                        let price = rule.quote(product.base_price, stock, rng);
                        table.insert(product_id, supplier.id, price);
                    }
                    Err(e) => {
                        log::warn!("pricing: supplier {} skipped: {e}", supplier.id);
                    }
                }
            }
        }
        let written = table.len();
        self.prices = table;
        written
    }

    // ── Inflation bookkeeping ──────────────────────────────────

    pub fn inflation_state(&self, product_id: ProductId) -> Option<&InflationState> {
        self.inflation.get(&product_id)
    }

    pub fn set_inflation_state(&mut self, product_id: ProductId, state: InflationState) {
        self.inflation.insert(product_id, state);
    }

    pub fn inflation_states_mut(&mut self) -> impl Iterator<Item = (&ProductId, &mut InflationState)> {
        self.inflation.iter_mut()
    }

    /// Products with a decay currently in flight.
    pub fn decaying_product_ids(&self) -> Vec<ProductId> {
        self.inflation
            .iter()
            .filter(|(_, s)| s.decay.is_some())
            .map(|(id, _)| *id)
            .collect()
    }

    // ── Summaries ──────────────────────────────────────────────

    pub fn total_budget(&self) -> f64 {
        self.companies.iter().map(|c| c.budget).sum()
    }

    pub fn mean_base_price(&self) -> f64 {
        if self.products.is_empty() {
            return 0.0;
        }
        self.products.iter().map(|p| p.base_price).sum::<f64>() / self.products.len() as f64
    }

    pub fn total_stock(&self) -> u64 {
        self.suppliers
            .iter()
            .flat_map(|s| s.stock_by_product.values())
            .map(|&q| q as u64)
            .sum()
    }
}
