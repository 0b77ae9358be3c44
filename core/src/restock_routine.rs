//! Restock: suppliers receive new units of active products.
//!
//! Each active product rolls independently. On success one supplier is
//! drawn from all suppliers, whether or not it already carries the
//! product, and receives a quantity drawn from [quantity_min,
//! quantity_max]. A missing stock entry is created.

use crate::{
    config::RestockConfig,
    error::SimResult,
    event::SimEvent,
    rng::RoutineRng,
    routine::{EventKind, EventRoutine},
    store::EntityStore,
    types::Tick,
};
use std::collections::BTreeSet;

pub struct RestockRoutine {
    config: RestockConfig,
}

impl RestockRoutine {
    pub fn new(config: RestockConfig) -> Self {
        Self { config }
    }

    pub fn apply_restock(
        &self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> Vec<SimEvent> {
        let supplier_ids = store.suppliers.ids();
        if supplier_ids.is_empty() {
            log::debug!("tick={tick} restock: no suppliers, skipping");
            return Vec::new();
        }

        let mut events = Vec::new();
        let mut total_quantity: u64 = 0;
        let mut touched = BTreeSet::new();

        for product_id in store.active_product_ids() {
            if !rng.chance(self.config.probability) {
                continue;
            }
            let Some(&supplier_id) = rng.pick(&supplier_ids) else {
                continue;
            };
            let quantity =
                rng.int_between(self.config.quantity_min as u64, self.config.quantity_max as u64) as u32;

            let supplier = match store.suppliers.get_mut(supplier_id) {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("tick={tick} restock: product {product_id} skipped: {e}");
                    continue;
                }
            };
            let (stock_before, stock_after) = supplier.add_stock(product_id, quantity);

            total_quantity += quantity as u64;
            touched.insert(supplier_id);
            events.push(SimEvent::ProductRestocked {
                tick,
                product_id,
                supplier_id,
                quantity,
                stock_before,
                stock_after,
            });
        }

        if events.is_empty() {
            return events;
        }

        let restocks = events.len();
        log::info!(
            "tick={tick} restock: {restocks} restocks, {total_quantity} units, {} suppliers",
            touched.len()
        );
        events.push(SimEvent::RestockSummary {
            tick,
            restocks,
            total_quantity,
            suppliers_touched: touched.len(),
        });
        events
    }
}

impl EventRoutine for RestockRoutine {
    fn kind(&self) -> EventKind { EventKind::Restock }

    fn apply(
        &mut self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> SimResult<Vec<SimEvent>> {
        Ok(self.apply_restock(tick, store, rng))
    }
}
