//! Supplier stock recharge: periodic top-ups of existing lines.
//!
//! Runs every `interval_ticks`, independent of the scheduler's
//! probability table. Unlike restock it only tops up products a
//! supplier already carries; it never adds a product to a supplier.

use crate::{
    config::SupplierRechargeConfig,
    event::SimEvent,
    rng::RoutineRng,
    store::EntityStore,
    types::{ProductId, Tick},
};
use std::collections::BTreeSet;

pub struct SupplierRechargeRoutine {
    config: SupplierRechargeConfig,
}

impl SupplierRechargeRoutine {
    pub fn new(config: SupplierRechargeConfig) -> Self {
        Self { config }
    }

    pub fn is_due(&self, tick: Tick) -> bool {
        self.config.interval_ticks > 0 && tick % self.config.interval_ticks == 0
    }

    pub fn apply_supplier_recharge(
        &self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> Vec<SimEvent> {
        if !self.is_due(tick) {
            return Vec::new();
        }

        let active: BTreeSet<ProductId> = store.active_product_ids().into_iter().collect();
        let mut events = Vec::new();
        let mut suppliers = 0usize;
        let mut total_quantity: u64 = 0;

        for supplier in store.suppliers.iter_mut() {
            if !rng.chance(self.config.supplier_probability) {
                continue;
            }
            suppliers += 1;

            let carried: Vec<ProductId> = supplier
                .stock_by_product
                .keys()
                .copied()
                .filter(|id| active.contains(id))
                .collect();

            for product_id in carried {
                if !rng.chance(self.config.product_probability) {
                    continue;
                }
                let quantity = rng.int_between(
                    self.config.quantity_min as u64,
                    self.config.quantity_max as u64,
                ) as u32;
                let (stock_before, stock_after) = supplier.add_stock(product_id, quantity);
                total_quantity += quantity as u64;
                events.push(SimEvent::SupplierStockRecharged {
                    tick,
                    supplier_id: supplier.id,
                    product_id,
                    quantity,
                    stock_before,
                    stock_after,
                });
            }
        }

        if events.is_empty() {
            return events;
        }

        let recharges = events.len();
        log::info!(
            "tick={tick} supplier_recharge: {suppliers} suppliers, {recharges} lines, {total_quantity} units"
        );
        events.push(SimEvent::SupplierRechargeSummary {
            tick,
            suppliers,
            recharges,
            total_quantity,
        });
        events
    }
}
