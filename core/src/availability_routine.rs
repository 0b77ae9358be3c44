//! Availability variation: products come and go from the market.
//!
//! The routine rolls its own gate first. When it passes, products are
//! split into active and inactive sets, then a fixed fraction of each
//! set is toggled: `max(1, ceil(n * rate))` for a non-empty set, zero
//! for an empty one. Both sets are taken before any toggle, so a
//! product never flips twice in one run.

use crate::{
    config::AvailabilityConfig,
    error::SimResult,
    event::SimEvent,
    rng::RoutineRng,
    routine::{EventKind, EventRoutine},
    store::EntityStore,
    types::{ProductId, Tick},
};

/// How many of `n` products to toggle at `rate`.
pub fn sample_size(n: usize, rate: f64) -> usize {
    if n == 0 {
        return 0;
    }
    ((n as f64 * rate).ceil() as usize).clamp(1, n)
}

pub struct AvailabilityRoutine {
    config: AvailabilityConfig,
}

impl AvailabilityRoutine {
    pub fn new(config: AvailabilityConfig) -> Self {
        Self { config }
    }

    pub fn apply_availability_variation(
        &self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> Vec<SimEvent> {
        if !rng.chance(self.config.trigger_probability) {
            return Vec::new();
        }

        let active = store.active_product_ids();
        let inactive = store.inactive_product_ids();
        let to_deactivate = sample(&active, self.config.rate, rng);
        let to_reactivate = sample(&inactive, self.config.rate, rng);

        let mut events = Vec::new();
        let mut deactivated = 0usize;
        let mut reactivated = 0usize;

        for (ids, make_active) in [(to_deactivate, false), (to_reactivate, true)] {
            for product_id in ids {
                let product = match store.products.get_mut(product_id) {
                    Ok(p) => p,
                    Err(e) => {
                        log::warn!("tick={tick} availability: skipped: {e}");
                        continue;
                    }
                };
                product.active = make_active;
                let product_name = product.name.clone();
                if make_active {
                    reactivated += 1;
                    events.push(SimEvent::ProductReactivated { tick, product_id, product_name });
                } else {
                    deactivated += 1;
                    events.push(SimEvent::ProductDeactivated { tick, product_id, product_name });
                }
            }
        }

        if events.is_empty() {
            return events;
        }

        let active_after = store.active_product_ids().len();
        let inactive_after = store.products.len() - active_after;
        log::info!(
            "tick={tick} availability: {deactivated} withdrawn, {reactivated} restored"
        );
        events.push(SimEvent::AvailabilitySummary {
            tick,
            deactivated,
            reactivated,
            active_after,
            inactive_after,
        });
        events
    }
}

fn sample(ids: &[ProductId], rate: f64, rng: &mut RoutineRng) -> Vec<ProductId> {
    let k = sample_size(ids.len(), rate);
    rng.sample_indices(ids.len(), k)
        .into_iter()
        .map(|i| ids[i])
        .collect()
}

impl EventRoutine for AvailabilityRoutine {
    fn kind(&self) -> EventKind { EventKind::Availability }

    fn apply(
        &mut self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> SimResult<Vec<SimEvent>> {
        Ok(self.apply_availability_variation(tick, store, rng))
    }
}
