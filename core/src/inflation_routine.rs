//! Inflation: price shocks on active products, followed by a slow
//! return toward a residual markup.
//!
//! Selection: every active product rolls `selection_probability`
//! independently. A selected product draws a whole percentage from
//! [pct_min, pct_max]. If it was inflated within the last
//! `penalty_duration_ticks`, `penalty_pct` points are taken off, never
//! going below `penalty_floor_pct`.
//!
//! Decay: `return_delay_ticks` after an inflation the price starts
//! falling linearly, reaching `original * (1 + final_pct/100)` after
//! `decay_duration_ticks`. The decay pass runs every tick, not only
//! when the event fires.

use crate::{
    config::InflationConfig,
    error::SimResult,
    event::SimEvent,
    model::{InflationPenaltyTimer, InflationState, PriceDecay},
    rng::RoutineRng,
    routine::{EventKind, EventRoutine},
    store::EntityStore,
    types::{ProductId, Tick},
};

/// Price along the decay line after `elapsed` of `duration` ticks.
/// Lands exactly on `final_price` once `elapsed >= duration`.
pub fn decay_price(inflated_price: f64, final_price: f64, elapsed: Tick, duration: Tick) -> f64 {
    if elapsed >= duration {
        return final_price;
    }
    let progress = elapsed as f64 / duration as f64;
    inflated_price - (inflated_price - final_price) * progress
}

pub struct InflationRoutine {
    config: InflationConfig,
}

impl InflationRoutine {
    pub fn new(config: InflationConfig) -> Self {
        Self { config }
    }

    /// Percentage actually applied for a drawn `nominal_pct`.
    pub fn effective_pct(&self, nominal_pct: u32, penalized: bool) -> u32 {
        if !penalized {
            return nominal_pct;
        }
        nominal_pct
            .saturating_sub(self.config.penalty_pct)
            .max(self.config.penalty_floor_pct)
    }

    pub fn apply_inflation(
        &self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> Vec<SimEvent> {
        let mut events = Vec::new();

        for product_id in store.active_product_ids() {
            if !rng.chance(self.config.selection_probability) {
                continue;
            }
            let nominal_pct =
                rng.int_between(self.config.pct_min as u64, self.config.pct_max as u64) as u32;
            if let Some(event) = self.inflate(tick, product_id, nominal_pct, store) {
                events.push(event);
            }
        }

        if !events.is_empty() {
            log::info!("tick={tick} inflation: {} products inflated", events.len());
        }
        events
    }

    /// Inflate one product by `nominal_pct` (before any penalty).
    /// Returns None, after logging, if the product cannot be found.
    pub fn inflate(
        &self,
        tick: Tick,
        product_id: ProductId,
        nominal_pct: u32,
        store: &mut EntityStore,
    ) -> Option<SimEvent> {
        let previous = store.inflation_state(product_id).copied();
        let penalized = previous
            .map(|s| s.timer.is_penalized(tick, self.config.penalty_duration_ticks))
            .unwrap_or(false);
        let effective_pct = self.effective_pct(nominal_pct, penalized);

        let product = match store.products.get_mut(product_id) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("tick={tick} inflation: skipped: {e}");
                return None;
            }
        };
        let old_price = product.base_price;
        let new_price = old_price * (1.0 + effective_pct as f64 / 100.0);
        product.base_price = new_price;
        let product_name = product.name.clone();

        // A re-inflation mid-decay keeps the pre-episode anchor.
        let original_price = previous
            .and_then(|s| s.decay)
            .map(|d| d.original_price)
            .unwrap_or(old_price);
        let final_price = (original_price * (1.0 + self.config.final_pct / 100.0)).min(new_price);

        store.set_inflation_state(
            product_id,
            InflationState {
                timer: InflationPenaltyTimer::started(tick, self.config.penalty_duration_ticks),
                decay: Some(PriceDecay {
                    original_price,
                    inflated_price: new_price,
                    final_price,
                    applied_tick: tick,
                }),
            },
        );

        log::debug!(
            "tick={tick} inflation: product {product_id} {nominal_pct}% -> {effective_pct}% \
             (penalized={penalized}) {old_price:.2} -> {new_price:.2}"
        );
        Some(SimEvent::PriceInflated {
            tick,
            product_id,
            product_name,
            nominal_pct,
            effective_pct,
            penalty_applied: penalized,
            old_price,
            new_price,
        })
    }

    /// Move every in-flight decay one step along its line and refresh
    /// the penalty countdowns.
    pub fn advance_decay(&self, tick: Tick, store: &mut EntityStore) -> Vec<SimEvent> {
        let delay = self.config.return_delay_ticks;
        let duration = self.config.decay_duration_ticks;
        let mut moves = Vec::new();

        for (&product_id, state) in store.inflation_states_mut() {
            state.timer.refresh(tick, self.config.penalty_duration_ticks);
            let Some(decay) = state.decay else {
                continue;
            };
            let since = tick.saturating_sub(decay.applied_tick);
            if since < delay {
                continue;
            }
            let elapsed = since - delay;
            let price = decay_price(decay.inflated_price, decay.final_price, elapsed, duration);
            let finished = elapsed >= duration;
            if finished {
                state.decay = None;
            }
            moves.push((product_id, price, finished));
        }

        let mut events = Vec::new();
        for (product_id, new_price, finished) in moves {
            let product = match store.products.get_mut(product_id) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("tick={tick} inflation: decay skipped: {e}");
                    continue;
                }
            };
            let old_price = product.base_price;
            if old_price == new_price && !finished {
                continue;
            }
            product.base_price = new_price;
            events.push(SimEvent::PriceDecayed {
                tick,
                product_id,
                old_price,
                new_price,
                finished,
            });
        }
        events
    }
}

impl EventRoutine for InflationRoutine {
    fn kind(&self) -> EventKind { EventKind::Inflation }

    fn apply(
        &mut self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> SimResult<Vec<SimEvent>> {
        Ok(self.apply_inflation(tick, store, rng))
    }
}
