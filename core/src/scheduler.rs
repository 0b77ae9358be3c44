//! Event scheduler: decides which routines fire on a tick.
//!
//! Ticks that are not a multiple of `tick_interval` evaluate nothing.
//! On the others each event rolls its own probability, in the fixed
//! order recharge → restock → inflation → availability.

use crate::{
    config::SchedulerConfig,
    rng::RoutineRng,
    routine::EventKind,
    types::Tick,
};

pub struct EventScheduler {
    config: SchedulerConfig,
}

impl EventScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn is_evaluation_tick(&self, tick: Tick) -> bool {
        self.config.tick_interval > 0 && tick % self.config.tick_interval == 0
    }

    pub fn probability(&self, kind: EventKind) -> f64 {
        match kind {
            EventKind::BudgetRecharge => self.config.budget_recharge_probability,
            EventKind::Restock        => self.config.restock_probability,
            EventKind::Inflation      => self.config.inflation_probability,
            EventKind::Availability   => self.config.availability_probability,
        }
    }

    /// Events whose roll succeeded this tick, in invocation order.
    pub fn due_events(&self, tick: Tick, rng: &mut RoutineRng) -> Vec<EventKind> {
        if !self.is_evaluation_tick(tick) {
            return Vec::new();
        }
        EventKind::ORDER
            .into_iter()
            .filter(|kind| rng.chance(self.probability(*kind)))
            .collect()
    }
}
