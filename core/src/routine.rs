//! Event routine trait.
//!
//! RULE: Every stochastic state mutator implements EventRoutine.
//! A routine reads and mutates only the store it is handed and draws
//! only from the RNG it is handed. It returns the log records it
//! produced; an empty vec means nothing happened this tick, which is
//! not an error.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::{RoutineSlot, RoutineRng},
    store::EntityStore,
    types::Tick,
};
use serde::{Deserialize, Serialize};

/// The four scheduled events, in their fixed invocation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    BudgetRecharge,
    Restock,
    Inflation,
    Availability,
}

impl EventKind {
    /// Invocation order within one tick.
    pub const ORDER: [EventKind; 4] = [
        EventKind::BudgetRecharge,
        EventKind::Restock,
        EventKind::Inflation,
        EventKind::Availability,
    ];

    pub fn slot(&self) -> RoutineSlot {
        match self {
            Self::BudgetRecharge => RoutineSlot::BudgetRecharge,
            Self::Restock        => RoutineSlot::Restock,
            Self::Inflation      => RoutineSlot::Inflation,
            Self::Availability   => RoutineSlot::Availability,
        }
    }

    pub fn name(&self) -> &'static str {
        self.slot().name()
    }
}

/// The contract every scheduled routine must fulfill.
pub trait EventRoutine: Send {
    fn kind(&self) -> EventKind;

    /// Apply the routine once for `tick`.
    fn apply(
        &mut self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> SimResult<Vec<SimEvent>>;
}
