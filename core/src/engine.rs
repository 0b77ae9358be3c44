//! The simulation engine.
//!
//! EXECUTION ORDER within one tick (fixed, never reordered):
//!   1. Scheduler rolls; fired routines run in the order
//!      budget recharge → restock → inflation → availability
//!   2. Inflation decay pass          (every tick)
//!   3. Supplier stock recharge       (every `interval_ticks`)
//!   4. Price table refresh           (every tick)
//!
//! RULES:
//!   - All randomness flows through the RngBank.
//!   - A failing routine is logged and skipped; later routines still run.
//!   - Every record is appended to the journal when one is attached.

use crate::{
    availability_routine::AvailabilityRoutine,
    budget_recharge_routine::BudgetRechargeRoutine,
    clock::SimClock,
    config::SimConfig,
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    inflation_routine::InflationRoutine,
    journal::EventJournal,
    pricing::PriceRule,
    restock_routine::RestockRoutine,
    rng::{RngBank, RoutineSlot},
    routine::{EventKind, EventRoutine},
    scheduler::EventScheduler,
    snapshot::SnapshotService,
    store::EntityStore,
    supplier_recharge_routine::SupplierRechargeRoutine,
    types::{RunId, Tick},
    world::generate_world,
};
use serde::Serialize;
use std::path::PathBuf;

/// Default directory for the single save slot. Kept apart from the
/// config directory because every save purges its directory.
pub const DEFAULT_SAVE_DIR: &str = "data/saves";

pub struct SimEngine {
    pub run_id:   RunId,
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    pub config:   SimConfig,
    pub store:    EntityStore,
    scheduler:    EventScheduler,
    routines:     Vec<Box<dyn EventRoutine>>,
    decay:        InflationRoutine,
    supplier_recharge: SupplierRechargeRoutine,
    price_rule:   PriceRule,
    snapshots:    SnapshotService,
    journal:      Option<EventJournal>,
}

/// Headline numbers for one moment of the world.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorldSummary {
    pub tick:            Tick,
    pub products:        usize,
    pub active_products: usize,
    pub suppliers:       usize,
    pub companies:       usize,
    pub total_budget:    f64,
    pub mean_base_price: f64,
    pub total_stock:     u64,
    pub quotes:          usize,
}

impl SimEngine {
    /// Engine over an existing store. Registers the four scheduled
    /// routines in their invocation order.
    pub fn new(run_id: RunId, seed: u64, config: SimConfig, store: EntityStore) -> Self {
        let mut engine = Self {
            clock:     SimClock::new(run_id.clone()),
            rng_bank:  RngBank::new(seed),
            scheduler: EventScheduler::new(config.scheduler.clone()),
            routines:  Vec::new(),
            decay:     InflationRoutine::new(config.inflation.clone()),
            supplier_recharge: SupplierRechargeRoutine::new(config.supplier_recharge.clone()),
            price_rule: PriceRule::new(config.price_rule.clone()),
            snapshots: SnapshotService::new(DEFAULT_SAVE_DIR),
            journal:   None,
            config,
            store,
            run_id,
        };
        let routines: [Box<dyn EventRoutine>; 4] = [
            Box::new(BudgetRechargeRoutine::new(engine.config.budget_recharge.clone())),
            Box::new(RestockRoutine::new(engine.config.restock.clone())),
            Box::new(InflationRoutine::new(engine.config.inflation.clone())),
            Box::new(AvailabilityRoutine::new(engine.config.availability.clone())),
        ];
        for routine in routines {
            engine.register(routine);
        }
        engine
    }

    /// Register a routine, replacing any routine of the same kind.
    /// Invocation order is fixed by EventKind::ORDER, not by
    /// registration order.
    pub fn register(&mut self, routine: Box<dyn EventRoutine>) {
        let kind = routine.kind();
        self.routines.retain(|r| r.kind() != kind);
        self.routines.push(routine);
    }

    /// Validate `config`, generate a world from `seed` and price it.
    pub fn build(run_id: RunId, seed: u64, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut world_rng = RngBank::new(seed).for_routine(RoutineSlot::World, 0);
        let store = generate_world(&config.world, &mut world_rng)?;
        let mut engine = SimEngine::new(run_id, seed, config, store);
        let mut price_rng = engine.rng_bank.for_routine(RoutineSlot::Pricing, 0);
        engine.store.refresh_prices(&engine.price_rule, &mut price_rng);
        Ok(engine)
    }

    /// Fully wired engine on SimConfig::default_test().
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        Self::build(run_id, seed, SimConfig::default_test())
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshots = SnapshotService::new(dir);
        self
    }

    pub fn with_journal(mut self, journal: EventJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn journal(&self) -> Option<&EventJournal> {
        self.journal.as_ref()
    }

    /// Advance one tick. This is the core simulation step.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        assert!(!self.clock.paused, "tick() called on paused engine");

        let tick = self.clock.advance();
        let mut tick_events = vec![SimEvent::TickStarted { tick }];

        let mut scheduler_rng = self.rng_bank.for_routine(RoutineSlot::Scheduler, tick);
        let due = self.scheduler.due_events(tick, &mut scheduler_rng);

        for kind in due {
            let mut rng = self.rng_bank.for_routine(kind.slot(), tick);
            let Some(routine) = self.routines.iter_mut().find(|r| r.kind() == kind) else {
                log::warn!("tick={tick} engine: no routine registered for {}", kind.name());
                continue;
            };
            match routine.apply(tick, &mut self.store, &mut rng) {
                Ok(events) => {
                    self.record(tick, kind.name(), &events)?;
                    tick_events.extend(events);
                }
                Err(e) => log::error!("tick={tick} {}: failed: {e}", kind.name()),
            }
        }

        let decayed = self.decay.advance_decay(tick, &mut self.store);
        self.record(tick, EventKind::Inflation.name(), &decayed)?;
        tick_events.extend(decayed);

        let mut recharge_rng = self.rng_bank.for_routine(RoutineSlot::SupplierRecharge, tick);
        let recharged = self
            .supplier_recharge
            .apply_supplier_recharge(tick, &mut self.store, &mut recharge_rng);
        self.record(tick, RoutineSlot::SupplierRecharge.name(), &recharged)?;
        tick_events.extend(recharged);

        let mut price_rng = self.rng_bank.for_routine(RoutineSlot::Pricing, tick);
        let quotes = self.store.refresh_prices(&self.price_rule, &mut price_rng);
        log::debug!("tick={tick} pricing: {quotes} quotes refreshed");

        tick_events.push(SimEvent::TickCompleted { tick });
        Ok(tick_events)
    }

    /// Run n ticks in a loop. Returns every record produced.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<Vec<SimEvent>> {
        self.clock.resume();
        let mut all = Vec::new();
        for _ in 0..n {
            match self.tick() {
                Ok(events) => all.extend(events),
                Err(e) => {
                    self.clock.pause();
                    return Err(e);
                }
            }
        }
        self.clock.pause();
        Ok(all)
    }

    /// Save the store to the snapshot directory.
    pub fn save_snapshot(&self, name: Option<&str>) -> SimResult<PathBuf> {
        self.snapshots.save(&self.store, self.clock.current_tick, name)
    }

    /// Replace the store with a saved snapshot. Ok(false) if there is
    /// no such snapshot.
    pub fn load_snapshot(&mut self, name: Option<&str>) -> SimResult<bool> {
        match self.snapshots.load(&mut self.store, name)? {
            Some(metadata) => {
                self.clock.rewind_to(metadata.tick);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            tick:            self.clock.current_tick,
            products:        self.store.products.len(),
            active_products: self.store.active_product_ids().len(),
            suppliers:       self.store.suppliers.len(),
            companies:       self.store.companies.len(),
            total_budget:    self.store.total_budget(),
            mean_base_price: self.store.mean_base_price(),
            total_stock:     self.store.total_stock(),
            quotes:          self.store.prices().len(),
        }
    }

    fn record(&self, tick: Tick, routine: &str, events: &[SimEvent]) -> SimResult<()> {
        let Some(journal) = &self.journal else {
            return Ok(());
        };
        for event in events {
            let entry = EventLogEntry {
                id:         None,
                run_id:     self.run_id.clone(),
                tick,
                routine:    routine.to_string(),
                event_type: event.event_type().to_string(),
                summary:    event.summary(),
                payload:    serde_json::to_string(event)?,
            };
            journal.append(&entry)?;
        }
        Ok(())
    }
}
