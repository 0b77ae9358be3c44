//! Budget recharge: companies receive fresh funds.
//!
//! Each company rolls independently. A recharged company gets a whole
//! amount drawn from [amount_min, amount_max] added to its budget.

use crate::{
    config::BudgetRechargeConfig,
    error::SimResult,
    event::SimEvent,
    rng::RoutineRng,
    routine::{EventKind, EventRoutine},
    store::EntityStore,
    types::Tick,
};

pub struct BudgetRechargeRoutine {
    config: BudgetRechargeConfig,
}

impl BudgetRechargeRoutine {
    pub fn new(config: BudgetRechargeConfig) -> Self {
        Self { config }
    }

    /// One record per recharged company, then one summary record if
    /// any company was recharged.
    pub fn apply_budget_recharge(
        &self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let mut total = 0.0;

        for company in store.companies.iter_mut() {
            if !rng.chance(self.config.probability) {
                continue;
            }
            let amount = rng.int_between(self.config.amount_min, self.config.amount_max) as f64;
            let budget_before = company.budget;
            company.budget += amount;
            total += amount;

            log::debug!(
                "tick={tick} budget_recharge: company {} +{amount:.0} -> {:.2}",
                company.id, company.budget
            );
            events.push(SimEvent::BudgetRecharged {
                tick,
                company_id:   company.id,
                company_name: company.name.clone(),
                amount,
                budget_before,
                budget_after: company.budget,
            });
        }

        if events.is_empty() {
            return events;
        }

        let companies = events.len();
        let mean = total / companies as f64;
        log::info!(
            "tick={tick} budget_recharge: {companies} companies, total {total:.0}, mean {mean:.0}"
        );
        events.push(SimEvent::BudgetRechargeSummary { tick, companies, total, mean });
        events
    }
}

impl EventRoutine for BudgetRechargeRoutine {
    fn kind(&self) -> EventKind { EventKind::BudgetRecharge }

    fn apply(
        &mut self,
        tick: Tick,
        store: &mut EntityStore,
        rng: &mut RoutineRng,
    ) -> SimResult<Vec<SimEvent>> {
        Ok(self.apply_budget_recharge(tick, store, rng))
    }
}
