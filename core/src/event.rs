//! Log records emitted by the engine and the event routines.
//!
//! Every record carries its tick and serializes with a `type`
//! discriminator. Consumers dispatch on that tag.
//! Variants may be added: never removed or reordered.

use crate::types::{CompanyId, ProductId, RunId, SupplierId, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick: Tick,
    },

    // ── Budget recharge ────────────────────────────
    BudgetRecharged {
        tick: Tick,
        company_id: CompanyId,
        company_name: String,
        amount: f64,
        budget_before: f64,
        budget_after: f64,
    },
    BudgetRechargeSummary {
        tick: Tick,
        companies: usize,
        total: f64,
        mean: f64,
    },

    // ── Restock ────────────────────────────────────
    ProductRestocked {
        tick: Tick,
        product_id: ProductId,
        supplier_id: SupplierId,
        quantity: u32,
        stock_before: u32,
        stock_after: u32,
    },
    RestockSummary {
        tick: Tick,
        restocks: usize,
        total_quantity: u64,
        suppliers_touched: usize,
    },

    // ── Supplier stock recharge ────────────────────
    SupplierStockRecharged {
        tick: Tick,
        supplier_id: SupplierId,
        product_id: ProductId,
        quantity: u32,
        stock_before: u32,
        stock_after: u32,
    },
    SupplierRechargeSummary {
        tick: Tick,
        suppliers: usize,
        recharges: usize,
        total_quantity: u64,
    },

    // ── Inflation ──────────────────────────────────
    PriceInflated {
        tick: Tick,
        product_id: ProductId,
        product_name: String,
        nominal_pct: u32,
        effective_pct: u32,
        penalty_applied: bool,
        old_price: f64,
        new_price: f64,
    },
    PriceDecayed {
        tick: Tick,
        product_id: ProductId,
        old_price: f64,
        new_price: f64,
        finished: bool,
    },

    // ── Availability ───────────────────────────────
    ProductDeactivated {
        tick: Tick,
        product_id: ProductId,
        product_name: String,
    },
    ProductReactivated {
        tick: Tick,
        product_id: ProductId,
        product_name: String,
    },
    AvailabilitySummary {
        tick: Tick,
        deactivated: usize,
        reactivated: usize,
        active_after: usize,
        inactive_after: usize,
    },
}

impl SimEvent {
    pub fn tick(&self) -> Tick {
        match self {
            Self::TickStarted { tick }
            | Self::TickCompleted { tick }
            | Self::BudgetRecharged { tick, .. }
            | Self::BudgetRechargeSummary { tick, .. }
            | Self::ProductRestocked { tick, .. }
            | Self::RestockSummary { tick, .. }
            | Self::SupplierStockRecharged { tick, .. }
            | Self::SupplierRechargeSummary { tick, .. }
            | Self::PriceInflated { tick, .. }
            | Self::PriceDecayed { tick, .. }
            | Self::ProductDeactivated { tick, .. }
            | Self::ProductReactivated { tick, .. }
            | Self::AvailabilitySummary { tick, .. } => *tick,
        }
    }

    /// Stable string name, identical to the serialized `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TickStarted { .. }             => "tick_started",
            Self::TickCompleted { .. }           => "tick_completed",
            Self::BudgetRecharged { .. }         => "budget_recharged",
            Self::BudgetRechargeSummary { .. }   => "budget_recharge_summary",
            Self::ProductRestocked { .. }        => "product_restocked",
            Self::RestockSummary { .. }          => "restock_summary",
            Self::SupplierStockRecharged { .. }  => "supplier_stock_recharged",
            Self::SupplierRechargeSummary { .. } => "supplier_recharge_summary",
            Self::PriceInflated { .. }           => "price_inflated",
            Self::PriceDecayed { .. }            => "price_decayed",
            Self::ProductDeactivated { .. }      => "product_deactivated",
            Self::ProductReactivated { .. }      => "product_reactivated",
            Self::AvailabilitySummary { .. }     => "availability_summary",
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(
            self,
            Self::BudgetRechargeSummary { .. }
                | Self::RestockSummary { .. }
                | Self::SupplierRechargeSummary { .. }
                | Self::AvailabilitySummary { .. }
        )
    }

    /// One human-readable line describing the record.
    pub fn summary(&self) -> String {
        match self {
            Self::TickStarted { tick } => format!("tick {tick} started"),
            Self::TickCompleted { tick } => format!("tick {tick} completed"),
            Self::BudgetRecharged { company_name, amount, budget_after, .. } => {
                format!("{company_name} budget +{amount:.2} (now {budget_after:.2})")
            }
            Self::BudgetRechargeSummary { companies, total, mean, .. } => {
                format!("{companies} companies recharged, total {total:.2}, mean {mean:.2}")
            }
            Self::ProductRestocked { product_id, supplier_id, quantity, stock_after, .. } => {
                format!("supplier {supplier_id} restocked product {product_id} +{quantity} (now {stock_after})")
            }
            Self::RestockSummary { restocks, total_quantity, suppliers_touched, .. } => {
                format!("{restocks} restocks, {total_quantity} units across {suppliers_touched} suppliers")
            }
            Self::SupplierStockRecharged { supplier_id, product_id, quantity, stock_after, .. } => {
                format!("supplier {supplier_id} topped up product {product_id} +{quantity} (now {stock_after})")
            }
            Self::SupplierRechargeSummary { suppliers, recharges, total_quantity, .. } => {
                format!("{suppliers} suppliers topped up {recharges} products, {total_quantity} units")
            }
            Self::PriceInflated { product_name, effective_pct, penalty_applied, old_price, new_price, .. } => {
                let penalty = if *penalty_applied { " (penalized)" } else { "" };
                format!("{product_name} +{effective_pct}%{penalty}: {old_price:.2} -> {new_price:.2}")
            }
            Self::PriceDecayed { product_id, old_price, new_price, finished, .. } => {
                let done = if *finished { " (settled)" } else { "" };
                format!("product {product_id} price {old_price:.2} -> {new_price:.2}{done}")
            }
            Self::ProductDeactivated { product_name, .. } => format!("{product_name} withdrawn"),
            Self::ProductReactivated { product_name, .. } => format!("{product_name} back on sale"),
            Self::AvailabilitySummary { deactivated, reactivated, active_after, inactive_after, .. } => {
                format!(
                    "{deactivated} withdrawn, {reactivated} restored ({active_after} active, {inactive_after} inactive)"
                )
            }
        }
    }
}

/// The event log entry as persisted to the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub tick: Tick,
    pub routine: String,
    pub event_type: String,
    pub summary: String,
    pub payload: String, // JSON-serialized SimEvent
}
