//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through RoutineRng instances derived
//! from the single master seed handed to the engine.
//!
//! Each routine gets its own RNG stream per tick, seeded from
//! (master_seed, routine slot, tick). This means:
//!   - Adding a new routine never changes existing routines' streams.
//!   - A routine's draws at tick N do not depend on how many draws
//!     it made at earlier ticks.

use crate::types::Tick;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single routine.
pub struct RoutineRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl RoutineRng {
    /// Create an RNG from the master seed and a stable stream index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, stream: u64) -> Self {
        let derived_seed = master_seed ^ (stream.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    /// p >= 1.0 always succeeds, p <= 0.0 never does.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in [min, max], both ends inclusive.
    pub fn int_between(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        match (max - min).checked_add(1) {
            Some(span) => min + self.next_u64_below(span),
            // [0, u64::MAX]: every u64 is in range.
            None => self.next_u64(),
        }
    }

    /// Uniform float in [min, max). Returns exactly `min` when the
    /// bounds coincide.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_f64()
    }

    /// Pick one element uniformly. None on an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_u64_below(items.len() as u64) as usize;
        items.get(idx)
    }

    /// Sample `k` distinct indices from `0..n` (partial Fisher-Yates).
    /// `k` is capped at `n`; an empty range yields an empty sample.
    pub fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        let k = k.min(n);
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = i + self.next_u64_below((n - i) as u64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }
}

/// All routine RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// RNG for `slot` at `tick`.
    pub fn for_routine(&self, slot: RoutineSlot, tick: Tick) -> RoutineRng {
        let tick_seed = self.master_seed ^ tick.wrapping_mul(0xd1b5_4a32_d192_ed03);
        RoutineRng::new(tick_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable routine slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every routine's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RoutineSlot {
    World = 0,
    Scheduler = 1,
    BudgetRecharge = 2,
    Restock = 3,
    Inflation = 4,
    Availability = 5,
    SupplierRecharge = 6,
    Pricing = 7,
}

impl RoutineSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Scheduler => "scheduler",
            Self::BudgetRecharge => "budget_recharge",
            Self::Restock => "restock",
            Self::Inflation => "inflation",
            Self::Availability => "availability",
            Self::SupplierRecharge => "supplier_recharge",
            Self::Pricing => "pricing",
        }
    }
}
