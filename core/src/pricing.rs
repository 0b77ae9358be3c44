//! Stock-based unit pricing and the derived price table.
//!
//! factor_stock = 1 - (stock - reference_stock) / sensitivity
//! price        = base_price * factor_stock * jitter
//!
//! More stock means a lower price, less stock a higher one. The raw
//! factor reaches zero (and goes negative) once stock exceeds the
//! reference by `sensitivity`, so PriceRule clamps it.

use crate::{
    config::PriceRuleConfig,
    error::{SimError, SimResult},
    rng::RoutineRng,
    types::{ProductId, SupplierId},
};
use std::collections::BTreeMap;

/// Unclamped stock factor.
pub fn stock_factor(current_stock: f64, reference_stock: f64, stock_sensitivity: f64) -> f64 {
    1.0 - (current_stock - reference_stock) / stock_sensitivity
}

/// Unclamped price for an already-drawn jitter. See
/// `compute_price_between` for the variant that draws the jitter from
/// `[random_min, random_max)` itself.
pub fn compute_price(
    base_price: f64,
    current_stock: f64,
    reference_stock: f64,
    stock_sensitivity: f64,
    jitter: f64,
) -> f64 {
    base_price * stock_factor(current_stock, reference_stock, stock_sensitivity) * jitter
}

/// Unclamped price with the jitter drawn from `[random_min, random_max)`.
pub fn compute_price_between(
    base_price: f64,
    current_stock: f64,
    reference_stock: f64,
    stock_sensitivity: f64,
    random_min: f64,
    random_max: f64,
    rng: &mut RoutineRng,
) -> f64 {
    let jitter = rng.uniform(random_min, random_max);
    compute_price(base_price, current_stock, reference_stock, stock_sensitivity, jitter)
}

#[derive(Debug, Clone)]
pub struct PriceRule {
    config: PriceRuleConfig,
}

impl PriceRule {
    pub fn new(config: PriceRuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PriceRuleConfig {
        &self.config
    }

    /// Stock factor clamped to [min_stock_factor, max_stock_factor].
    pub fn factor(&self, current_stock: u32) -> f64 {
        stock_factor(
            current_stock as f64,
            self.config.reference_stock,
            self.config.stock_sensitivity,
        )
        .clamp(self.config.min_stock_factor, self.config.max_stock_factor)
    }

    /// Price with a caller-supplied jitter. Non-increasing in stock.
    pub fn price_with_jitter(&self, base_price: f64, current_stock: u32, jitter: f64) -> f64 {
        base_price * self.factor(current_stock) * jitter
    }

    /// Price with jitter drawn from [jitter_min, jitter_max).
    pub fn quote(&self, base_price: f64, current_stock: u32, rng: &mut RoutineRng) -> f64 {
        let jitter = rng.uniform(self.config.jitter_min, self.config.jitter_max);
        self.price_with_jitter(base_price, current_stock, jitter)
    }
}

/// Unit price per (product, supplier) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    prices: BTreeMap<(ProductId, SupplierId), f64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, product_id: ProductId, supplier_id: SupplierId) -> Option<f64> {
        self.prices.get(&(product_id, supplier_id)).copied()
    }

    pub fn insert(&mut self, product_id: ProductId, supplier_id: SupplierId, price: f64) {
        self.prices.insert((product_id, supplier_id), price);
    }

    pub fn clear(&mut self) {
        self.prices.clear();
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((ProductId, SupplierId), f64)> + '_ {
        self.prices.iter().map(|(k, v)| (*k, *v))
    }

    /// Cheapest quote for a product across suppliers.
    pub fn cheapest(&self, product_id: ProductId) -> Option<(SupplierId, f64)> {
        self.prices
            .range((product_id, SupplierId::MIN)..=(product_id, SupplierId::MAX))
            .map(|(&(_, sid), &price)| (sid, price))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Wire form: keys rendered as "{product_id}_{supplier_id}".
    pub fn to_wire(&self) -> BTreeMap<String, f64> {
        self.prices
            .iter()
            .map(|(&(pid, sid), &price)| (wire_key(pid, sid), price))
            .collect()
    }

    /// Parse the wire form. Any malformed key fails the whole table.
    pub fn from_wire(wire: &BTreeMap<String, f64>) -> SimResult<Self> {
        let mut table = Self::new();
        for (key, &price) in wire {
            let (pid, sid) = parse_wire_key(key)?;
            if !price.is_finite() {
                return Err(SimError::corrupt(format!("price for '{key}' is not finite")));
            }
            table.insert(pid, sid, price);
        }
        Ok(table)
    }
}

pub fn wire_key(product_id: ProductId, supplier_id: SupplierId) -> String {
    format!("{product_id}_{supplier_id}")
}

/// Split "{product_id}_{supplier_id}" into its two integer ids.
pub fn parse_wire_key(key: &str) -> SimResult<(ProductId, SupplierId)> {
    let (pid, sid) = key
        .split_once('_')
        .ok_or_else(|| SimError::corrupt(format!("price key '{key}' has no '_' separator")))?;
    let pid = pid
        .parse::<ProductId>()
        .map_err(|e| SimError::corrupt(format!("price key '{key}': bad product id: {e}")))?;
    let sid = sid
        .parse::<SupplierId>()
        .map_err(|e| SimError::corrupt(format!("price key '{key}': bad supplier id: {e}")))?;
    Ok((pid, sid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wire_key_rejects_malformed() {
        assert_eq!(parse_wire_key("12_3").unwrap(), (12, 3));
        assert!(parse_wire_key("123").is_err());
        assert!(parse_wire_key("a_3").is_err());
        assert!(parse_wire_key("1_2_3").is_err());
        assert!(parse_wire_key("_3").is_err());
    }

    #[test]
    fn cheapest_only_considers_requested_product() {
        let mut table = PriceTable::new();
        table.insert(1, 1, 10.0);
        table.insert(1, 2, 8.0);
        table.insert(2, 1, 1.0);
        assert_eq!(table.cheapest(1), Some((2, 8.0)));
        assert_eq!(table.cheapest(3), None);
    }
}
