//! Initial world generation.
//!
//! Ids are assigned sequentially from 1. Every product starts active
//! and every company starts with `budget_initial == budget`.

use crate::{
    config::WorldConfig,
    error::SimResult,
    model::{Company, Product, ProductType, Strategy, Supplier},
    name_generator::NameGenerator,
    pricing::PriceTable,
    rng::RoutineRng,
    store::EntityStore,
    types::EntityId,
};
use std::collections::{BTreeMap, BTreeSet};

pub fn generate_world(config: &WorldConfig, rng: &mut RoutineRng) -> SimResult<EntityStore> {
    let products = generate_products(config, rng);
    let suppliers = generate_suppliers(config, &products, rng);
    let companies = generate_companies(config, rng);

    log::info!(
        "world: generated {} products, {} suppliers, {} companies",
        products.len(),
        suppliers.len(),
        companies.len()
    );

    EntityStore::from_parts(products, suppliers, companies, PriceTable::new())
}

fn generate_products(config: &WorldConfig, rng: &mut RoutineRng) -> Vec<Product> {
    (1..=config.product_count as EntityId)
        .map(|id| {
            let product_type = ProductType::ALL[rng.next_u64_below(3) as usize];
            let name = NameGenerator::product_name(product_type, rng);
            Product {
                id,
                name: format!("{name} #{id}"),
                base_price: round_cents(rng.uniform(config.base_price_min, config.base_price_max)),
                active: true,
                product_type,
            }
        })
        .collect()
}

fn generate_suppliers(
    config: &WorldConfig,
    products: &[Product],
    rng: &mut RoutineRng,
) -> Vec<Supplier> {
    (1..=config.supplier_count as EntityId)
        .map(|id| {
            let (country, continent) = NameGenerator::location(rng);
            let mut stock_by_product = BTreeMap::new();
            for product in products {
                if rng.chance(config.carry_probability) {
                    let stock = rng.int_between(config.stock_min as u64, config.stock_max as u64);
                    stock_by_product.insert(product.id, stock as u32);
                }
            }
            Supplier {
                id,
                company_name: NameGenerator::business_name(rng),
                country: country.to_string(),
                continent: continent.to_string(),
                stock_by_product,
            }
        })
        .collect()
}

fn generate_companies(config: &WorldConfig, rng: &mut RoutineRng) -> Vec<Company> {
    (1..=config.company_count as EntityId)
        .map(|id| {
            let (country, _) = NameGenerator::location(rng);
            let budget = round_cents(rng.uniform(config.budget_min, config.budget_max));

            let mut preferred_types = BTreeSet::new();
            let wanted = 1 + rng.next_u64_below(2) as usize;
            for idx in rng.sample_indices(ProductType::ALL.len(), wanted) {
                preferred_types.insert(ProductType::ALL[idx]);
            }
            let strategy = if rng.chance(0.5) { Strategy::Cheapest } else { Strategy::ByType };

            Company {
                id,
                name: NameGenerator::business_name(rng),
                country: country.to_string(),
                budget,
                budget_initial: budget,
                preferred_types,
                strategy,
            }
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
