//! World generation tests.

use tradesim_core::{
    config::WorldConfig,
    rng::{RngBank, RoutineSlot},
    world::generate_world,
};

fn world_rng(seed: u64) -> tradesim_core::rng::RoutineRng {
    RngBank::new(seed).for_routine(RoutineSlot::World, 0)
}

#[test]
fn ids_are_sequential_and_values_in_range() {
    let config = WorldConfig::default();
    let store = generate_world(&config, &mut world_rng(17)).unwrap();

    assert_eq!(store.products.ids(), (1..=30).collect::<Vec<u32>>());
    assert_eq!(store.suppliers.ids(), (1..=10).collect::<Vec<u32>>());
    assert_eq!(store.companies.ids(), (1..=12).collect::<Vec<u32>>());

    for product in store.products.iter() {
        assert!(product.active);
        assert!((config.base_price_min..=config.base_price_max).contains(&product.base_price));
        assert!(product.name.ends_with(&format!("#{}", product.id)));
    }
    for supplier in store.suppliers.iter() {
        for (&pid, &stock) in &supplier.stock_by_product {
            assert!(store.products.contains(pid));
            assert!((config.stock_min..=config.stock_max).contains(&stock));
        }
    }
    for company in store.companies.iter() {
        assert_eq!(company.budget, company.budget_initial);
        assert!((config.budget_min..=config.budget_max).contains(&company.budget));
        assert!((1..=2).contains(&company.preferred_types.len()));
    }
    assert!(store.prices().is_empty());
}

#[test]
fn carry_probability_bounds_the_catalogue() {
    let none = WorldConfig { carry_probability: 0.0, ..WorldConfig::default() };
    let store = generate_world(&none, &mut world_rng(1)).unwrap();
    assert_eq!(store.total_stock(), 0);

    let all = WorldConfig { carry_probability: 1.0, ..WorldConfig::default() };
    let store = generate_world(&all, &mut world_rng(1)).unwrap();
    assert!(store.suppliers.iter().all(|s| s.stock_by_product.len() == 30));
}

#[test]
fn empty_world_is_valid() {
    let config = WorldConfig {
        product_count:  0,
        supplier_count: 0,
        company_count:  0,
        ..WorldConfig::default()
    };
    let store = generate_world(&config, &mut world_rng(5)).unwrap();
    assert!(store.products.is_empty());
    assert_eq!(store.mean_base_price(), 0.0);
}
