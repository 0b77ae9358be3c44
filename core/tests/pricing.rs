//! Price rule and price table tests.

use tradesim_core::{
    config::PriceRuleConfig,
    model::{Product, ProductType, Supplier},
    pricing::{compute_price, compute_price_between, PriceRule},
    repository::Repository,
    rng::RoutineRng,
    store::EntityStore,
};
use std::collections::BTreeMap;

fn no_jitter_rule() -> PriceRule {
    PriceRule::new(PriceRuleConfig {
        reference_stock:   50.0,
        stock_sensitivity: 100.0,
        jitter_min:        1.0,
        jitter_max:        1.0,
        ..PriceRuleConfig::default()
    })
}

#[test]
fn price_at_reference_stock_equals_base_price() {
    assert_eq!(compute_price(100.0, 50.0, 50.0, 100.0, 1.0), 100.0);

    let rule = no_jitter_rule();
    let mut rng = RoutineRng::new(1, 1);
    assert_eq!(rule.quote(100.0, 50, &mut rng), 100.0);
    assert_eq!(rule.quote(37.5, 50, &mut rng), 37.5);
}

#[test]
fn price_is_non_increasing_in_stock() {
    let rule = no_jitter_rule();
    let mut previous = f64::INFINITY;
    for stock in 0..400u32 {
        let price = rule.price_with_jitter(80.0, stock, 1.0);
        assert!(
            price <= previous,
            "price rose from {previous} to {price} at stock {stock}"
        );
        assert!(price > 0.0, "price must stay positive, got {price} at stock {stock}");
        previous = price;
    }
}

#[test]
fn scarcity_raises_price_and_surplus_lowers_it() {
    let rule = no_jitter_rule();
    assert!(rule.price_with_jitter(100.0, 10, 1.0) > 100.0);
    assert!(rule.price_with_jitter(100.0, 90, 1.0) < 100.0);
}

#[test]
fn overstocked_product_is_clamped_to_floor() {
    // factor = 1 - (150 - 50) / 100 = 0: the raw rule gives a free product.
    assert_eq!(compute_price(100.0, 150.0, 50.0, 100.0, 1.0), 0.0);

    let rule = no_jitter_rule();
    let floor = PriceRuleConfig::default().min_stock_factor;
    let price = rule.price_with_jitter(100.0, 150, 1.0);
    assert!((price - 100.0 * floor).abs() < 1e-9, "got {price}");
    // Deeper overstock stays on the floor instead of going negative.
    assert_eq!(rule.price_with_jitter(100.0, 10_000, 1.0), price);
}

#[test]
fn jitter_stays_within_bounds() {
    let rule = PriceRule::new(PriceRuleConfig::default());
    let mut rng = RoutineRng::new(99, 4);
    for _ in 0..500 {
        let price = rule.quote(100.0, 50, &mut rng);
        assert!((95.0..=105.0).contains(&price), "price {price} outside jitter band");
    }
}

#[test]
fn refresh_prices_quotes_every_stocked_pair() {
    let mut store = EntityStore::new();
    for (id, price) in [(1, 100.0), (2, 40.0)] {
        store
            .products
            .add(Product {
                id,
                name: format!("Product {id}"),
                base_price: price,
                active: true,
                product_type: ProductType::Consumable,
            })
            .unwrap();
    }
    let suppliers = [
        (1, BTreeMap::from([(1, 50), (2, 150)])),
        (2, BTreeMap::from([(2, 50), (7, 10)])), // product 7 does not exist
    ];
    for (id, stock_by_product) in suppliers {
        store
            .suppliers
            .add(Supplier {
                id,
                company_name: format!("Supplier {id}"),
                country: "France".into(),
                continent: "Europe".into(),
                stock_by_product,
            })
            .unwrap();
    }

    let mut rng = RoutineRng::new(5, 7);
    let written = store.refresh_prices(&no_jitter_rule(), &mut rng);

    assert_eq!(written, 3, "the pair for the missing product is skipped");
    assert_eq!(store.price(1, 1), Some(100.0));
    assert_eq!(store.price(2, 2), Some(40.0));
    assert!(store.price(2, 1).unwrap() < 40.0, "surplus stock should be cheaper");
    assert_eq!(store.price(7, 2), None);
    assert_eq!(store.prices().cheapest(2).map(|(sid, _)| sid), Some(1));
}

#[test]
fn compute_price_between_draws_jitter_from_bounds() {
    let mut rng = RoutineRng::new(12, 7);
    assert_eq!(compute_price_between(80.0, 50.0, 50.0, 100.0, 1.0, 1.0, &mut rng), 80.0);

    for _ in 0..500 {
        let price = compute_price_between(100.0, 50.0, 50.0, 100.0, 0.9, 1.1, &mut rng);
        assert!((90.0..110.0 + 1e-9).contains(&price), "price {price} outside jitter band");
    }
}
