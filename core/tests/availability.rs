//! Availability variation tests.

use std::collections::BTreeSet;

use tradesim_core::{
    availability_routine::AvailabilityRoutine,
    config::AvailabilityConfig,
    event::SimEvent,
    model::{Product, ProductType},
    repository::Repository,
    rng::RoutineRng,
    store::EntityStore,
};

fn store_with(flags: &[bool]) -> EntityStore {
    let mut store = EntityStore::new();
    for (i, &active) in flags.iter().enumerate() {
        let id = i as u32 + 1;
        store
            .products
            .add(Product {
                id,
                name: format!("Product {id}"),
                base_price: 10.0,
                active,
                product_type: ProductType::FinishedGood,
            })
            .unwrap();
    }
    store
}

fn forced(rate: f64) -> AvailabilityRoutine {
    AvailabilityRoutine::new(AvailabilityConfig { trigger_probability: 1.0, rate })
}

#[test]
fn all_active_store_only_withdraws() {
    let mut store = store_with(&[true; 5]);
    let events = forced(0.2).apply_availability_variation(3, &mut store, &mut RoutineRng::new(1, 5));

    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], SimEvent::ProductDeactivated { tick: 3, .. }));
    assert!(matches!(
        events[1],
        SimEvent::AvailabilitySummary {
            deactivated: 1,
            reactivated: 0,
            active_after: 4,
            inactive_after: 1,
            ..
        }
    ));
    assert_eq!(store.inactive_product_ids().len(), 1);
}

#[test]
fn both_partitions_toggle_from_pre_toggle_sets() {
    // 10 active, 4 inactive: 2 withdrawn, 1 restored.
    let mut flags = vec![true; 10];
    flags.extend([false; 4]);
    let mut store = store_with(&flags);
    let inactive_before: BTreeSet<u32> = store.inactive_product_ids().into_iter().collect();

    let events = forced(0.2).apply_availability_variation(1, &mut store, &mut RoutineRng::new(9, 5));

    let mut withdrawn = BTreeSet::new();
    let mut restored = BTreeSet::new();
    for event in &events {
        match event {
            SimEvent::ProductDeactivated { product_id, .. } => {
                withdrawn.insert(*product_id);
            }
            SimEvent::ProductReactivated { product_id, .. } => {
                restored.insert(*product_id);
            }
            _ => {}
        }
    }
    assert_eq!(withdrawn.len(), 2);
    assert_eq!(restored.len(), 1);
    assert!(withdrawn.is_disjoint(&inactive_before));
    assert!(restored.is_subset(&inactive_before));
    assert!(withdrawn.is_disjoint(&restored));

    assert!(matches!(
        events.last(),
        Some(SimEvent::AvailabilitySummary { active_after: 9, inactive_after: 5, .. })
    ));
    assert_eq!(store.active_product_ids().len(), 9);
}

#[test]
fn closed_gate_changes_nothing() {
    let mut store = store_with(&[true, false, true]);
    let before = store.clone();
    let routine = AvailabilityRoutine::new(AvailabilityConfig { trigger_probability: 0.0, rate: 1.0 });

    let events = routine.apply_availability_variation(1, &mut store, &mut RoutineRng::new(2, 5));

    assert!(events.is_empty());
    assert_eq!(store, before);
}

#[test]
fn empty_catalog_emits_nothing() {
    let mut store = EntityStore::new();
    let events = forced(0.5).apply_availability_variation(1, &mut store, &mut RoutineRng::new(3, 5));
    assert!(events.is_empty());
}

#[test]
fn full_rate_swaps_every_product() {
    let mut store = store_with(&[true, true, false]);
    forced(1.0).apply_availability_variation(1, &mut store, &mut RoutineRng::new(4, 5));
    assert_eq!(store.active_product_ids(), vec![3]);
    assert_eq!(store.inactive_product_ids(), vec![1, 2]);
}
