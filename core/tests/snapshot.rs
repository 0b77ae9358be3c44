//! Snapshot save/load tests against a temp directory.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use tempfile::TempDir;
use tradesim_core::{
    config::{SimConfig, CONFIG_FILE},
    engine::{SimEngine, DEFAULT_SAVE_DIR},
    error::SimError,
    model::{Company, Product, ProductType, Strategy, Supplier},
    pricing::PriceTable,
    snapshot::{decode, encode, SnapshotService, ACTIVE_SNAPSHOT, SNAPSHOT_VERSION},
    store::EntityStore,
};

fn sample_store() -> EntityStore {
    let products = vec![
        Product {
            id: 1,
            name: "Steel Bolts".into(),
            base_price: 12.5,
            active: true,
            product_type: ProductType::RawMaterial,
        },
        Product {
            id: 2,
            name: "Desk Lamp".into(),
            base_price: 48.25,
            active: false,
            product_type: ProductType::FinishedGood,
        },
    ];
    let suppliers = vec![Supplier {
        id: 1,
        company_name: "Nordhaven Metals".into(),
        country: "Norway".into(),
        continent: "Europe".into(),
        stock_by_product: BTreeMap::from([(1, 80), (2, 15)]),
    }];
    let companies = vec![Company {
        id: 1,
        name: "Atlas Works".into(),
        country: "Canada".into(),
        budget: 20_500.75,
        budget_initial: 25_000.0,
        preferred_types: BTreeSet::from([ProductType::RawMaterial]),
        strategy: Strategy::ByType,
    }];
    let mut prices = PriceTable::new();
    prices.insert(1, 1, 10.0);
    prices.insert(2, 1, 60.5);
    EntityStore::from_parts(products, suppliers, companies, prices).unwrap()
}

fn other_store() -> EntityStore {
    let products = vec![Product {
        id: 99,
        name: "Leftover".into(),
        base_price: 1.0,
        active: true,
        product_type: ProductType::Consumable,
    }];
    EntityStore::from_parts(products, vec![], vec![], PriceTable::new()).unwrap()
}

#[test]
fn save_then_load_restores_every_record() {
    let dir = TempDir::new().unwrap();
    let service = SnapshotService::new(dir.path());
    let original = sample_store();

    let path = service.save(&original, 7, None).unwrap();
    assert_eq!(path, dir.path().join(format!("{ACTIVE_SNAPSHOT}.json")));

    let mut store = other_store();
    let metadata = service.load(&mut store, None).unwrap().unwrap();

    assert_eq!(metadata.version, SNAPSHOT_VERSION);
    assert_eq!(metadata.tick, 7);
    assert!(chrono::DateTime::parse_from_rfc3339(&metadata.date_creation).is_ok());
    assert_eq!(store, original);
    assert!(!store.products.contains(99), "load must replace, not merge");
}

#[test]
fn wire_format_uses_fixed_keys() {
    let json = encode(&sample_store(), 3).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    for key in ["metadata", "produits", "fournisseurs", "entreprises", "prix"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["prix"]["1_1"], 10.0);
    assert_eq!(value["prix"]["2_1"], 60.5);
    assert_eq!(value["produits"][0]["type"], "raw_material");
    assert_eq!(value["fournisseurs"][0]["stock_by_product"]["2"], 15);
}

#[test]
fn save_keeps_only_the_active_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("old_save.json"), "{}").unwrap();
    fs::write(dir.path().join("notes.txt"), "scratch").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();

    let service = SnapshotService::new(dir.path());
    service.save(&sample_store(), 1, None).unwrap();
    service.save(&sample_store(), 2, None).unwrap();

    let mut files: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec![format!("{ACTIVE_SNAPSHOT}.json")]);
    assert!(dir.path().join("nested").is_dir());
}

#[test]
fn save_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let service = SnapshotService::new(dir.path().join("saves").join("slot"));
    let path = service.save(&sample_store(), 0, None).unwrap();
    assert!(path.is_file());
}

#[test]
fn missing_file_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let service = SnapshotService::new(dir.path());
    let mut store = other_store();

    assert!(service.load(&mut store, None).unwrap().is_none());
    assert_eq!(store, other_store());
}

#[test]
fn missing_key_is_corrupt_and_store_is_untouched() {
    let dir = TempDir::new().unwrap();
    let service = SnapshotService::new(dir.path());
    let mut value: serde_json::Value = serde_json::from_str(&encode(&sample_store(), 0).unwrap()).unwrap();
    value.as_object_mut().unwrap().remove("prix");
    fs::write(dir.path().join("active_game.json"), value.to_string()).unwrap();

    let mut store = other_store();
    let err = service.load(&mut store, None).unwrap_err();
    assert!(matches!(err, SimError::CorruptSnapshot { .. }), "got {err}");
    assert_eq!(store, other_store());
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(decode("not json"), Err(SimError::CorruptSnapshot { .. })));
    assert!(matches!(decode("[1, 2]"), Err(SimError::CorruptSnapshot { .. })));

    let mut value: serde_json::Value = serde_json::from_str(&encode(&sample_store(), 0).unwrap()).unwrap();
    value["prix"] = serde_json::json!({ "12": 4.0 });
    assert!(matches!(
        decode(&value.to_string()),
        Err(SimError::CorruptSnapshot { .. })
    ));

    let mut value: serde_json::Value = serde_json::from_str(&encode(&sample_store(), 0).unwrap()).unwrap();
    let first = value["produits"][0].clone();
    value["produits"].as_array_mut().unwrap().push(first);
    assert!(matches!(
        decode(&value.to_string()),
        Err(SimError::CorruptSnapshot { .. })
    ));

    let mut value: serde_json::Value = serde_json::from_str(&encode(&sample_store(), 0).unwrap()).unwrap();
    value["produits"][0]["base_price"] = serde_json::json!(-3.0);
    assert!(matches!(
        decode(&value.to_string()),
        Err(SimError::CorruptSnapshot { .. })
    ));
}

#[test]
fn metadata_without_tick_defaults_to_zero() {
    let mut value: serde_json::Value = serde_json::from_str(&encode(&sample_store(), 9).unwrap()).unwrap();
    value["metadata"].as_object_mut().unwrap().remove("tick");
    let (metadata, _) = decode(&value.to_string()).unwrap();
    assert_eq!(metadata.tick, 0);
}

#[test]
fn snapshot_names_cannot_escape_the_directory() {
    let service = SnapshotService::new("saves");
    assert!(service.path_for(Some("../outside")).is_err());
    assert!(service.path_for(Some("a/b")).is_err());
    assert!(service.path_for(Some("")).is_err());
    assert!(service.path_for(Some("slot_2")).is_ok());
}

#[test]
fn save_leaves_a_shared_config_file_alone() {
    let dir = TempDir::new().unwrap();
    let config_json = serde_json::to_string_pretty(&SimConfig::default()).unwrap();
    fs::write(dir.path().join(CONFIG_FILE), &config_json).unwrap();
    fs::write(dir.path().join("stale.json"), "{}").unwrap();

    let engine = SimEngine::build_test("snapshot-config".into(), 4)
        .unwrap()
        .with_snapshot_dir(dir.path());
    engine.save_snapshot(Some("checkpoint")).unwrap();

    assert!(dir.path().join("checkpoint.json").is_file());
    assert!(!dir.path().join("stale.json").exists());
    assert_eq!(fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(), config_json);

    let reloaded = SimConfig::load(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(reloaded, SimConfig::default());
}

#[test]
fn default_save_dir_is_not_the_config_dir() {
    assert_ne!(DEFAULT_SAVE_DIR, "data");
    assert!(DEFAULT_SAVE_DIR.starts_with("data/"));
}
