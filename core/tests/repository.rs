//! Repository contract tests.

use tradesim_core::{
    error::SimError,
    model::{Product, ProductType, Supplier},
    repository::{InMemoryRepository, Repository, SqlRepository},
};

fn product(id: u32, name: &str) -> Product {
    Product {
        id,
        name: name.into(),
        base_price: 5.0,
        active: true,
        product_type: ProductType::Consumable,
    }
}

#[test]
fn add_get_update_delete() {
    let mut repo = InMemoryRepository::new();
    repo.add(product(2, "Ink")).unwrap();
    repo.add(product(1, "Paper")).unwrap();

    assert_eq!(repo.count().unwrap(), 2);
    assert_eq!(repo.get(1).unwrap().name, "Paper");
    assert_eq!(repo.ids(), vec![1, 2]);

    repo.update(product(1, "Card Stock")).unwrap();
    assert_eq!(repo.get(1).unwrap().name, "Card Stock");

    let removed = repo.delete(2).unwrap();
    assert_eq!(removed.name, "Ink");
    assert_eq!(repo.all().unwrap(), vec![product(1, "Card Stock")]);

    repo.clear().unwrap();
    assert!(repo.is_empty());
}

#[test]
fn missing_ids_are_not_found() {
    let mut repo: InMemoryRepository<Product> = InMemoryRepository::new();
    assert!(matches!(repo.get(9), Err(SimError::NotFound { kind: "product", id: 9 })));
    assert!(matches!(repo.delete(9), Err(SimError::NotFound { .. })));
    assert!(matches!(repo.update(product(9, "Ghost")), Err(SimError::NotFound { .. })));
    assert_eq!(repo.count().unwrap(), 0, "update must not insert");
}

#[test]
fn duplicate_add_is_rejected_and_keeps_original() {
    let mut repo = InMemoryRepository::new();
    repo.add(product(1, "Paper")).unwrap();
    let err = repo.add(product(1, "Other")).unwrap_err();
    assert!(matches!(err, SimError::DuplicateKey { kind: "product", id: 1 }));
    assert_eq!(repo.get(1).unwrap().name, "Paper");

    assert!(InMemoryRepository::from_items(vec![product(3, "a"), product(3, "b")]).is_err());
}

#[test]
fn sql_backend_reports_unsupported() {
    let mut repo: SqlRepository<Supplier> = SqlRepository::new("postgres://localhost/trade");
    assert!(matches!(
        repo.get(1),
        Err(SimError::UnsupportedBackend { backend: "sql", operation: "get" })
    ));
    assert!(matches!(repo.count(), Err(SimError::UnsupportedBackend { .. })));
    assert!(matches!(repo.clear(), Err(SimError::UnsupportedBackend { .. })));
}
