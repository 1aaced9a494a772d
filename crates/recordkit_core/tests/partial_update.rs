use recordkit_core::db::open_db_in_memory;
use recordkit_core::record::Record;
use recordkit_core::{
    AttributeMap, FieldKind, Product, RepoError, Repository, SqliteRepository, User,
    ValidationError,
};
use serde_json::json;

fn repo() -> SqliteRepository {
    SqliteRepository::new(open_db_in_memory().unwrap())
}

fn attrs(value: serde_json::Value) -> AttributeMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

fn seeded_product(repo: &SqliteRepository) -> i64 {
    repo.insert(&Product {
        category_id: 3,
        title: "kayak".to_string(),
        image_url: "kayak.png".to_string(),
        price: 300.0,
        description: "two seats".to_string(),
        ..Product::default()
    })
    .unwrap()
}

#[test]
fn partial_update_changes_only_listed_attributes() {
    let repo = repo();
    let id = seeded_product(&repo);

    let updated = repo
        .partial_update::<Product>(
            id,
            &Product::UPDATE_SCHEMA,
            &attrs(json!({ "price": 275.5, "title": "kayak pro" })),
        )
        .unwrap();
    assert_eq!(updated, 1);

    let loaded: Product = repo.get_by_id(id).unwrap();
    assert_eq!(loaded.price, 275.5);
    assert_eq!(loaded.title, "kayak pro");
    assert_eq!(loaded.description, "two seats");
    assert_eq!(loaded.category_id, 3);
}

#[test]
fn wrong_attribute_type_is_unprocessable() {
    let repo = repo();
    let id = seeded_product(&repo);

    let err = repo
        .partial_update::<Product>(id, &Product::UPDATE_SCHEMA, &attrs(json!({ "price": "ten" })))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Unprocessable(ValidationError::AttributeTypeMismatch {
            expected: FieldKind::Float,
            ..
        })
    ));
}

#[test]
fn rejected_update_leaves_record_untouched() {
    let repo = repo();
    let id = seeded_product(&repo);
    let before: Product = repo.get_by_id(id).unwrap();

    let err = repo
        .partial_update::<Product>(
            id,
            &Product::UPDATE_SCHEMA,
            &attrs(json!({ "title": "renamed", "color": "red" })),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Unprocessable(ValidationError::UnknownAttribute(ref name)) if name == "color"
    ));

    let after: Product = repo.get_by_id(id).unwrap();
    assert_eq!(after, before);
}

#[test]
fn integer_columns_accept_whole_numbers_only() {
    let repo = repo();
    let id = seeded_product(&repo);

    let err = repo
        .partial_update::<Product>(
            id,
            &Product::UPDATE_SCHEMA,
            &attrs(json!({ "category_id": 2.5 })),
        )
        .unwrap_err();
    assert!(err.is_unprocessable());

    repo.partial_update::<Product>(id, &Product::UPDATE_SCHEMA, &attrs(json!({ "category_id": 4 })))
        .unwrap();
    let loaded: Product = repo.get_by_id(id).unwrap();
    assert_eq!(loaded.category_id, 4);
}

#[test]
fn null_never_matches_a_declared_kind() {
    let repo = repo();
    let id = seeded_product(&repo);

    let err = repo
        .partial_update::<Product>(id, &Product::UPDATE_SCHEMA, &attrs(json!({ "title": null })))
        .unwrap_err();
    assert!(err.is_unprocessable());
}

#[test]
fn empty_attribute_map_is_noop() {
    let repo = repo();
    let id = seeded_product(&repo);

    let updated = repo
        .partial_update::<Product>(id, &Product::UPDATE_SCHEMA, &AttributeMap::new())
        .unwrap();
    assert_eq!(updated, 0);
}

#[test]
fn missing_record_reports_zero_rows() {
    let repo = repo();

    let updated = repo
        .partial_update::<User>(7, &User::UPDATE_SCHEMA, &attrs(json!({ "firstname": "Grace" })))
        .unwrap();
    assert_eq!(updated, 0);
}

#[test]
fn partial_update_refreshes_updated_at() {
    let repo = repo();
    let id = seeded_product(&repo);
    repo.connection()
        .unwrap()
        .execute("UPDATE products SET updated_at = 1 WHERE id = ?1;", [id])
        .unwrap();

    repo.partial_update::<Product>(id, &Product::UPDATE_SCHEMA, &attrs(json!({ "price": 10 })))
        .unwrap();

    let loaded: Product = repo.get_by_id(id).unwrap();
    assert!(loaded.updated_at > 1);
    assert_eq!(loaded.price, 10.0);
}
