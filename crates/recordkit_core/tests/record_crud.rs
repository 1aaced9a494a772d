use recordkit_core::db::open_db_in_memory;
use recordkit_core::record::Record;
use recordkit_core::{
    Category, Destination, ListOptions, OrderDirection, Product, RepoError, Repository,
    SqliteRepository, Station, User, ValidationError,
};

fn repo() -> SqliteRepository {
    SqliteRepository::new(open_db_in_memory().unwrap())
}

fn category(title: &str) -> Category {
    Category {
        parent_id: 1,
        title: title.to_string(),
        position: 0,
        image_url: format!("{title}.png"),
        description: format!("All about {title}"),
        ..Category::default()
    }
}

fn product(category_id: i64, title: &str, price: f64) -> Product {
    Product {
        category_id,
        title: title.to_string(),
        image_url: format!("{title}.png"),
        price,
        description: format!("{title} description"),
        ..Product::default()
    }
}

#[test]
fn insert_and_get_roundtrip_preserves_declared_fields() {
    let repo = repo();
    let original = category("Beach");

    let id = repo.insert(&original).unwrap();
    let loaded: Category = repo.get_by_id(id).unwrap();

    assert_eq!(loaded.id, id);
    assert_eq!(loaded.writable_values(), original.writable_values());
    assert!(loaded.created_at > 0);
    assert!(loaded.updated_at > 0);
}

#[test]
fn json_list_columns_roundtrip() {
    let repo = repo();
    let station = Station {
        name_en: "Central".to_string(),
        name_ar: "المركزية".to_string(),
        images_urls: vec!["a.png".to_string(), "b.png".to_string()],
        address_en: "Main st".to_string(),
        address_ar: "الشارع الرئيسي".to_string(),
        latitude: 30.1,
        longitude: 31.2,
        ..Station::default()
    };

    let id = repo.insert(&station).unwrap();
    let loaded: Station = repo.get_by_id(id).unwrap();
    assert_eq!(loaded.images_urls, station.images_urls);
    assert_eq!(loaded.name_ar, station.name_ar);
    assert_eq!(loaded.latitude, 30.1);
}

#[test]
fn incomplete_category_is_unprocessable() {
    let repo = repo();
    let incomplete = Category {
        title: "Beach".to_string(),
        image_url: "b.png".to_string(),
        ..Category::default()
    };

    let err = repo.insert(&incomplete).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Unprocessable(ValidationError::MissingRequiredFields {
            table: "categories"
        })
    ));
    assert_eq!(repo.count::<Category>().unwrap(), 0);
}

#[test]
fn get_missing_id_is_no_rows() {
    let repo = repo();
    let err = repo.get_by_id::<User>(42).unwrap_err();
    assert!(err.is_no_rows());
}

#[test]
fn list_on_empty_table_is_no_rows() {
    let repo = repo();
    let err = repo.list::<Product>(&ListOptions::new()).unwrap_err();
    assert!(matches!(err, RepoError::NoRows));
}

#[test]
fn list_products_of_category_sorted_by_price() {
    let repo = repo();
    repo.batch_insert(&[
        product(3, "kayak", 300.0),
        product(3, "towel", 15.0),
        product(4, "tent", 120.0),
        product(3, "umbrella", 40.0),
    ])
    .unwrap();

    let options = ListOptions::new()
        .with_table("products")
        .where_eq("category_id", 3_i64)
        .with_limit(30)
        .order_by("price", OrderDirection::Asc);
    let listed: Vec<Product> = repo.list(&options).unwrap();

    let titles: Vec<&str> = listed.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["towel", "umbrella", "kayak"]);
    assert!(listed.iter().all(|p| p.category_id == 3));
}

#[test]
fn list_from_query_string_filters_with_text_value() {
    let repo = repo();
    repo.batch_insert(&[product(3, "a", 1.0), product(5, "b", 2.0)])
        .unwrap();

    let options = ListOptions::parse::<Product>("where=category_id:5&by=price&order=desc");
    let listed: Vec<Product> = repo.list(&options).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "b");
}

#[test]
fn list_never_exceeds_limit_and_pages_with_offset() {
    let repo = repo();
    let products: Vec<Product> = (1..=7)
        .map(|n| product(1, &format!("p{n}"), f64::from(n)))
        .collect();
    repo.batch_insert(&products).unwrap();

    let first_page: Vec<Product> = repo
        .list(&ListOptions::parse::<Product>("limit=3&by=price&order=asc"))
        .unwrap();
    assert_eq!(first_page.len(), 3);
    assert_eq!(first_page[0].title, "p1");

    let last_page: Vec<Product> = repo
        .list(&ListOptions::parse::<Product>(
            "limit=3&offset=6&by=price&order=asc",
        ))
        .unwrap();
    assert_eq!(last_page.len(), 1);
    assert_eq!(last_page[0].title, "p7");

    let past_end = repo
        .list::<Product>(&ListOptions::parse::<Product>("limit=3&offset=9"))
        .unwrap_err();
    assert!(past_end.is_no_rows());
}

#[test]
fn list_default_order_is_most_recent_first() {
    let repo = repo();
    let older = repo.insert(&category("older")).unwrap();
    let newer = repo.insert(&category("newer")).unwrap();
    {
        let conn = repo.connection().unwrap();
        conn.execute(
            "UPDATE categories SET updated_at = 1000 WHERE id = ?1;",
            [older],
        )
        .unwrap();
        conn.execute(
            "UPDATE categories SET updated_at = 2000 WHERE id = ?1;",
            [newer],
        )
        .unwrap();
    }

    let listed: Vec<Category> = repo.list(&ListOptions::parse::<Category>("")).unwrap();
    assert_eq!(listed[0].id, newer);
    assert_eq!(listed[1].id, older);
}

#[test]
fn list_rejects_order_column_not_declared_by_record() {
    let repo = repo();
    repo.insert(&category("x")).unwrap();

    let options = ListOptions::new().order_by("price", OrderDirection::Asc);
    let err = repo.list::<Category>(&options).unwrap_err();
    assert!(err.is_unprocessable());
}

#[test]
fn batch_insert_empty_is_noop() {
    let repo = repo();
    assert_eq!(repo.batch_insert::<Product>(&[]).unwrap(), 0);
}

#[test]
fn batch_insert_is_all_or_nothing() {
    let repo = repo();
    let mut invalid = product(1, "free", 1.0);
    invalid.price = 0.0;

    let err = repo
        .batch_insert(&[product(1, "ok", 5.0), invalid])
        .unwrap_err();
    assert!(err.is_unprocessable());
    assert_eq!(repo.count::<Product>().unwrap(), 0);

    let inserted = repo
        .batch_insert(&[product(1, "a", 5.0), product(1, "b", 6.0)])
        .unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(repo.count::<Product>().unwrap(), 2);
}

#[test]
fn update_rewrites_every_writable_column() {
    let repo = repo();
    let id = repo.insert(&product(1, "draft", 10.0)).unwrap();

    let mut changed: Product = repo.get_by_id(id).unwrap();
    changed.title = "final".to_string();
    changed.price = 12.5;
    changed.category_id = 2;
    assert_eq!(repo.update(&changed).unwrap(), 1);

    let loaded: Product = repo.get_by_id(id).unwrap();
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.price, 12.5);
    assert_eq!(loaded.category_id, 2);
}

#[test]
fn full_update_refreshes_updated_at() {
    let repo = repo();
    let id = repo.insert(&product(1, "draft", 10.0)).unwrap();
    repo.connection()
        .unwrap()
        .execute("UPDATE products SET updated_at = 1 WHERE id = ?1;", [id])
        .unwrap();

    let mut changed: Product = repo.get_by_id(id).unwrap();
    assert_eq!(changed.updated_at, 1);
    changed.title = "final".to_string();
    repo.update(&changed).unwrap();

    let loaded: Product = repo.get_by_id(id).unwrap();
    assert!(loaded.updated_at > 1);
    assert_eq!(loaded.created_at, changed.created_at);
}

#[test]
fn into_inner_returns_connection_with_written_rows() {
    let repo = repo();
    repo.insert(&category("kept")).unwrap();

    let conn = repo.into_inner().unwrap();
    let title: String = conn
        .query_row("SELECT title FROM categories WHERE id = 1;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(title, "kept");
}

#[test]
fn update_missing_record_reports_zero_and_requires_identity() {
    let repo = repo();
    let mut ghost = product(1, "ghost", 1.0);

    let err = repo.update(&ghost).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Unprocessable(ValidationError::MissingIdentity { .. })
    ));

    ghost.id = 99;
    assert_eq!(repo.update(&ghost).unwrap(), 0);
}

#[test]
fn delete_by_id_reports_affected_rows() {
    let repo = repo();
    let id = repo
        .insert(&User {
            firstname: "Ada".to_string(),
            username: "ada".to_string(),
            ..User::default()
        })
        .unwrap();

    assert_eq!(repo.delete_by_id::<User>(id).unwrap(), 1);
    assert_eq!(repo.delete_by_id::<User>(id).unwrap(), 0);
    assert!(repo.get_by_id::<User>(id).unwrap_err().is_no_rows());
}

#[test]
fn count_tracks_inserts_per_table() {
    let repo = repo();
    repo.insert(&category("a")).unwrap();
    repo.insert(&category("b")).unwrap();
    repo.insert(&product(1, "p", 1.0)).unwrap();

    assert_eq!(repo.count::<Category>().unwrap(), 2);
    assert_eq!(repo.count::<Product>().unwrap(), 1);
    assert_eq!(repo.count::<Destination>().unwrap(), 0);
}

#[test]
fn store_errors_pass_through_unchanged() {
    let repo = repo();
    let user = User {
        firstname: "Ada".to_string(),
        username: "ada".to_string(),
        ..User::default()
    };
    repo.insert(&user).unwrap();

    let err = repo.insert(&user).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn repository_is_shareable_across_threads() {
    let repo = repo();
    std::thread::scope(|scope| {
        for worker in 0..4 {
            let repo = &repo;
            scope.spawn(move || {
                for n in 0..5 {
                    repo.insert(&product(worker + 1, &format!("w{worker}-{n}"), 1.0))
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(repo.count::<Product>().unwrap(), 20);
}
