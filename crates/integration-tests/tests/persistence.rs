//! Repository tests against a real `PostgreSQL` database.
//!
//! Each test gets a fresh database with the storefront migrations applied.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/ironyard \
//!     cargo test -p ironyard-integration-tests --test persistence -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

use ironyard_core::cart::{CartLineItem, LineItemDescriptor};
use ironyard_core::{BrandId, CategoryId, Email, OrderId, ProductId};
use ironyard_storefront::db::seed::{CatalogSeed, FacetSeed, ProductSeed, seed_catalog};
use ironyard_storefront::db::{CatalogRepository, OrderRepository};
use ironyard_storefront::models::catalog::ProductFilter;
use ironyard_storefront::models::order::{CustomerDetails, NewOrder};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn facet(id: &str, name: &str) -> FacetSeed {
    FacetSeed {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn product(id: &str, price: &str, category: Option<&str>, brand: Option<&str>) -> ProductSeed {
    ProductSeed {
        id: ProductId::from(id),
        name: format!("Product {id}"),
        description: None,
        price: dec(price),
        original_price: None,
        rating: None,
        review_count: None,
        image_url: None,
        category: category.map(CategoryId::from),
        brand: brand.map(BrandId::from),
        best_seller: false,
        new: false,
        featured: false,
        out_of_stock: false,
    }
}

fn catalog() -> CatalogSeed {
    CatalogSeed {
        categories: vec![
            facet("cat-welding", "Welding"),
            facet("cat-lifting", "Lifting"),
            facet("cat-safety", "Safety"),
        ],
        brands: vec![
            facet("brand-lincoln", "Lincoln Electric"),
            facet("brand-harrington", "Harrington"),
        ],
        products: vec![
            product("mig-180", "899.00", Some("cat-welding"), Some("brand-lincoln")),
            product("stick-225", "450.00", Some("cat-welding"), None),
            product("hoist-1t", "249.99", Some("cat-lifting"), Some("brand-harrington")),
            product("gloves", "24.50", None, Some("brand-lincoln")),
            product("strap", "12.00", Some("cat-lifting"), None),
        ],
    }
}

/// Newest first: strap, gloves, hoist-1t, stick-225, mig-180.
const NEWEST_FIRST: [&str; 5] = ["strap", "gloves", "hoist-1t", "stick-225", "mig-180"];

async fn seeded(pool: &PgPool) {
    seed_catalog(pool, &catalog(), false).await.unwrap();
    for (minutes_ago, id) in (0_i32..).zip(NEWEST_FIRST) {
        sqlx::query(
            "UPDATE products SET created_at = NOW() - make_interval(mins => $2) WHERE id = $1",
        )
        .bind(id)
        .bind(minutes_ago)
        .execute(pool)
        .await
        .unwrap();
    }
}

async fn listed(pool: &PgPool, filter: &ProductFilter) -> Vec<String> {
    CatalogRepository::new(pool)
        .list_products(filter)
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.id.as_str().to_string())
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_unfiltered_listing_is_newest_first(pool: PgPool) {
    seeded(&pool).await;
    assert_eq!(listed(&pool, &ProductFilter::default()).await, NEWEST_FIRST);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_price_bounds_are_inclusive(pool: PgPool) {
    seeded(&pool).await;
    let filter = ProductFilter {
        min_price: dec("24.50"),
        max_price: dec("450"),
        ..ProductFilter::default()
    };
    assert_eq!(listed(&pool, &filter).await, ["gloves", "hoist-1t", "stick-225"]);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_category_names_match_case_insensitively(pool: PgPool) {
    seeded(&pool).await;
    let filter = ProductFilter {
        categories: strings(&["wELDING"]),
        ..ProductFilter::default()
    };
    assert_eq!(listed(&pool, &filter).await, ["stick-225", "mig-180"]);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_facet_ids_match_exactly(pool: PgPool) {
    seeded(&pool).await;
    let by_id = ProductFilter {
        categories: strings(&["cat-lifting"]),
        ..ProductFilter::default()
    };
    assert_eq!(listed(&pool, &by_id).await, ["strap", "hoist-1t"]);

    let wrong_case = ProductFilter {
        brands: strings(&["BRAND-HARRINGTON"]),
        ..ProductFilter::default()
    };
    assert!(listed(&pool, &wrong_case).await.is_empty());
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_categories_and_brands_are_ored(pool: PgPool) {
    seeded(&pool).await;
    let filter = ProductFilter {
        categories: strings(&["Lifting"]),
        brands: strings(&["Lincoln Electric"]),
        ..ProductFilter::default()
    };
    assert_eq!(
        listed(&pool, &filter).await,
        ["strap", "gloves", "hoist-1t", "mig-180"]
    );

    let capped = ProductFilter {
        max_price: dec("300"),
        ..filter
    };
    assert_eq!(listed(&pool, &capped).await, ["strap", "gloves", "hoist-1t"]);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_get_product_joins_facet_names(pool: PgPool) {
    seeded(&pool).await;
    let repo = CatalogRepository::new(&pool);

    let hoist = repo
        .get_product(&ProductId::from("hoist-1t"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hoist.price, dec("249.99"));
    assert_eq!(hoist.category_name.as_deref(), Some("Lifting"));
    assert_eq!(hoist.brand_name.as_deref(), Some("Harrington"));

    let gloves = repo.get_product(&ProductId::from("gloves")).await.unwrap().unwrap();
    assert_eq!(gloves.category_name, None);

    assert!(repo.get_product(&ProductId::from("nope")).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_facet_counts_include_empty_facets(pool: PgPool) {
    seeded(&pool).await;
    let repo = CatalogRepository::new(&pool);

    let categories: Vec<(String, i64)> = repo
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.name, c.product_count))
        .collect();
    assert_eq!(
        categories,
        [
            ("Lifting".to_string(), 2),
            ("Safety".to_string(), 0),
            ("Welding".to_string(), 2),
        ]
    );

    let brands: Vec<(String, i64)> = repo
        .list_brands()
        .await
        .unwrap()
        .into_iter()
        .map(|b| (b.name, b.product_count))
        .collect();
    assert_eq!(
        brands,
        [
            ("Harrington".to_string(), 1),
            ("Lincoln Electric".to_string(), 2),
        ]
    );
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_reseed_upserts_in_place(pool: PgPool) {
    seeded(&pool).await;

    let mut changed = catalog();
    changed.products[0].price = dec("849.00");
    changed.categories[0].name = "Welding & Cutting".to_string();
    let report = seed_catalog(&pool, &changed, false).await.unwrap();
    assert_eq!(report.products, 5);

    let repo = CatalogRepository::new(&pool);
    let mig = repo
        .get_product(&ProductId::from("mig-180"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mig.price, dec("849.00"));
    assert_eq!(mig.category_name.as_deref(), Some("Welding & Cutting"));
    assert_eq!(listed(&pool, &ProductFilter::default()).await.len(), 5);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_clear_replaces_catalog_and_keeps_orders(pool: PgPool) {
    seeded(&pool).await;
    let order = new_order(vec![line("hoist-1t", 249.99, 1)]);
    OrderRepository::new(&pool).create(&order).await.unwrap();

    let replacement = CatalogSeed {
        categories: vec![facet("cat-pumps", "Pumps")],
        brands: Vec::new(),
        products: vec![product("pump-2in", "310.00", Some("cat-pumps"), None)],
    };
    seed_catalog(&pool, &replacement, true).await.unwrap();

    assert_eq!(listed(&pool, &ProductFilter::default()).await, ["pump-2in"]);
    let repo = CatalogRepository::new(&pool);
    assert_eq!(repo.list_categories().await.unwrap().len(), 1);
    assert!(repo.list_brands().await.unwrap().is_empty());

    let kept = OrderRepository::new(&pool).get(order.id).await.unwrap().unwrap();
    assert_eq!(kept.items[0].product_id, ProductId::from("hoist-1t"));
}

fn line(id: &str, price: f64, quantity: u32) -> CartLineItem {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": price,
        "image": format!("/images/{id}.jpg"),
        "category": "Shop Equipment",
        "quantity": quantity,
    }))
    .unwrap()
}

fn new_order(items: Vec<CartLineItem>) -> NewOrder {
    let customer = CustomerDetails {
        first_name: "Dana".to_string(),
        last_name: "Okafor".to_string(),
        email: "dana@millworks.example".to_string(),
        company: "Millworks Fabrication".to_string(),
        ..CustomerDetails::default()
    };
    NewOrder::validate(customer, items, None).unwrap()
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_order_lines_keep_cart_order(pool: PgPool) {
    let order = new_order(vec![
        line("strap", 12.0, 4),
        line("mig-180", 899.0, 1),
        line("gloves", 24.5, 2),
    ]);
    let repo = OrderRepository::new(&pool);

    let created = repo.create(&order).await.unwrap();
    assert_eq!(created.id, order.id);
    assert_eq!(created.total_price, dec("996.00"));
    assert_eq!(created.email, "dana@millworks.example");

    let fetched = repo.get(order.id).await.unwrap().unwrap();
    let lines: Vec<(&str, i32)> = fetched
        .items
        .iter()
        .map(|item| (item.product_id.as_str(), item.quantity))
        .collect();
    assert_eq!(lines, [("strap", 4), ("mig-180", 1), ("gloves", 2)]);
    assert_eq!(fetched.items[2].price, dec("24.50"));
    assert_eq!(fetched.items[0].image, "/images/strap.jpg");
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_list_recent_is_newest_first(pool: PgPool) {
    let repo = OrderRepository::new(&pool);
    let first = new_order(vec![line("strap", 12.0, 1)]);
    let second = new_order(vec![line("gloves", 24.5, 1)]);
    repo.create(&first).await.unwrap();
    repo.create(&second).await.unwrap();
    sqlx::query("UPDATE orders SET created_at = created_at - INTERVAL '1 hour' WHERE id = $1")
        .bind(first.id)
        .execute(&pool)
        .await
        .unwrap();

    let recent = repo.list_recent(10).await.unwrap();
    let ids: Vec<OrderId> = recent.iter().map(|o| o.id).collect();
    assert_eq!(ids, [second.id, first.id]);
    assert_eq!(repo.list_recent(1).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_failed_line_rolls_back_whole_order(pool: PgPool) {
    let refused = CartLineItem::new(
        LineItemDescriptor {
            id: ProductId::from("broken"),
            name: "Broken".to_string(),
            price: Decimal::from(-1),
            image: String::new(),
            category: String::new(),
            brand: None,
            category_id: None,
            brand_id: None,
        },
        NonZeroU32::MIN,
    );
    let order = NewOrder {
        id: OrderId::generate(),
        customer: CustomerDetails::default(),
        email: Email::parse("dana@millworks.example").unwrap(),
        total_price: dec("12.00"),
        items: vec![line("strap", 12.0, 1), refused],
    };
    let repo = OrderRepository::new(&pool);

    assert!(repo.create(&order).await.is_err());
    assert!(repo.get(order.id).await.unwrap().is_none());

    let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lines, 0);
}
