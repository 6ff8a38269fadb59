//! PostgreSQL integration tests
//!
//! These tests start a shared PostgreSQL container and need a Docker
//! daemon, so they are ignored by default. They truncate the shared tables,
//! so each one runs `#[serial]`. Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --ignored
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use common::Money;
use domain::{NewLineItem, NewOrder};
use serial_test::serial;
use sqlx::PgPool;
use store::{OrderId, OrderRepository, PostgresOrderRepository, RepositoryError};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_orders_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh repository with its own pool and cleared tables
async fn get_test_repository() -> PostgresOrderRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE order_items, orders RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderRepository::new(pool)
}

fn alice_order() -> NewOrder {
    NewOrder::new(
        "Alice",
        None,
        vec![
            NewLineItem::new("Widget", 2, Money::from_cents(999)),
            NewLineItem::new("Gadget", 1, Money::from_cents(1999)),
        ],
    )
    .unwrap()
}

async fn count(repo: &PostgresOrderRepository, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(repo.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn create_and_read_order() {
    let repo = get_test_repository().await;

    let created = repo.create(alice_order()).await.unwrap();
    assert_eq!(created.customer(), "Alice");
    assert_eq!(created.item_count(), 2);
    assert_eq!(created.total().cents(), 3997);
    assert!(created.items().iter().all(|i| i.order_id() == created.id()));

    let loaded = repo.read_by_id(created.id()).await.unwrap();
    assert_eq!(loaded, Some(created));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn create_uses_database_date_when_missing() {
    let repo = get_test_repository().await;

    let created = repo.create(alice_order()).await.unwrap();
    let today: NaiveDate = sqlx::query_scalar("SELECT CURRENT_DATE")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(created.order_date(), today);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn read_all_returns_orders_in_id_order() {
    let repo = get_test_repository().await;

    let first = repo.create(alice_order()).await.unwrap();
    let second = repo
        .create(
            NewOrder::new(
                "Bob",
                None,
                vec![NewLineItem::new("Gizmo", 3, Money::from_cents(250))],
            )
            .unwrap(),
        )
        .await
        .unwrap();

    let orders = repo.read_all().await.unwrap();
    assert_eq!(orders, vec![first, second]);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn read_missing_order_returns_none() {
    let repo = get_test_repository().await;
    assert_eq!(repo.read_by_id(OrderId::new(999)).await.unwrap(), None);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn update_persists_fields_and_keeps_items() {
    let repo = get_test_repository().await;
    let mut order = repo.create(alice_order()).await.unwrap();

    order.rename_customer("Bob").unwrap();
    order.reschedule(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());

    let updated = repo.update(&order).await.unwrap();
    assert_eq!(updated, order);
    assert_eq!(updated.item_count(), 2);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn delete_cascades_to_items() {
    let repo = get_test_repository().await;
    let order = repo.create(alice_order()).await.unwrap();

    repo.delete(order.id()).await.unwrap();

    assert_eq!(repo.read_by_id(order.id()).await.unwrap(), None);
    assert_eq!(count(&repo, "order_items").await, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn delete_missing_order_is_not_found() {
    let repo = get_test_repository().await;
    assert_eq!(
        repo.delete(OrderId::new(999)).await,
        Err(RepositoryError::NotFound(OrderId::new(999)))
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn failed_item_insert_rolls_back_order() {
    let repo = get_test_repository().await;

    // Force the second item insert to violate a constraint the domain would
    // normally catch first.
    sqlx::query(
        "ALTER TABLE order_items ADD CONSTRAINT no_gadgets CHECK (product <> 'Gadget')",
    )
    .execute(repo.pool())
    .await
    .unwrap();

    let result = repo.create(alice_order()).await;

    sqlx::query("ALTER TABLE order_items DROP CONSTRAINT no_gadgets")
        .execute(repo.pool())
        .await
        .unwrap();

    assert!(matches!(result, Err(RepositoryError::Persistence(_))));
    assert_eq!(count(&repo, "orders").await, 0);
    assert_eq!(count(&repo, "order_items").await, 0);
}
