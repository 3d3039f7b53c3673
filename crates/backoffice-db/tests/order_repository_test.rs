//! Integration tests for the Order repository using in-memory
//! SurrealDB.

use std::collections::BTreeMap;

use backoffice_core::error::BackofficeError;
use backoffice_core::models::manager::CreateManager;
use backoffice_core::models::order::{CreateOrder, Order, OrderStatus, UpdateOrder};
use backoffice_core::repository::{ManagerRepository, OrderRepository};
use backoffice_db::repository::{SurrealManagerRepository, SurrealOrderRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    backoffice_db::run_migrations(&db).await.unwrap();
    db
}

fn filter(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
        .collect()
}

async fn seed(repo: &SurrealOrderRepository<Db>, name: &str, age: i64) -> Order {
    repo.create(CreateOrder {
        name: Some(name.into()),
        age: Some(age),
        ..Default::default()
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn new_order_is_unassigned_with_null_status() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);

    let order = repo
        .create(CreateOrder {
            name: Some("Ann".into()),
            email: Some("ann@example.com".into()),
            course: Some("QACX".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::New);
    assert!(order.manager_id.is_none());
    assert!(order.group.is_none());

    let found = repo.find_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(found.name.as_deref(), Some("Ann"));

    let by_email = repo
        .find_by_email("ann@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, order.id);
}

#[tokio::test]
async fn name_filter_is_case_insensitive_substring() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);
    seed(&repo, "Alexander", 30).await;
    seed(&repo, "Sandra", 28).await;
    seed(&repo, "Bohdan", 22).await;

    // "AND" is a substring of both "alexANDer" and "sANDra" but not
    // of "bohdan".
    let found = repo
        .search(&filter(&[("name", &["AND"])]), &[], 0, 25, None)
        .await
        .unwrap();
    let names: Vec<_> = found.iter().filter_map(|o| o.name.clone()).collect();
    assert_eq!(found.len(), 2);
    assert!(names.contains(&"Alexander".to_string()));
    assert!(names.contains(&"Sandra".to_string()));

    let exact = repo
        .search(&filter(&[("name", &["SAND"])]), &[], 0, 25, None)
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].name.as_deref(), Some("Sandra"));
}

#[tokio::test]
async fn age_filter_accepts_scalar_and_array() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);
    seed(&repo, "a", 20).await;
    seed(&repo, "b", 25).await;
    seed(&repo, "c", 30).await;

    let scalar = repo
        .search(&filter(&[("age", &["25"])]), &[], 0, 25, None)
        .await
        .unwrap();
    assert_eq!(scalar.len(), 1);
    assert_eq!(scalar[0].age, Some(25));

    let array = repo
        .search(&filter(&[("age", &["20", "30"])]), &[], 0, 25, None)
        .await
        .unwrap();
    assert_eq!(array.len(), 2);
}

#[tokio::test]
async fn invalid_age_value_is_a_bad_request() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);

    let err = repo
        .search(&filter(&[("age", &["young"])]), &[], 0, 25, None)
        .await
        .unwrap_err();
    assert!(matches!(err, BackofficeError::BadRequest { .. }));
    assert_eq!(err.to_string(), "Invalid age value");
}

#[tokio::test]
async fn status_filter_treats_new_as_null() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db.clone());
    let managers = SurrealManagerRepository::new(db);

    let manager = managers
        .create(CreateManager {
            name: "Olha".into(),
            surname: "K".into(),
            email: "olha@example.com".into(),
        })
        .await
        .unwrap();

    let untouched = seed(&repo, "fresh", 20).await;
    let worked = seed(&repo, "worked", 21).await;
    repo.update_claimed(
        worked.id,
        UpdateOrder {
            status: Some(OrderStatus::InWork),
            ..Default::default()
        },
        manager.id,
    )
    .await
    .unwrap()
    .unwrap();

    let fresh = repo
        .search(&filter(&[("status", &["New"])]), &[], 0, 25, None)
        .await
        .unwrap();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].id, untouched.id);

    let in_work = repo
        .search(&filter(&[("status", &["InWork"])]), &[], 0, 25, None)
        .await
        .unwrap();
    assert_eq!(in_work.len(), 1);
    assert_eq!(in_work[0].id, worked.id);

    // An unknown status value matches nothing rather than failing.
    let bogus = repo
        .search(&filter(&[("status", &["Bogus"])]), &[], 0, 25, None)
        .await
        .unwrap();
    assert!(bogus.is_empty());
}

#[tokio::test]
async fn manager_filter_matches_by_name() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db.clone());
    let managers = SurrealManagerRepository::new(db);

    let olha = managers
        .create(CreateManager {
            name: "Olha".into(),
            surname: "K".into(),
            email: "olha@example.com".into(),
        })
        .await
        .unwrap();

    let claimed = seed(&repo, "claimed", 20).await;
    seed(&repo, "free", 21).await;
    repo.update_claimed(claimed.id, UpdateOrder::default(), olha.id)
        .await
        .unwrap()
        .unwrap();

    let found = repo
        .search(&filter(&[("manager", &["Olha"])]), &[], 0, 25, None)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, claimed.id);
}

#[tokio::test]
async fn date_filters_bound_created_at() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);
    seed(&repo, "a", 20).await;
    seed(&repo, "b", 21).await;

    let after = repo
        .count(&filter(&[("start_date", &["2000-01-01"])]), None)
        .await
        .unwrap();
    assert_eq!(after, 2);

    let before = repo
        .count(&filter(&[("end_date", &["2000-01-01"])]), None)
        .await
        .unwrap();
    assert_eq!(before, 0);

    let err = repo
        .count(&filter(&[("start_date", &["yesterday"])]), None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid date value");
}

#[tokio::test]
async fn search_paginates_and_sorts() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);
    for age in [31, 27, 35, 23] {
        seed(&repo, "x", age).await;
    }

    let sort = vec![("age".to_string(), "asc".to_string())];
    let all = repo.search(&BTreeMap::new(), &sort, 0, 25, None).await.unwrap();
    let ages: Vec<_> = all.iter().filter_map(|o| o.age).collect();
    assert_eq!(ages, vec![23, 27, 31, 35]);

    let page = repo.search(&BTreeMap::new(), &sort, 2, 2, None).await.unwrap();
    let ages: Vec<_> = page.iter().filter_map(|o| o.age).collect();
    assert_eq!(ages, vec![31, 35]);

    assert_eq!(repo.count(&BTreeMap::new(), None).await.unwrap(), 4);
}

#[tokio::test]
async fn count_by_status_buckets() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db.clone());
    let managers = SurrealManagerRepository::new(db);

    let manager = managers
        .create(CreateManager {
            name: "Olha".into(),
            surname: "K".into(),
            email: "olha@example.com".into(),
        })
        .await
        .unwrap();

    seed(&repo, "fresh", 20).await;
    for status in [OrderStatus::InWork, OrderStatus::InWork, OrderStatus::Agree] {
        let order = seed(&repo, "taken", 21).await;
        repo.update_claimed(
            order.id,
            UpdateOrder {
                status: Some(status),
                ..Default::default()
            },
            manager.id,
        )
        .await
        .unwrap()
        .unwrap();
    }

    assert_eq!(repo.count_by_status(None, None).await.unwrap(), 4);
    assert_eq!(
        repo.count_by_status(Some(OrderStatus::New), None).await.unwrap(),
        1
    );
    assert_eq!(
        repo.count_by_status(Some(OrderStatus::InWork), None)
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        repo.count_by_status(Some(OrderStatus::Dubbing), None)
            .await
            .unwrap(),
        0
    );

    // Scoped to the manager: the fresh order is not counted.
    assert_eq!(
        repo.count_by_status(None, Some(manager.id)).await.unwrap(),
        3
    );
    assert_eq!(
        repo.count_by_status(Some(OrderStatus::New), Some(manager.id))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn update_claims_the_order_for_the_acting_manager() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);
    let order = seed(&repo, "lead", 20).await;
    let acting = Uuid::new_v4();

    let updated = repo
        .update_claimed(
            order.id,
            UpdateOrder {
                course: Some("QACX".into()),
                group: Some("sep-2024".into()),
                status: Some(OrderStatus::Agree),
                ..Default::default()
            },
            acting,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.manager_id, Some(acting));
    assert_eq!(updated.course.as_deref(), Some("QACX"));
    assert_eq!(updated.group.as_deref(), Some("sep-2024"));
    assert_eq!(updated.status, OrderStatus::Agree);
    assert_eq!(updated.name.as_deref(), Some("lead")); // unchanged
}

#[tokio::test]
async fn claimed_order_rejects_other_managers() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);
    let order = seed(&repo, "lead", 20).await;
    let owner = Uuid::new_v4();

    repo.update_claimed(order.id, UpdateOrder::default(), owner)
        .await
        .unwrap()
        .unwrap();

    // Another manager's write bounces off the guard.
    let rejected = repo
        .update_claimed(
            order.id,
            UpdateOrder {
                status: Some(OrderStatus::Disagree),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
    assert!(rejected.is_none());

    // The owner can keep editing, including resetting to New.
    let reset = repo
        .update_claimed(
            order.id,
            UpdateOrder {
                status: Some(OrderStatus::New),
                ..Default::default()
            },
            owner,
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reset.status, OrderStatus::New);
    assert_eq!(reset.manager_id, Some(owner));
}

#[tokio::test]
async fn update_of_missing_order_returns_none() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);

    let result = repo
        .update_claimed(Uuid::new_v4(), UpdateOrder::default(), Uuid::new_v4())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn group_filter_matches_exactly() {
    let db = setup().await;
    let repo = SurrealOrderRepository::new(db);
    let acting = Uuid::new_v4();

    let grouped = seed(&repo, "grouped", 20).await;
    seed(&repo, "loose", 21).await;
    repo.update_claimed(
        grouped.id,
        UpdateOrder {
            group: Some("sep-2024".into()),
            ..Default::default()
        },
        acting,
    )
    .await
    .unwrap()
    .unwrap();

    let found = repo
        .search(&filter(&[("group", &["sep-2024"])]), &[], 0, 25, None)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, grouped.id);
}
