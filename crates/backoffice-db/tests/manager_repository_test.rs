//! Integration tests for the Manager repository using in-memory
//! SurrealDB.

use backoffice_core::models::manager::{CreateManager, UpdateManager};
use backoffice_core::repository::ManagerRepository;
use backoffice_db::repository::SurrealManagerRepository;
use backoffice_db::verify_password;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    backoffice_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_and_find_manager() {
    let db = setup().await;
    let repo = SurrealManagerRepository::new(db);

    let manager = repo
        .create(CreateManager {
            name: "Ann".into(),
            surname: "Smith".into(),
            email: "ann@example.com".into(),
        })
        .await
        .unwrap();

    assert_eq!(manager.name, "Ann");
    assert_eq!(manager.surname, "Smith");
    assert_eq!(manager.email, "ann@example.com");
    assert_eq!(manager.role, "manager");
    assert!(manager.password_hash.is_none());
    assert!(!manager.is_active);
    assert!(manager.last_login.is_none());

    let by_id = repo.find_by_id(manager.id).await.unwrap().unwrap();
    assert_eq!(by_id.id, manager.id);

    let by_email = repo
        .find_by_email("ann@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, manager.id);
}

#[tokio::test]
async fn missing_manager_is_none() {
    let db = setup().await;
    let repo = SurrealManagerRepository::new(db);

    assert!(repo.find_by_id(uuid::Uuid::new_v4()).await.unwrap().is_none());
    assert!(
        repo.find_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn update_patches_only_supplied_fields() {
    let db = setup().await;
    let repo = SurrealManagerRepository::new(db);

    let manager = repo
        .create(CreateManager {
            name: "Bob".into(),
            surname: "Brown".into(),
            email: "bob@example.com".into(),
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            manager.id,
            UpdateManager {
                name: Some("Robert".into()),
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Robert");
    assert!(updated.is_active);
    assert_eq!(updated.surname, "Brown"); // unchanged
    assert_eq!(updated.email, "bob@example.com"); // unchanged
}

#[tokio::test]
async fn password_is_hashed_only_when_supplied() {
    let db = setup().await;
    let repo = SurrealManagerRepository::new(db);

    let manager = repo
        .create(CreateManager {
            name: "Carol".into(),
            surname: "Clark".into(),
            email: "carol@example.com".into(),
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            manager.id,
            UpdateManager {
                password: Some("SuperSecret123!".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let hash = updated.password_hash.expect("password should be stored");
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify_password("SuperSecret123!", &hash, None).unwrap());

    // A patch without a password leaves the stored hash alone.
    let untouched = repo
        .update(
            manager.id,
            UpdateManager {
                status: Some("active".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(untouched.password_hash, Some(hash));
}

#[tokio::test]
async fn update_missing_manager_fails() {
    let db = setup().await;
    let repo = SurrealManagerRepository::new(db);

    let result = repo
        .update(
            uuid::Uuid::new_v4(),
            UpdateManager {
                name: Some("Ghost".into()),
                ..Default::default()
            },
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn list_managers_with_pagination() {
    let db = setup().await;
    let repo = SurrealManagerRepository::new(db);

    for i in 0..5 {
        repo.create(CreateManager {
            name: format!("manager-{i}"),
            surname: "Test".into(),
            email: format!("manager-{i}@example.com"),
        })
        .await
        .unwrap();
    }

    let (page1, total) = repo.list(0, 3).await.unwrap();
    assert_eq!(page1.len(), 3);
    assert_eq!(total, 5);

    let (page2, _) = repo.list(3, 3).await.unwrap();
    assert_eq!(page2.len(), 2);
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let db = setup().await;
    let repo = SurrealManagerRepository::new(db);

    repo.create(CreateManager {
        name: "First".into(),
        surname: "User".into(),
        email: "same@example.com".into(),
    })
    .await
    .unwrap();

    let result = repo
        .create(CreateManager {
            name: "Second".into(),
            surname: "User".into(),
            email: "same@example.com".into(),
        })
        .await;

    assert!(result.is_err(), "duplicate email should be rejected");
}
