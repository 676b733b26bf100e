//! Identity store tests — registration, authentication, bulk import upsert,
//! and photo updates.

mod common;

use common::setup_test_db;

use momtrack::auth::password;
use momtrack::errors::AppError;
use momtrack::models::user::{self, ImportRow, NewUser, DEFAULT_IMPORT_PASSWORD};

fn new_user(name: &str, email: &str, plain_password: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: password::hash_password(plain_password).expect("hash failed"),
        department: Some("Engineering".to_string()),
        manager_name: Some("Dana".to_string()),
        photo: None,
    }
}

fn import_row(name: &str, email: &str) -> ImportRow {
    ImportRow {
        name: name.to_string(),
        email: email.to_string(),
        password: None,
        department: Some("Quality".to_string()),
        manager_name: None,
        photo: None,
    }
}

#[tokio::test]
async fn register_then_authenticate() {
    let pool = setup_test_db().await;

    let user_id = user::create(&pool, &new_user("Asha", "asha@test.com", "sup3rsecret"))
        .await
        .unwrap();
    assert!(user_id > 0);

    let found = user::find_by_email(&pool, "asha@test.com")
        .await
        .unwrap()
        .expect("user not found");
    assert!(password::verify_password("sup3rsecret", &found.password).unwrap());
    assert!(!password::verify_password("wrong", &found.password).unwrap());

    // The stored password is a salted hash, never the plaintext.
    assert_ne!(found.password, "sup3rsecret");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let pool = setup_test_db().await;

    user::create(&pool, &new_user("Asha", "asha@test.com", "sup3rsecret"))
        .await
        .unwrap();
    let err = user::create(&pool, &new_user("Other Asha", "asha@test.com", "different1"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Duplicate(_)));
}

#[tokio::test]
async fn list_returns_profiles_without_hashes() {
    let pool = setup_test_db().await;

    user::create(&pool, &new_user("Asha", "asha@test.com", "sup3rsecret"))
        .await
        .unwrap();
    user::create(&pool, &new_user("Ben", "ben@test.com", "sup3rsecret"))
        .await
        .unwrap();

    let profiles = user::find_all(&pool).await.unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].name, "Asha");
    assert_eq!(profiles[1].email, "ben@test.com");
}

#[tokio::test]
async fn import_upserts_on_email() {
    let pool = setup_test_db().await;

    let rows = vec![import_row("Jane Doe", "jane@test.com")];

    let first = user::import(&pool, &rows).await.unwrap();
    assert_eq!(first.inserted, 1);
    assert_eq!(first.skipped, 0);
    assert!(first.errors.is_empty());

    // Importing the identical row again updates in place.
    let second = user::import(&pool, &rows).await.unwrap();
    assert_eq!(second.inserted, 1);

    let profiles = user::find_all(&pool).await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].name, "Jane Doe");
}

#[tokio::test]
async fn import_overwrites_all_fields_except_id() {
    let pool = setup_test_db().await;

    user::import(&pool, &[import_row("Jane Doe", "jane@test.com")])
        .await
        .unwrap();
    let before = user::find_all(&pool).await.unwrap();

    let mut updated = import_row("Jane D.", "jane@test.com");
    updated.department = Some("Operations".to_string());
    user::import(&pool, &[updated]).await.unwrap();

    let after = user::find_all(&pool).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].user_id, before[0].user_id);
    assert_eq!(after[0].name, "Jane D.");
    assert_eq!(after[0].department.as_deref(), Some("Operations"));
}

#[tokio::test]
async fn import_skips_rows_missing_name_or_email() {
    let pool = setup_test_db().await;

    let rows = vec![
        import_row("", "noname@test.com"),
        import_row("No Email", ""),
        import_row("Jane Doe", "jane@test.com"),
    ];
    let result = user::import(&pool, &rows).await.unwrap();

    assert_eq!(result.inserted, 1);
    assert_eq!(result.skipped, 2);
    assert!(result.errors.is_empty());
    assert_eq!(user::find_all(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn import_defaults_and_hashes_missing_passwords() {
    let pool = setup_test_db().await;

    user::import(&pool, &[import_row("Jane Doe", "jane@test.com")])
        .await
        .unwrap();

    let jane = user::find_by_email(&pool, "jane@test.com")
        .await
        .unwrap()
        .expect("user not found");
    assert_ne!(jane.password, DEFAULT_IMPORT_PASSWORD);
    assert!(password::verify_password(DEFAULT_IMPORT_PASSWORD, &jane.password).unwrap());
}

#[tokio::test]
async fn import_lowercases_emails() {
    let pool = setup_test_db().await;

    user::import(&pool, &[import_row("Jane Doe", "Jane@Test.COM")])
        .await
        .unwrap();

    let jane = user::find_by_email(&pool, "jane@test.com").await.unwrap();
    assert!(jane.is_some());
}

#[tokio::test]
async fn photo_update_requires_existing_user() {
    let pool = setup_test_db().await;

    user::create(&pool, &new_user("Asha", "asha@test.com", "sup3rsecret"))
        .await
        .unwrap();

    user::update_photo(&pool, "asha@test.com", "/uploads/user-1.jpg")
        .await
        .unwrap();
    let asha = user::find_by_email(&pool, "asha@test.com")
        .await
        .unwrap()
        .expect("user not found");
    assert_eq!(asha.photo.as_deref(), Some("/uploads/user-1.jpg"));

    let err = user::update_photo(&pool, "nobody@test.com", "/uploads/x.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
