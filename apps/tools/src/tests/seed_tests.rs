use super::*;

#[tokio::test]
async fn import_replaces_existing_data_with_seed_set() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    create_admin(&storage, "Old Admin", "old@email.com", "pw")
        .await
        .expect("old admin");

    let admin = import(&storage).await.expect("import");

    let users = storage.list_users().await.expect("users");
    assert_eq!(users.len(), USERS.len());
    assert!(users.iter().all(|u| u.email != "old@email.com"));
    let seeded_admin = users.iter().find(|u| u.is_admin).expect("admin");
    assert_eq!(seeded_admin.user_id, admin);
    assert!(auth::verify_password(SEED_PASSWORD, &seeded_admin.password_hash));

    assert_eq!(
        storage.count_products(None).await.expect("count") as usize,
        products().len()
    );

    import(&storage).await.expect("second import is idempotent");
    assert_eq!(storage.list_users().await.expect("users").len(), USERS.len());
}

#[tokio::test]
async fn create_admin_rejects_duplicate_email() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    create_admin(&storage, "Root", "Root@Email.com", "pw")
        .await
        .expect("admin");
    let stored = storage
        .find_user_by_email("root@email.com")
        .await
        .expect("lookup")
        .expect("user");
    assert!(stored.is_admin);

    assert!(create_admin(&storage, "Again", "root@email.com", "pw")
        .await
        .is_err());
    assert!(create_admin(&storage, "Bad", "not-an-email", "pw")
        .await
        .is_err());
}
