mod common;

use common::{TestDb, account, credential, default_policy};
use lockbox::error::LockboxError;
use lockbox::types::AccountRole;
use uuid::Uuid;

#[tokio::test]
async fn listing_is_scoped_to_the_caller() {
    let db = TestDb::new("cred-list").await;
    let engine = db.credential_engine(default_policy());
    let auth = db.auth_engine(default_policy());

    let alice_id = db
        .accounts()
        .add(&account("alice", "p1", AccountRole::User))
        .await
        .unwrap();
    let bob_id = db
        .accounts()
        .add(&account("bob", "p2", AccountRole::User))
        .await
        .unwrap();

    db.credentials()
        .add(&credential(alice_id, "one.example"))
        .await
        .unwrap();
    db.credentials()
        .add(&credential(alice_id, "two.example"))
        .await
        .unwrap();
    db.credentials()
        .add(&credential(bob_id, "bobs.example"))
        .await
        .unwrap();

    let alice = auth.authenticate("alice", "p1").await.unwrap().unwrap();
    let listed = engine.list(alice.identifier).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|c| c.account_id == alice_id));

    // An unverifiable token never reaches the store.
    let res = engine.list(Uuid::new_v4()).await;
    assert!(matches!(res, Err(LockboxError::AuthorizationDenied(_))));

    db.cleanup();
}

#[tokio::test]
async fn add_requires_ownership_and_a_writable_role() {
    let db = TestDb::new("cred-add").await;
    let engine = db.credential_engine(default_policy());
    let auth = db.auth_engine(default_policy());

    let dave_id = db
        .accounts()
        .add(&account("dave", "p1", AccountRole::User))
        .await
        .unwrap();
    let erin_id = db
        .accounts()
        .add(&account("erin", "p2", AccountRole::User))
        .await
        .unwrap();
    db.accounts()
        .add(&account("carol", "p3", AccountRole::Readonly))
        .await
        .unwrap();
    db.accounts()
        .add(&account("root", "adminpw", AccountRole::Admin))
        .await
        .unwrap();

    let dave = auth.authenticate("dave", "p1").await.unwrap().unwrap();
    let carol = auth.authenticate("carol", "p3").await.unwrap().unwrap();
    let admin = auth.authenticate("root", "adminpw").await.unwrap().unwrap();

    // Owner adds for itself.
    let id = engine
        .add(dave.identifier, &credential(dave_id, "daves.example"))
        .await
        .unwrap();
    assert!(db.credentials().get_by_id(id).await.unwrap().is_some());

    // dave may not plant credentials under erin's account; no row appears.
    let res = engine
        .add(dave.identifier, &credential(erin_id, "sneaky.example"))
        .await;
    assert!(matches!(res, Err(LockboxError::AuthorizationDenied(_))));
    assert!(
        db.credentials()
            .list_by_account(erin_id)
            .await
            .unwrap()
            .is_empty()
    );

    // READONLY may not add, not even for itself.
    let res = engine
        .add(carol.identifier, &credential(dave_id, "x.example"))
        .await;
    assert!(matches!(res, Err(LockboxError::AuthorizationDenied(_))));

    // The declared owner must exist at all.
    let res = engine
        .add(admin.identifier, &credential(9999, "ghost.example"))
        .await;
    assert!(matches!(res, Err(LockboxError::AuthorizationDenied(_))));

    // ADMIN may add on behalf of another account.
    let id = engine
        .add(admin.identifier, &credential(erin_id, "erins.example"))
        .await
        .unwrap();
    assert_eq!(
        db.credentials()
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .account_id,
        erin_id
    );

    db.cleanup();
}

#[tokio::test]
async fn replace_checks_the_stored_owner_not_the_payload() {
    let db = TestDb::new("cred-replace").await;
    let engine = db.credential_engine(default_policy());
    let auth = db.auth_engine(default_policy());

    let alice_id = db
        .accounts()
        .add(&account("alice", "p1", AccountRole::User))
        .await
        .unwrap();
    let bob_id = db
        .accounts()
        .add(&account("bob", "p2", AccountRole::User))
        .await
        .unwrap();

    let bob_cred_id = db
        .credentials()
        .add(&credential(bob_id, "bobs.example"))
        .await
        .unwrap();

    let alice = auth.authenticate("alice", "p1").await.unwrap().unwrap();

    // Claiming ownership in the payload changes nothing: the stored row says
    // the credential is bob's.
    let mut hijack = credential(alice_id, "bobs.example");
    hijack.id = Some(bob_cred_id);
    hijack.password = "stolen".to_string();
    let res = engine.replace(alice.identifier, &hijack).await;
    assert!(matches!(res, Err(LockboxError::AuthorizationDenied(_))));
    assert_eq!(
        db.credentials()
            .get_by_id(bob_cred_id)
            .await
            .unwrap()
            .unwrap()
            .password,
        "hunter2"
    );

    // Replacing a credential that does not exist is a distinct failure.
    let mut ghost = credential(alice_id, "ghost.example");
    ghost.id = Some(9999);
    let res = engine.replace(alice.identifier, &ghost).await;
    assert!(matches!(res, Err(LockboxError::NotFound(_))));

    db.cleanup();
}

#[tokio::test]
async fn readonly_owner_cannot_replace_its_own_credential() {
    let db = TestDb::new("cred-readonly").await;
    let engine = db.credential_engine(default_policy());
    let auth = db.auth_engine(default_policy());

    let carol_id = db
        .accounts()
        .add(&account("carol", "p3", AccountRole::Readonly))
        .await
        .unwrap();
    let cred_id = db
        .credentials()
        .add(&credential(carol_id, "carols.example"))
        .await
        .unwrap();

    let carol = auth.authenticate("carol", "p3").await.unwrap().unwrap();

    let mut update = credential(carol_id, "carols.example");
    update.id = Some(cred_id);
    update.password = "new-secret".to_string();
    let res = engine.replace(carol.identifier, &update).await;
    assert!(matches!(res, Err(LockboxError::AuthorizationDenied(_))));

    // Unchanged on disk.
    assert_eq!(
        db.credentials()
            .get_by_id(cred_id)
            .await
            .unwrap()
            .unwrap()
            .password,
        "hunter2"
    );

    db.cleanup();
}

#[tokio::test]
async fn remove_requires_owner_or_admin_and_existing_rows() {
    let db = TestDb::new("cred-remove").await;
    let engine = db.credential_engine(default_policy());
    let auth = db.auth_engine(default_policy());

    let alice_id = db
        .accounts()
        .add(&account("alice", "p1", AccountRole::User))
        .await
        .unwrap();
    let bob_id = db
        .accounts()
        .add(&account("bob", "p2", AccountRole::User))
        .await
        .unwrap();
    db.accounts()
        .add(&account("root", "adminpw", AccountRole::Admin))
        .await
        .unwrap();

    let alice_cred = db
        .credentials()
        .add(&credential(alice_id, "a.example"))
        .await
        .unwrap();
    let bob_cred = db
        .credentials()
        .add(&credential(bob_id, "b.example"))
        .await
        .unwrap();

    let alice = auth.authenticate("alice", "p1").await.unwrap().unwrap();
    let admin = auth.authenticate("root", "adminpw").await.unwrap().unwrap();

    // Not the owner.
    let res = engine.remove(alice.identifier, bob_cred).await;
    assert!(matches!(res, Err(LockboxError::AuthorizationDenied(_))));

    // Unknown credential.
    let res = engine.remove(alice.identifier, 9999).await;
    assert!(matches!(res, Err(LockboxError::NotFound(_))));

    // Owner removes its own.
    engine.remove(alice.identifier, alice_cred).await.unwrap();
    assert!(db.credentials().get_by_id(alice_cred).await.unwrap().is_none());

    // Orphaned credential: the owning account is gone before the removal.
    db.accounts().remove(bob_id).await.unwrap();
    let res = engine.remove(admin.identifier, bob_cred).await;
    assert!(matches!(res, Err(LockboxError::NotFound(_))));

    db.cleanup();
}
