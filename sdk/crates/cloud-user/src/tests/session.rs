use crate::tests::support::offline_session;
use crate::{MIGRATED_FLAG, User, UserValue};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cloud_core::{EVENT_AUTH_TOKEN_CHANGED, EVENT_CORE_INIT, EVENT_PUSH_NOTIFICATION};
use cloud_storage::Storage;
use serde_json::{Value, json};

#[test]
fn given_session_when_created_then_core_init_emitted() {
    let session = offline_session(Storage::in_memory());

    assert!(session.events().emitted(EVENT_CORE_INIT));
}

#[test]
fn given_empty_storage_when_current_twice_then_same_anonymous_instance() {
    let session = offline_session(Storage::in_memory());

    let first = session.current().unwrap();
    let second = session.current().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.try_lock().unwrap().is_anonymous());
}

#[test]
fn given_stored_user_when_current_then_loaded_from_storage() {
    let storage = Storage::in_memory();
    let session = offline_session(storage.clone());
    storage
        .store_object(
            session.context().key(),
            &json!({"_id": "u1", "data": {"data": {"a": 1}}, "details": {}, "_fresh": false, "_dirty": true}),
        )
        .unwrap();

    let current = session.current().unwrap();
    let user = current.try_lock().unwrap();

    assert_eq!(user.id(), Some("u1"));
    assert!(user.is_dirty());
    assert!(session.is_current(&user));
}

#[test]
fn given_new_user_when_set_current_then_persisted_and_replaces_current() {
    let session = offline_session(Storage::in_memory());
    let old = session.current().unwrap();

    let new = session.set_current(User::with_id("u2")).unwrap();

    assert!(!Arc::ptr_eq(&old, &session.current().unwrap()));
    assert!(Arc::ptr_eq(&new, &session.current().unwrap()));
    assert!(!session.is_current(&old.try_lock().unwrap()));
    assert_eq!(session.context().raw_data().unwrap().unwrap()["_id"], "u2");
}

#[test]
fn given_current_user_when_cloned_then_clone_is_not_current() {
    let session = offline_session(Storage::in_memory());
    let shared = session.set_current(User::with_id("u1")).unwrap();
    let live = shared.try_lock().unwrap();

    let copy = live.clone();

    assert_eq!(copy.id(), Some("u1"));
    assert_ne!(copy.instance_id(), live.instance_id());
    assert!(session.is_current(&live));
    assert!(!session.is_current(&copy));
}

#[test]
fn given_token_change_when_set_token_then_event_emitted_and_client_follows() {
    let session = offline_session(Storage::in_memory());
    let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
    let sink = seen.clone();
    session.events().on(EVENT_AUTH_TOKEN_CHANGED, move |change| {
        sink.lock().unwrap().push(change.clone());
    });

    session.set_token(Some("t1".to_string()));
    session.set_token(Some("t1".to_string()));
    session.set_token(None);

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            json!({"old": null, "new": "t1"}),
            json!({"old": "t1", "new": null}),
        ]
    );
    assert!(session.client().token().is_none());
    assert!(!session.is_authenticated());
}

#[test]
fn given_token_when_set_then_client_uses_it() {
    let session = offline_session(Storage::in_memory());

    session.set_token(Some("abc".to_string()));

    assert_eq!(session.client().token().as_deref(), Some("abc"));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn given_legacy_snapshot_when_migrate_then_fields_copied_once() {
    let storage = Storage::in_memory();
    let session = offline_session(storage.clone());
    storage
        .store_object(
            session.context().legacy_key(),
            &json!({"_id": "old", "data": {"data": {"color": "red", "visits": 4}}}),
        )
        .unwrap();

    assert!(session.migrate().await.unwrap());

    let current = session.current().unwrap();
    {
        let user = current.lock().await;
        assert_eq!(user.get("color"), Some(&UserValue::from("red")));
        assert_eq!(user.get("visits"), Some(&UserValue::from(4)));
        assert_eq!(user.get(MIGRATED_FLAG), Some(&UserValue::from(true)));
        session.context().store(&user).unwrap();
    }

    assert!(!session.migrate().await.unwrap());
    assert_eq!(
        storage.retrieve_object(session.context().legacy_key()).unwrap(),
        Some(json!({MIGRATED_FLAG: true}))
    );
}

#[tokio::test]
async fn given_no_legacy_snapshot_when_migrate_then_nothing_happens() {
    let session = offline_session(Storage::in_memory());

    assert!(!session.migrate().await.unwrap());
    assert!(session.current().unwrap().lock().await.data().is_empty());
}

#[test]
fn given_push_json_when_handle_push_then_event_emitted_with_message() {
    let session = offline_session(Storage::in_memory());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    session.events().on(EVENT_PUSH_NOTIFICATION, move |data| {
        assert_eq!(data["message"]["title"], "Hi");
        assert_eq!(data["message"]["app"]["asleep"], false);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let message = session.handle_push(json!({"title": "Hi"}));

    assert_eq!(message.title.as_deref(), Some("Hi"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
