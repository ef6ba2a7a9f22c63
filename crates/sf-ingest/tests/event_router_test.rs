//! Non-CDC Event Router Tests
//!
//! Tests for:
//! - eventType literal -> save/update/delete
//! - Contact -> member password sync on `is_sync`
//! - Sync failures after a successful primary write

mod common;

use std::sync::Arc;

use sf_common::{Address, Contact, MemberPassword, MessageContext};
use sf_ingest::event::{ADDRESS_EVENTS, CONTACT_EVENTS};
use sf_ingest::{Applied, EventHandler, InMemoryRepository, MemberPasswordSync, MessageHandler};

use common::{reporter, LogCapture, RecordingMembers, RecordingRepository};

fn ctx() -> MessageContext {
    MessageContext::new("msg-1")
}

fn contact_handler(
    contacts: Arc<dyn sf_ingest::Repository<Contact>>,
    members: Arc<RecordingMembers>,
) -> EventHandler<Contact> {
    let (reporter, _) = reporter();
    EventHandler::new(CONTACT_EVENTS, contacts, reporter).with_hook(Arc::new(MemberPasswordSync::new(members)))
}

const SYNCED_CONTACT_UPDATE: &[u8] = br#"{
    "eventType": "CONTACT_UPDATED",
    "payload": {
        "id": 42,
        "email": "jane@example.com",
        "password": "hash",
        "salt": "pepper",
        "last_password_modified": "2024-03-01T10:00:00Z",
        "is_sync": true
    }
}"#;

// ============================================================================
// Routing by event type
// ============================================================================

#[tokio::test]
async fn test_event_types_map_to_repository_methods() {
    let repo = Arc::new(RecordingRepository::<Address>::new());
    let (reporter, _) = reporter();
    let handler = EventHandler::<Address>::new(ADDRESS_EVENTS, repo.clone(), reporter);

    let created = handler
        .apply(&ctx(), br#"{"eventType":"ADDRESS_CREATED","payload":{"id":7,"city":"Bandung"}}"#)
        .await
        .unwrap();
    let updated = handler
        .apply(&ctx(), br#"{"eventType":"ADDRESS_UPDATED","payload":{"id":7,"city":"Jakarta"}}"#)
        .await
        .unwrap();
    let deleted = handler
        .apply(&ctx(), br#"{"eventType":"ADDRESS_DELETED","payload":{"id":7,"city":"Jakarta"}}"#)
        .await
        .unwrap();

    assert_eq!((created, updated, deleted), (Applied::Saved, Applied::Updated, Applied::Deleted));

    let calls = repo.calls();
    let methods: Vec<_> = calls.iter().map(|(method, _)| *method).collect();
    assert_eq!(methods, vec!["save", "update", "delete"]);
    assert_eq!(calls[1].1.city, "Jakarta");
    assert_eq!(calls[2].1, Address { id: 7, ..Address::default() });
}

#[tokio::test]
async fn test_unknown_event_type_is_ignored() {
    let logs = LogCapture::default();
    let _guard = logs.install();

    let repo = Arc::new(RecordingRepository::<Address>::new());
    let (reporter, _) = reporter();
    let handler = EventHandler::<Address>::new(ADDRESS_EVENTS, repo.clone(), reporter);

    for event_type in ["PHONE_CREATED", "ADDRESS_ARCHIVED", ""] {
        let raw = format!(r#"{{"eventType":"{event_type}","payload":{{"id":1}}}}"#);
        assert!(handler.apply(&ctx(), raw.as_bytes()).await.unwrap().is_ignored());
    }

    assert_eq!(repo.call_count(), 0);
    assert_eq!(logs.count("WARN"), 3);
}

#[tokio::test]
async fn test_unknown_event_type_ignores_foreign_payload() {
    let logs = LogCapture::default();
    let _guard = logs.install();

    let repo = Arc::new(RecordingRepository::<Address>::new());
    let (reporter, _) = reporter();
    let handler = EventHandler::<Address>::new(ADDRESS_EVENTS, repo.clone(), reporter);

    let applied = handler
        .apply(&ctx(), br#"{"eventType":"ADDRESS_ARCHIVED","payload":{"id":"x-1"}}"#)
        .await
        .unwrap();
    let scalar = handler
        .apply(&ctx(), br#"{"eventType":"PHONE_CREATED","payload":"not-an-address"}"#)
        .await
        .unwrap();

    assert!(applied.is_ignored());
    assert!(scalar.is_ignored());
    assert_eq!(repo.call_count(), 0);
    assert_eq!(logs.count("ERROR"), 0);
}

#[tokio::test]
async fn test_known_event_type_with_mismatched_payload_fails() {
    let logs = LogCapture::default();
    let _guard = logs.install();

    let repo = Arc::new(RecordingRepository::<Address>::new());
    let (reporter, _) = reporter();
    let handler = EventHandler::<Address>::new(ADDRESS_EVENTS, repo.clone(), reporter);

    let err = handler
        .apply(&ctx(), br#"{"eventType":"ADDRESS_CREATED","payload":{"id":"x-1"}}"#)
        .await
        .unwrap_err();

    assert!(err.is_decode());
    assert_eq!(repo.call_count(), 0);
    assert_eq!(logs.count("ERROR"), 1);
}

#[tokio::test]
async fn test_null_payload_saves_zero_value() {
    let repo = Arc::new(RecordingRepository::<Address>::new());
    let (reporter, _) = reporter();
    let handler = EventHandler::<Address>::new(ADDRESS_EVENTS, repo.clone(), reporter);

    handler
        .apply(&ctx(), br#"{"eventType":"ADDRESS_CREATED","payload":null}"#)
        .await
        .unwrap();

    assert_eq!(repo.calls()[0].1, Address::default());
}

#[tokio::test]
async fn test_malformed_event_writes_nothing() {
    let logs = LogCapture::default();
    let _guard = logs.install();

    let repo = Arc::new(RecordingRepository::<Address>::new());
    let (reporter, _) = reporter();
    let handler = EventHandler::<Address>::new(ADDRESS_EVENTS, repo.clone(), reporter);

    let err = handler.handle(&ctx(), b"[1, 2").await.unwrap_err();

    assert!(err.is_decode());
    assert_eq!(repo.call_count(), 0);
    assert_eq!(logs.count("ERROR"), 1);
}

// ============================================================================
// Member password sync
// ============================================================================

#[tokio::test]
async fn test_synced_contact_update_pushes_member_password_once() {
    let contacts = Arc::new(RecordingRepository::<Contact>::new());
    let members = Arc::new(RecordingMembers::new());
    let handler = contact_handler(contacts.clone(), members.clone());

    let applied = handler.apply(&ctx(), SYNCED_CONTACT_UPDATE).await.unwrap();

    assert_eq!(applied, Applied::Updated);
    assert_eq!(contacts.call_count(), 1);
    assert_eq!(
        members.calls(),
        vec![MemberPassword {
            email: "jane@example.com".to_string(),
            password: "hash".to_string(),
            salt: "pepper".to_string(),
            last_password_modified: "2024-03-01T10:00:00Z".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_synced_contact_create_also_pushes() {
    let contacts = Arc::new(RecordingRepository::<Contact>::new());
    let members = Arc::new(RecordingMembers::new());
    let handler = contact_handler(contacts.clone(), members.clone());

    let raw = br#"{"eventType":"CONTACT_CREATED","payload":{"id":1,"email":"a@b.c","is_sync":true}}"#;
    handler.apply(&ctx(), raw).await.unwrap();

    assert_eq!(members.calls().len(), 1);
}

#[tokio::test]
async fn test_unsynced_contact_skips_member_store() {
    let contacts = Arc::new(RecordingRepository::<Contact>::new());
    let members = Arc::new(RecordingMembers::new());
    let handler = contact_handler(contacts.clone(), members.clone());

    let raw = br#"{"eventType":"CONTACT_UPDATED","payload":{"id":42,"email":"jane@example.com","is_sync":false}}"#;
    handler.apply(&ctx(), raw).await.unwrap();

    let raw = br#"{"eventType":"CONTACT_UPDATED","payload":{"id":42,"email":"jane@example.com"}}"#;
    handler.apply(&ctx(), raw).await.unwrap();

    assert_eq!(contacts.call_count(), 2);
    assert!(members.calls().is_empty());
}

#[tokio::test]
async fn test_contact_delete_never_syncs() {
    let contacts = Arc::new(RecordingRepository::<Contact>::new());
    let members = Arc::new(RecordingMembers::new());
    let handler = contact_handler(contacts.clone(), members.clone());

    let raw = br#"{"eventType":"CONTACT_DELETED","payload":{"id":42,"is_sync":true}}"#;
    assert_eq!(handler.apply(&ctx(), raw).await.unwrap(), Applied::Deleted);
    assert!(members.calls().is_empty());
}

#[tokio::test]
async fn test_sync_failure_keeps_primary_write() {
    let logs = LogCapture::default();
    let _guard = logs.install();

    let contacts = Arc::new(InMemoryRepository::<Contact>::new());
    let members = Arc::new(RecordingMembers::failing());
    let handler = contact_handler(contacts.clone(), members.clone());

    let err = handler.handle(&ctx(), SYNCED_CONTACT_UPDATE).await.unwrap_err();

    assert_eq!(err.to_string(), "member store unavailable");
    assert_eq!(contacts.get("42").unwrap().email, "jane@example.com");
    assert_eq!(members.calls().len(), 1);
    assert_eq!(logs.count("ERROR"), 1);
    assert!(logs.contents().contains("contact.member_password_sync"));
}

#[tokio::test]
async fn test_primary_write_failure_skips_sync() {
    let contacts = Arc::new(RecordingRepository::<Contact>::failing("deadlock"));
    let members = Arc::new(RecordingMembers::new());
    let handler = contact_handler(contacts.clone(), members.clone());

    let err = handler.handle(&ctx(), SYNCED_CONTACT_UPDATE).await.unwrap_err();

    assert_eq!(err.to_string(), "deadlock");
    assert!(members.calls().is_empty());
}
