mod common;

use chat_server::error::Error;
use chat_server::models::{MessageKind, BROADCAST, JOINED_TEXT};
use common::{manager, temp_pool};

#[tokio::test]
async fn test_join_creates_participant_and_status_message() {
    let (_dir, pool) = temp_pool().await;
    let chat = manager(&pool);

    let joined = chat.join("maria").await.unwrap();
    assert_eq!(joined.name, "maria");

    let participants = chat.list_participants().await.unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].name, "maria");

    let messages = chat.poll_messages(None, None).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].from, "maria");
    assert_eq!(messages[0].to, BROADCAST);
    assert_eq!(messages[0].text, JOINED_TEXT);
    assert_eq!(messages[0].kind, MessageKind::Status);
    assert_eq!(messages[0].time.len(), "HH:MM:SS".len());
}

#[tokio::test]
async fn test_duplicate_join_is_conflict_without_side_effects() {
    let (_dir, pool) = temp_pool().await;
    let chat = manager(&pool);

    chat.join("maria").await.unwrap();
    let err = chat.join("maria").await.unwrap_err();
    assert!(matches!(err, Error::Conflict(ref name) if name == "maria"));

    assert_eq!(chat.list_participants().await.unwrap().len(), 1);
    assert_eq!(chat.messages().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_joins_of_same_name_admit_one() {
    let (_dir, pool) = temp_pool().await;
    let chat = manager(&pool);

    // The pool has several connections, so both inserts reach SQLite at once.
    let (a, b) = tokio::join!(chat.join("twin"), chat.join("twin"));
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let loser = a.err().or(b.err()).unwrap();
    assert!(matches!(loser, Error::Conflict(ref name) if name == "twin"));
    assert_eq!(chat.list_participants().await.unwrap().len(), 1);
    assert_eq!(chat.messages().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let (_dir, pool) = temp_pool().await;
    let chat = manager(&pool);

    assert!(matches!(chat.join("   ").await, Err(Error::Validation(_))));
    assert!(chat.list_participants().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_heartbeat_refreshes_known_and_rejects_unknown() {
    let (_dir, pool) = temp_pool().await;
    let chat = manager(&pool);

    let joined = chat.join("joao").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    chat.heartbeat("joao").await.unwrap();

    let refreshed = chat.participants().find("joao").await.unwrap().unwrap();
    assert!(refreshed.last_seen_at > joined.last_seen_at);

    let before = chat.list_participants().await.unwrap();
    let err = chat.heartbeat("ghost").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(chat.list_participants().await.unwrap(), before);
    assert_eq!(chat.messages().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_send_message_validation_and_unknown_sender() {
    let (_dir, pool) = temp_pool().await;
    let chat = manager(&pool);
    chat.join("ana").await.unwrap();

    let cases = [
        ("", "hi", "message"),
        ("bob", "  ", "message"),
        ("bob", "hi", "status"),
        ("bob", "hi", "shout"),
    ];
    for (to, text, kind) in cases {
        let err = chat.send_message(Some("ana"), to, text, kind).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{to:?} {text:?} {kind:?}");
    }

    let err = chat
        .send_message(Some("nobody"), BROADCAST, "hi", "message")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownSender(_)));

    let err = chat
        .send_message(None, BROADCAST, "hi", "message")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownSender(_)));

    // Only the join notice made it into the log.
    assert_eq!(chat.messages().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_poll_applies_visibility_and_limit() {
    let (_dir, pool) = temp_pool().await;
    let chat = manager(&pool);
    chat.join("ana").await.unwrap();
    chat.join("bob").await.unwrap();
    chat.join("carl").await.unwrap();

    chat.send_message(Some("ana"), BROADCAST, "hello", "message")
        .await
        .unwrap();
    chat.send_message(Some("ana"), "bob", "secret", "private_message")
        .await
        .unwrap();
    chat.send_message(Some("bob"), BROADCAST, "bye", "message")
        .await
        .unwrap();

    let for_carl = chat.poll_messages(Some("carl"), None).await.unwrap();
    assert_eq!(for_carl.len(), 5);
    assert!(for_carl.iter().all(|m| m.text != "secret"));

    let for_bob = chat.poll_messages(Some("bob"), None).await.unwrap();
    assert_eq!(for_bob.len(), 6);

    let last_two = chat.poll_messages(Some("bob"), Some(2)).await.unwrap();
    let texts: Vec<_> = last_two.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["secret", "bye"]);
}
