use chat_model::{ModelError, Session, Status};
use chat_sample::{Chat, Contact, GroupChat, HistoryFeed, Messenger};
use serde_json::json;

fn seeded_session() -> Messenger {
    let session = Messenger::new();
    session.add_contact(Contact::new("8:alice_smith", "Alice Smith", Status::Online));
    session.add_contact(Contact::new("8:bob_jones", "Bob Jones", Status::Busy).with_mood("heads down"));
    session.add_contact(Contact::new("8:carol", "Carol", Status::Idle));
    session.add_chat(Chat::new("19:team@thread.skype", "Team standup"));
    session
}

fn team_payload(user_ids: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "19:team@thread.skype",
        "topic": "Team standup",
        "creatorId": "8:alice_smith",
        "userIds": user_ids,
        "adminIds": ["8:alice_smith"],
    })
}

/// End-to-end: a group chat built from a raw payload resolves its creator,
/// members, and admins through the session directories.
#[tokio::test]
async fn group_chat_resolves_every_reference_style() {
    let session = seeded_session();
    let group = GroupChat::from_payload(
        session,
        team_payload(json!(["8:alice_smith", "8:bob_jones", "8:carol"])),
    )
    .expect("Failed to build group chat");

    let creator = group.creator().await.expect("Failed to resolve creator");
    assert_eq!(creator.name, "Alice Smith");
    assert_eq!(creator.status, Status::Online);

    let members = group
        .members()
        .expect("Failed to start member walk")
        .collect()
        .await
        .expect("Failed to collect members");
    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Alice Smith", "Bob Jones", "Carol"]);

    let admins = group
        .admins()
        .expect("Failed to start admin walk")
        .collect()
        .await
        .expect("Failed to collect admins");
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].id, "8:alice_smith");

    // Unbound in the payload; the schema default applies.
    assert!(!group.is_open());
}

/// A missing member ends the walk at the miss; resolving the accessor again
/// starts a fresh walk over the full stored list.
#[tokio::test]
async fn member_walks_are_lazy_and_fresh_per_access() {
    let session = seeded_session();
    let group = GroupChat::from_payload(
        session,
        team_payload(json!(["8:alice_smith", "8:ghost", "8:carol"])),
    )
    .expect("Failed to build group chat");

    let mut walk = group.members().expect("Failed to start member walk");
    let first = walk.next().await.expect("Failed to fetch first member");
    assert_eq!(first.map(|m| m.name), Some("Alice Smith".to_string()));

    let err = walk.next().await.unwrap_err();
    assert!(matches!(err, ModelError::LookupMiss { .. }));
    assert_eq!(walk.remaining(), 0, "A failed walk should not keep fetching");

    let mut again = group.members().expect("Failed to start a fresh walk");
    assert_eq!(again.remaining(), 3);
    let first_again = again.next().await.expect("Failed to fetch first member");
    assert_eq!(first_again.map(|m| m.name), Some("Alice Smith".to_string()));
}

/// The history feed drains every page through the exhaust iterator and each
/// message resolves its sender and chat through the session.
#[tokio::test]
async fn history_drains_across_pages_and_resolves_senders() {
    let session = seeded_session();
    let feed = HistoryFeed::new(vec![
        vec![
            json!({"id": "m1", "time": 1_724_580_000_000_i64, "userId": "8:carol", "chatId": "19:team@thread.skype", "content": "standup in 5"}),
            json!({"id": "m2", "time": 1_724_580_060_000_i64, "userId": "8:bob_jones", "chatId": "19:team@thread.skype", "content": "omw"}),
        ],
        vec![
            json!({"id": "m3", "time": 1_724_580_120_000_i64, "userId": "8:alice_smith", "chatId": "19:team@thread.skype", "content": "starting"}),
        ],
    ]);

    let messages = feed
        .drain_into(&session)
        .await
        .expect("Failed to drain history");
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].content(), Some("standup in 5"));
    assert_eq!(messages[2].message_id(), Some("m3"));
    assert_eq!(messages[2].sent_at(), Some(1_724_580_120_000));

    let sender = messages[0].sender().await.expect("Failed to resolve sender");
    assert_eq!(sender.name, "Carol");

    let chat = messages[1].chat().await.expect("Failed to resolve chat");
    assert_eq!(chat.topic, "Team standup");
}

/// Profile fetches are memoized: the first hit pins the entry, misses are
/// surfaced and never stored, and invalidation unpins everything.
#[tokio::test]
async fn profile_lookups_are_memoized() {
    let session = seeded_session();

    let first = session
        .profile("8:bob_jones")
        .await
        .expect("Failed to fetch profile");
    assert_eq!(first.name, "Bob Jones");
    assert_eq!(first.mood.as_deref(), Some("heads down"));

    // The backing entry changes; the memo keeps serving the first fetch.
    session.add_contact(Contact::new("8:bob_jones", "Robert Jones", Status::Offline));
    let second = session
        .profile("8:bob_jones")
        .await
        .expect("Failed to fetch profile");
    assert_eq!(second.name, "Bob Jones");
    assert_eq!(session.contacts().cached(), 1);

    let missing = session.profile("8:ghost").await;
    assert!(matches!(missing, Err(ModelError::LookupMiss { .. })));
    assert_eq!(session.contacts().cached(), 1, "A miss should not be pinned");

    session.contacts().invalidate();
    let refreshed = session
        .profile("8:bob_jones")
        .await
        .expect("Failed to fetch profile");
    assert_eq!(refreshed.name, "Robert Jones");
}
