//! # Messenger Sample
//!
//! A miniature messaging client assembled from the `chat-model` toolkit.
//!
//! ## 🚀 Components
//!
//! - **model**: schema-backed entity types ([`GroupChat`], [`Message`](chat_sample::Message)) over plain directory entries.
//! - **session**: the [`Messenger`] session, with memoized contact lookups.
//! - **history**: a paged feed drained through [`Exhaust`](chat_model::Exhaust).
//!
//! ## 📚 Walkthrough
//!
//! [`main`] seeds the directories, builds a group chat from a raw payload,
//! resolves every reference style, drains a paged message history, and shows
//! the contact memo and URL helpers at work.

use chat_model::ids;
use chat_model::tracing::setup_tracing;
use chat_model::{Directory, Session, Status};
use chat_sample::{Chat, Contact, GroupChat, HistoryFeed, Messenger, MessengerError};
use serde_json::json;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), MessengerError> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting messenger sample");

    let session = Messenger::new();
    session.add_contact(Contact::new("8:alice_smith", "Alice Smith", Status::Online));
    session.add_contact(Contact::new("8:bob_jones", "Bob Jones", Status::Busy).with_mood("heads down"));
    session.add_contact(Contact::new("8:carol", "Carol", Status::Idle));
    session.add_chat(Chat::new("19:team@thread.skype", "Team standup"));

    // A payload the way the wire delivers it: identifiers instead of
    // objects, plus the odd field this client does not model.
    let payload = json!({
        "id": "19:team@thread.skype",
        "topic": "Team standup",
        "creatorId": "8:alice_smith",
        "userIds": ["8:alice_smith", "8:bob_jones", "8:carol"],
        "adminIds": ["8:alice_smith"],
        "open": true,
        "threadVersion": 1_724_580_000_000_i64,
    });

    let span = tracing::info_span!("group_resolution");
    async {
        let group = GroupChat::from_payload(session.clone(), payload)?;
        let creator = group.creator().await?;
        info!(creator = %creator.name, open = group.is_open(), "Group chat built");

        for member in group.members()?.collect().await? {
            info!(name = %member.name, status = %member.status, "Member");
        }
        Ok::<_, MessengerError>(())
    }
    .instrument(span)
    .await?;

    // History arrives page by page; the drain stops at the first empty page
    // and every sender resolves through the memoized contacts.
    let feed = HistoryFeed::new(vec![
        vec![
            json!({"id": "m1", "time": 1_724_580_000_000_i64, "userId": "8:carol", "chatId": "19:team@thread.skype", "content": "standup in 5"}),
            json!({"id": "m2", "time": 1_724_580_060_000_i64, "userId": "8:bob_jones", "chatId": "19:team@thread.skype", "content": "omw"}),
        ],
        vec![json!({"id": "m3", "time": 1_724_580_120_000_i64, "userId": "8:alice_smith", "chatId": "19:team@thread.skype", "content": "starting without dave"})],
    ]);

    for message in feed.drain_into(&session).await? {
        let sender = message.sender().await?;
        info!(from = %sender.name, content = message.content().unwrap_or(""), "Replayed");
    }

    let profile = session.profile("8:bob_jones").await?;
    session.profile("8:bob_jones").await?;
    info!(
        name = %profile.name,
        mood = profile.mood.as_deref().unwrap_or(""),
        cached = session.contacts().cached(),
        "Profile served from the memo"
    );

    match session.profile("8:dave").await {
        Ok(found) => info!(name = %found.name, "Found dave after all"),
        Err(e) => error!(error = %e, "Dave is not in the directory"),
    }

    let url = "https://client-s.gateway.messenger.live.com/v1/users/ME/conversations/19:team@thread.skype";
    if let Some(id) = ids::chat_id(url) {
        let chat = session.chats().lookup(id).await?;
        info!(%id, topic = %chat.topic, "Conversation URL resolved");
    }

    info!("Messenger sample completed");
    Ok(())
}
