//! Gateway wiring tests
//!
//! Runs the engines against the real connection manager so broadcasts land
//! on actual per-connection channels, then checks who received what.

use std::sync::Arc;

use integration_tests::{
    direct_chat, group_chat, member, member_with_flags, user, MemoryStore, RecordingPushNotifier,
};
use relay_common::AppConfig;
use relay_core::{
    ChatRepository, MemberFlags, MessageKind, MessageRepository, Priority, ReactionRepository,
    RecipientRepository, Snowflake, SnowflakeGenerator, UserRepository,
};
use relay_gateway::{Connection, ConnectionManager, ServerFrame};
use relay_service::dto::SendMessageRequest;
use relay_service::{
    MessageService, PresenceRegistry, RoomService, ServiceContext, ServiceContextBuilder,
    UnreadService,
};
use tokio::sync::mpsc;

fn gateway_ctx(
    store: &Arc<MemoryStore>,
    manager: &Arc<ConnectionManager>,
) -> ServiceContext {
    ServiceContextBuilder::new()
        .user_repo(store.clone() as Arc<dyn UserRepository>)
        .chat_repo(store.clone() as Arc<dyn ChatRepository>)
        .message_repo(store.clone() as Arc<dyn MessageRepository>)
        .recipient_repo(store.clone() as Arc<dyn RecipientRepository>)
        .reaction_repo(store.clone() as Arc<dyn ReactionRepository>)
        .broadcaster(manager.clone())
        .push_notifier(Arc::new(RecordingPushNotifier::new()))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .build()
        .expect("wiring is complete")
}

fn open_socket(
    manager: &ConnectionManager,
    user_id: i64,
) -> (Arc<Connection>, mpsc::Receiver<ServerFrame>) {
    let (tx, rx) = mpsc::channel(32);
    let connection = Arc::new(Connection::new(Snowflake::new(user_id), tx));
    manager.add_connection(connection.clone());
    (connection, rx)
}

fn text_message(chat_id: i64, body: &str) -> SendMessageRequest {
    SendMessageRequest {
        chat_id: Snowflake::new(chat_id),
        body: body.to_string(),
        kind: MessageKind::Text,
        subject: None,
        media_url: None,
        priority: Priority::Routine,
        quoted_message_id: None,
        mentioned_user_ids: Vec::new(),
        cc: Vec::new(),
        bcc: Vec::new(),
    }
}

#[tokio::test]
async fn test_broadcast_lands_on_member_sockets() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.add_user(user(1, "Alice"));
    store.add_user(user(2, "Bob"));
    store.add_chat(direct_chat(10));
    store.add_member(member(10, 1));
    store.add_member(member(10, 2));

    let manager = Arc::new(ConnectionManager::new());
    let ctx = gateway_ctx(&store, &manager);
    let registry = PresenceRegistry::new();

    let (alice, mut alice_rx) = open_socket(&manager, 1);
    let (bob, mut bob_rx) = open_socket(&manager, 2);

    let rooms = RoomService::new(&ctx);
    rooms.join_all(&alice.id, Snowflake::new(1)).await?;
    rooms.join_all(&bob.id, Snowflake::new(2)).await?;

    MessageService::new(&ctx, &registry)
        .send_message(Snowflake::new(1), text_message(10, "hello bob"))
        .await?;

    // Both room members receive the broadcast, the sender included
    let frame = bob_rx.recv().await.expect("bob receives the message");
    assert_eq!(frame.event, "new-message");
    assert_eq!(frame.data["body"], "hello bob");
    assert_eq!(frame.data["sender"]["displayName"], "Alice");

    let frame = alice_rx.recv().await.expect("alice receives her own message");
    assert_eq!(frame.event, "new-message");
    Ok(())
}

#[tokio::test]
async fn test_ghost_socket_stays_silent() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.add_user(user(1, "Alice"));
    store.add_user(user(2, "Bob"));
    store.add_user(user(3, "Watcher"));
    store.add_chat(group_chat(20, "team"));
    store.add_member(member(20, 1));
    store.add_member(member(20, 2));
    store.add_member(member_with_flags(20, 3, MemberFlags::GHOST));

    let manager = Arc::new(ConnectionManager::new());
    let ctx = gateway_ctx(&store, &manager);
    let registry = PresenceRegistry::new();

    let (alice, _alice_rx) = open_socket(&manager, 1);
    let (bob, mut bob_rx) = open_socket(&manager, 2);
    let (watcher, mut watcher_rx) = open_socket(&manager, 3);

    let rooms = RoomService::new(&ctx);
    rooms.join_all(&alice.id, Snowflake::new(1)).await?;
    rooms.join_all(&bob.id, Snowflake::new(2)).await?;
    rooms.join_all(&watcher.id, Snowflake::new(3)).await?;

    MessageService::new(&ctx, &registry)
        .send_message(Snowflake::new(1), text_message(20, "shipping it"))
        .await?;

    assert_eq!(bob_rx.recv().await.unwrap().event, "new-message");
    assert!(watcher_rx.try_recv().is_err());
    Ok(())
}

#[tokio::test]
async fn test_mark_read_converges_other_devices() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.add_user(user(1, "Alice"));
    store.add_user(user(2, "Bob"));
    store.add_chat(direct_chat(10));
    store.add_member(member(10, 1));
    store.add_member(member(10, 2));

    let manager = Arc::new(ConnectionManager::new());
    let ctx = gateway_ctx(&store, &manager);
    let registry = PresenceRegistry::new();

    // Bob holds two devices; both join the room
    let (phone, mut phone_rx) = open_socket(&manager, 2);
    let (laptop, mut laptop_rx) = open_socket(&manager, 2);
    let rooms = RoomService::new(&ctx);
    rooms.join_all(&phone.id, Snowflake::new(2)).await?;
    rooms.join_all(&laptop.id, Snowflake::new(2)).await?;

    MessageService::new(&ctx, &registry)
        .send_message(Snowflake::new(1), text_message(10, "unread on both"))
        .await?;
    assert_eq!(phone_rx.recv().await.unwrap().event, "new-message");
    assert_eq!(laptop_rx.recv().await.unwrap().event, "new-message");

    // Reading on the phone tells the laptop too
    UnreadService::new(&ctx)
        .mark_read(Snowflake::new(2), Snowflake::new(10))
        .await?;

    let frame = laptop_rx.recv().await.unwrap();
    assert_eq!(frame.event, "res-mark-read-chat");
    assert_eq!(frame.data["userId"], "2");
    Ok(())
}

#[test]
fn test_config_loads_from_env() {
    std::env::set_var("GATEWAY_PORT", "9443");
    std::env::set_var("DATABASE_URL", "postgres://localhost/relay_test");
    std::env::set_var("JWT_SECRET", "integration-secret");

    let config = AppConfig::from_env().expect("required vars are set");
    assert_eq!(config.gateway.port, 9443);
    assert_eq!(config.jwt.secret, "integration-secret");
    assert!(!config.push.is_enabled());
}
