//! End-to-end engine tests over in-memory storage
//!
//! Drives the fan-out, unread, reaction, presence, and notification engines
//! through the same service context wiring the gateway uses, asserting on
//! recorded broadcasts and push payloads.

use integration_tests::{
    group_chat, member, member_with_flags, user_with_push, TestHarness,
};
use relay_core::{
    ChatRepository, MemberFlags, MessageKind, MessageRepository, Priority, RoomKey, Snowflake,
};
use relay_service::dto::{CreateReactionRequest, DeleteReactionRequest, SendMessageRequest};
use relay_service::{
    events, MarkReadOutcome, MessageService, PresenceService, ReactionService, UnreadService,
};

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

// ============================================================================
// Message fan-out
// ============================================================================

#[tokio::test]
async fn test_direct_message_reaches_other_member() -> anyhow::Result<()> {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);

    let response = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "hello"))
        .await?;

    assert_eq!(response.chat_id, chat_id);
    assert_eq!(response.body, "hello");
    assert!(h.store.message_row(response.id).is_some());

    // One recipient row, for the other member only
    let rows = h.store.recipient_rows(response.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].recipient_id, Snowflake::new(2));
    assert!(!rows[0].is_read);

    // Exactly one broadcast into the chat room, nobody excluded
    let emits = h.broadcaster.events_named(events::NEW_MESSAGE);
    assert_eq!(emits.len(), 1);
    assert_eq!(emits[0].room, Some(RoomKey::chat(chat_id)));
    assert!(emits[0].excluded.is_empty());
    assert_eq!(emits[0].payload["body"], "hello");
    assert_eq!(emits[0].payload["sender"]["id"], "1");

    // Counter bumped for the recipient, not the sender
    assert_eq!(h.store.member(chat_id, Snowflake::new(2)).unwrap().unread.routine, 1);
    assert_eq!(h.store.member(chat_id, Snowflake::new(1)).unwrap().unread.routine, 0);
    Ok(())
}

#[tokio::test]
async fn test_ghost_member_keeps_row_but_misses_broadcast() -> anyhow::Result<()> {
    let h = TestHarness::new();
    for id in 1..=3 {
        h.store.add_user(user_with_push(id, &format!("user-{id}"), ""));
    }
    h.store.add_chat(group_chat(20, "ops"));
    h.store.add_member(member(20, 1));
    h.store.add_member(member(20, 2));
    h.store.add_member(member_with_flags(20, 3, MemberFlags::GHOST));

    let response = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(20, "deploy done"))
        .await?;

    // The ghost still gets an audit row
    let rows = h.store.recipient_rows(response.id);
    let recipient_ids: Vec<Snowflake> = rows.iter().map(|r| r.recipient_id).collect();
    assert!(recipient_ids.contains(&Snowflake::new(2)));
    assert!(recipient_ids.contains(&Snowflake::new(3)));

    // But the broadcast excludes every ghost connection
    let emits = h.broadcaster.events_named(events::NEW_MESSAGE);
    assert_eq!(emits.len(), 1);
    assert_eq!(emits[0].excluded, vec![Snowflake::new(3)]);
    Ok(())
}

#[tokio::test]
async fn test_admin_only_chat_rejects_plain_member() {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "admin", ""));
    h.store.add_user(user_with_push(2, "member", ""));
    let mut chat = group_chat(20, "announcements");
    chat.admin_only_posting = true;
    h.store.add_chat(chat);
    h.store.add_member(member_with_flags(20, 1, MemberFlags::ADMIN));
    h.store.add_member(member(20, 2));

    let result = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(2), text_message(20, "me too"))
        .await;

    let err = result.unwrap_err();
    assert!(err.is_client_fault());
    assert!(h.broadcaster.events().is_empty());
}

#[tokio::test]
async fn test_removed_member_cannot_send() {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "gone", ""));
    h.store.add_user(user_with_push(2, "there", ""));
    h.store.add_chat(group_chat(30, "general"));
    h.store.add_member(member_with_flags(30, 1, MemberFlags::REMOVED));
    h.store.add_member(member(30, 2));

    let result = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(30, "hi"))
        .await;
    assert!(result.unwrap_err().is_client_fault());
}

#[tokio::test]
async fn test_urgent_mention_bumps_both_counters() -> anyhow::Result<()> {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);

    let mut request = text_message(10, "@you look at this");
    request.priority = Priority::Urgent;
    request.mentioned_user_ids = vec![Snowflake::new(2)];

    MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), request)
        .await?;

    let unread = h.store.member(chat_id, Snowflake::new(2)).unwrap().unread;
    assert_eq!(unread.urgent, 1);
    assert_eq!(unread.mentions, 1);
    assert_eq!(unread.routine, 0);
    Ok(())
}

#[tokio::test]
async fn test_quote_outside_chat_is_rejected() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.seed_direct(10, 1, 2);
    h.store.add_chat(group_chat(20, "other"));
    h.store.add_member(member(20, 1));
    h.store.add_member(member(20, 2));

    let service = MessageService::new(&h.ctx, &h.registry);
    let original = service
        .send_message(Snowflake::new(1), text_message(10, "origin"))
        .await?;

    let mut cross = text_message(20, "quoting across chats");
    cross.quoted_message_id = Some(original.id);
    let result = service.send_message(Snowflake::new(2), cross).await;
    assert!(result.unwrap_err().is_client_fault());

    // A dangling quote id is dropped rather than rejected
    let mut dangling = text_message(10, "quoting nothing");
    dangling.quoted_message_id = Some(Snowflake::new(999_999));
    let response = service.send_message(Snowflake::new(2), dangling).await?;
    assert!(response.quoted_message.is_none());
    Ok(())
}

#[tokio::test]
async fn test_soft_deleted_message_cannot_be_quoted() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.seed_direct(10, 1, 2);

    let service = MessageService::new(&h.ctx, &h.registry);
    let original = service
        .send_message(Snowflake::new(1), text_message(10, "soon gone"))
        .await?;

    h.ctx.message_repo().soft_delete(original.id).await?;

    // The row survives with its content cleared
    let row = h.store.message_row(original.id).unwrap();
    assert!(row.is_deleted());
    assert!(row.body.is_empty());

    // A quote of the deleted message degrades to a dangling reference
    let mut quote = text_message(10, "what did that say?");
    quote.quoted_message_id = Some(original.id);
    let response = service.send_message(Snowflake::new(2), quote).await?;
    assert!(response.quoted_message.is_none());
    Ok(())
}

#[tokio::test]
async fn test_empty_content_is_rejected() {
    let h = TestHarness::new();
    h.seed_direct(10, 1, 2);

    let result = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "   "))
        .await;
    assert!(result.unwrap_err().is_client_fault());
}

#[tokio::test]
async fn test_bcc_takes_precedence_over_cc() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "sender", ""));
    h.store.add_user(user_with_push(2, "both", ""));
    h.store.add_chat(group_chat(20, "memo"));
    h.store.add_member(member(20, 1));
    h.store.add_member(member(20, 2));

    let mut request = text_message(20, "minutes attached");
    request.cc = vec![Snowflake::new(2)];
    request.bcc = vec![Snowflake::new(2)];

    let response = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), request)
        .await?;

    let rows = h.store.recipient_rows(response.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].annotation,
        Some(relay_core::entities::DeliveryAnnotation::Bcc)
    );
    Ok(())
}

// ============================================================================
// Read tracking
// ============================================================================

#[tokio::test]
async fn test_mark_read_resets_counters_and_broadcasts() -> anyhow::Result<()> {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);

    let sender = MessageService::new(&h.ctx, &h.registry);
    sender
        .send_message(Snowflake::new(1), text_message(10, "one"))
        .await?;
    sender
        .send_message(Snowflake::new(1), text_message(10, "two"))
        .await?;
    assert_eq!(h.store.member(chat_id, Snowflake::new(2)).unwrap().unread.routine, 2);

    let outcome = UnreadService::new(&h.ctx)
        .mark_read(Snowflake::new(2), chat_id)
        .await?;
    assert_eq!(outcome, MarkReadOutcome::Updated(2));

    let unread = h.store.member(chat_id, Snowflake::new(2)).unwrap().unread;
    assert!(unread.is_zero());

    let emits = h.broadcaster.events_named(events::RES_MARK_READ_CHAT);
    assert_eq!(emits.len(), 1);
    assert_eq!(emits[0].payload["userId"], "2");
    assert_eq!(emits[0].payload["updated"], 2);
    Ok(())
}

#[tokio::test]
async fn test_repeat_mark_read_is_silent() -> anyhow::Result<()> {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);

    MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "one"))
        .await?;

    let unread = UnreadService::new(&h.ctx);
    assert_eq!(
        unread.mark_read(Snowflake::new(2), chat_id).await?,
        MarkReadOutcome::Updated(1)
    );
    assert_eq!(
        unread.mark_read(Snowflake::new(2), chat_id).await?,
        MarkReadOutcome::AlreadySynchronized
    );

    // Only the first call broadcast anything
    assert_eq!(h.broadcaster.events_named(events::RES_MARK_READ_CHAT).len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_mark_read_requires_membership() {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);

    let result = UnreadService::new(&h.ctx)
        .mark_read(Snowflake::new(99), chat_id)
        .await;
    assert!(result.unwrap_err().is_client_fault());
}

#[tokio::test]
async fn test_recompute_restores_corrupted_counters() -> anyhow::Result<()> {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);

    let sender = MessageService::new(&h.ctx, &h.registry);
    let mut urgent = text_message(10, "urgent one");
    urgent.priority = Priority::Urgent;
    urgent.mentioned_user_ids = vec![Snowflake::new(2)];
    sender.send_message(Snowflake::new(1), urgent).await?;
    sender
        .send_message(Snowflake::new(1), text_message(10, "routine one"))
        .await?;

    // Drift the cache away from the recipient rows
    h.ctx
        .chat_repo()
        .bump_unread(chat_id, &[Snowflake::new(2)], Priority::Emergency, &[])
        .await?;
    assert_eq!(
        h.store.member(chat_id, Snowflake::new(2)).unwrap().unread.emergency,
        1
    );

    let unread = UnreadService::new(&h.ctx);
    let first = unread.recompute_unread_counts(Snowflake::new(2)).await?;
    let second = unread.recompute_unread_counts(Snowflake::new(2)).await?;
    assert_eq!(first, second);

    let (_, counts) = first
        .iter()
        .find(|(id, _)| *id == chat_id)
        .copied()
        .expect("chat has unread rows");
    assert_eq!(counts.urgent, 1);
    assert_eq!(counts.routine, 1);
    assert_eq!(counts.mentions, 1);
    assert_eq!(counts.emergency, 0);

    // The cache now matches the scan
    assert_eq!(h.store.member(chat_id, Snowflake::new(2)).unwrap().unread, counts);
    Ok(())
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reaction_upsert_replaces_previous_emoji() -> anyhow::Result<()> {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);
    let message = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "react to me"))
        .await?;

    let reactions = ReactionService::new(&h.ctx, &h.registry);
    reactions
        .set_reaction(
            Snowflake::new(2),
            CreateReactionRequest {
                chat_id,
                message_id: message.id,
                emoji_code: "thumbsup".to_string(),
            },
        )
        .await?;
    let response = reactions
        .set_reaction(
            Snowflake::new(2),
            CreateReactionRequest {
                chat_id,
                message_id: message.id,
                emoji_code: "heart".to_string(),
            },
        )
        .await?;

    // Terminal state: one reaction per (message, user), latest emoji wins
    assert_eq!(response.reactions.len(), 1);
    assert_eq!(response.reactions[0].emoji_code, "heart");
    assert_eq!(h.store.reaction_rows(message.id).len(), 1);

    // Every mutation re-broadcast the full list
    let emits = h.broadcaster.events_named(events::UPDATE_REALTIME_MESSAGE);
    assert_eq!(emits.len(), 2);
    assert_eq!(emits[1].payload["reactions"][0]["emojiCode"], "heart");
    Ok(())
}

#[tokio::test]
async fn test_reaction_delete_requires_owner() -> anyhow::Result<()> {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);
    let message = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "react to me"))
        .await?;

    let reactions = ReactionService::new(&h.ctx, &h.registry);
    reactions
        .set_reaction(
            Snowflake::new(2),
            CreateReactionRequest {
                chat_id,
                message_id: message.id,
                emoji_code: "thumbsup".to_string(),
            },
        )
        .await?;
    let reaction_id = h.store.reaction_rows(message.id)[0].id;

    // Someone else's delete attempt is rejected
    let result = reactions
        .remove_reaction(
            Snowflake::new(1),
            DeleteReactionRequest {
                chat_id,
                message_id: message.id,
                reaction_id,
            },
        )
        .await;
    assert!(result.unwrap_err().is_client_fault());
    assert_eq!(h.store.reaction_rows(message.id).len(), 1);

    // The owner's goes through and broadcasts the now-empty list
    let response = reactions
        .remove_reaction(
            Snowflake::new(2),
            DeleteReactionRequest {
                chat_id,
                message_id: message.id,
                reaction_id,
            },
        )
        .await?;
    assert!(response.reactions.is_empty());
    assert!(h.store.reaction_rows(message.id).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_reaction_requires_membership() -> anyhow::Result<()> {
    let h = TestHarness::new();
    let chat_id = h.seed_direct(10, 1, 2);
    let message = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "react to me"))
        .await?;

    let result = ReactionService::new(&h.ctx, &h.registry)
        .set_reaction(
            Snowflake::new(99),
            CreateReactionRequest {
                chat_id,
                message_id: message.id,
                emoji_code: "wave".to_string(),
            },
        )
        .await;
    assert!(result.unwrap_err().is_client_fault());
    Ok(())
}

#[tokio::test]
async fn test_reaction_change_pushes_offline_recipient() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "Alice", "alice-device-token"));
    h.store.add_user(user_with_push(2, "Bob", ""));
    h.store.add_chat(integration_tests::direct_chat(10));
    h.store.add_member(member(10, 1));
    h.store.add_member(member(10, 2));
    h.connect(2, "conn-bob");

    // Bob is online when Alice sends, so the send itself pushes nobody
    let message = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "react to me"))
        .await?;
    assert!(h.push.payloads().is_empty());

    let reactions = ReactionService::new(&h.ctx, &h.registry);
    reactions
        .set_reaction(
            Snowflake::new(2),
            CreateReactionRequest {
                chat_id: Snowflake::new(10),
                message_id: message.id,
                emoji_code: "thumbsup".to_string(),
            },
        )
        .await?;

    // Offline Alice gets a push attributed to the reacting user
    let payloads = h.push.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].tokens, vec!["alice-device-token".to_string()]);
    assert_eq!(payloads[0].title, "Bob");
    assert_eq!(payloads[0].body, "Bob reacted to a message");
    assert_eq!(payloads[0].deep_link_url.as_deref(), Some("/chat/10"));

    // Removal is a reaction change too
    let reaction_id = h.store.reaction_rows(message.id)[0].id;
    reactions
        .remove_reaction(
            Snowflake::new(2),
            DeleteReactionRequest {
                chat_id: Snowflake::new(10),
                message_id: message.id,
                reaction_id,
            },
        )
        .await?;
    assert_eq!(h.push.payloads().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_reaction_push_failure_never_fails_the_change() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "Alice", "alice-device-token"));
    h.store.add_user(user_with_push(2, "Bob", ""));
    h.store.add_chat(integration_tests::direct_chat(10));
    h.store.add_member(member(10, 1));
    h.store.add_member(member(10, 2));

    let message = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "react to me"))
        .await?;
    h.push.fail_next();

    let response = ReactionService::new(&h.ctx, &h.registry)
        .set_reaction(
            Snowflake::new(2),
            CreateReactionRequest {
                chat_id: Snowflake::new(10),
                message_id: message.id,
                emoji_code: "thumbsup".to_string(),
            },
        )
        .await?;
    assert_eq!(response.reactions.len(), 1);
    assert_eq!(h.store.reaction_rows(message.id).len(), 1);
    Ok(())
}

// ============================================================================
// Presence
// ============================================================================

#[tokio::test]
async fn test_presence_transitions_once_per_user() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.seed_direct(10, 1, 2);

    let presence = PresenceService::new(&h.ctx, &h.registry);

    presence.handle_connect(Snowflake::new(1), "conn-a").await?;
    assert!(h.store.user(Snowflake::new(1)).unwrap().is_online);
    assert_eq!(h.broadcaster.events_named(events::USER_ONLINE).len(), 1);

    // Second device: no duplicate broadcast
    presence.handle_connect(Snowflake::new(1), "conn-b").await?;
    assert_eq!(h.broadcaster.events_named(events::USER_ONLINE).len(), 1);

    // First device drops: still online
    presence
        .handle_disconnect(Snowflake::new(1), "conn-a")
        .await?;
    assert!(h.store.user(Snowflake::new(1)).unwrap().is_online);
    assert!(h.broadcaster.events_named(events::USER_OFFLINE).is_empty());

    // Last device drops: offline snapshot with last_seen_at
    presence
        .handle_disconnect(Snowflake::new(1), "conn-b")
        .await?;
    let user = h.store.user(Snowflake::new(1)).unwrap();
    assert!(!user.is_online);
    assert!(user.last_seen_at.is_some());

    let offline = h.broadcaster.events_named(events::USER_OFFLINE);
    assert_eq!(offline.len(), 1);
    assert_eq!(offline[0].payload["userId"], "1");
    assert_eq!(offline[0].payload["isOnline"], false);
    Ok(())
}

// ============================================================================
// Push notifications
// ============================================================================

#[tokio::test]
async fn test_offline_recipient_with_token_gets_push() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "Alice", ""));
    h.store.add_user(user_with_push(2, "Bob", "bob-device-token"));
    h.store.add_chat(integration_tests::direct_chat(10));
    h.store.add_member(member(10, 1));
    h.store.add_member(member(10, 2));
    h.connect(1, "conn-alice");

    MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "ping"))
        .await?;

    let payloads = h.push.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].tokens, vec!["bob-device-token".to_string()]);
    assert_eq!(payloads[0].title, "Alice");
    assert_eq!(payloads[0].body, "ping");
    assert_eq!(payloads[0].deep_link_url.as_deref(), Some("/chat/10"));
    Ok(())
}

#[tokio::test]
async fn test_online_and_muted_recipients_are_not_pushed() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "Alice", ""));
    h.store.add_user(user_with_push(2, "Bob", "bob-token"));
    h.store.add_user(user_with_push(3, "Mallory", "mallory-token"));
    h.store.add_chat(group_chat(20, "team"));
    h.store.add_member(member(20, 1));
    h.store.add_member(member(20, 2));
    h.store.add_member(member_with_flags(20, 3, MemberFlags::MUTED));

    // Bob is connected, Mallory muted; neither gets a push
    h.connect(2, "conn-bob");

    MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(20, "standup in 5"))
        .await?;

    assert!(h.push.payloads().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_push_failure_never_fails_the_send() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "Alice", ""));
    h.store.add_user(user_with_push(2, "Bob", "bob-token"));
    h.store.add_chat(integration_tests::direct_chat(10));
    h.store.add_member(member(10, 1));
    h.store.add_member(member(10, 2));
    h.push.fail_next();

    let response = MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(10, "still delivered"))
        .await?;

    // Persisted and broadcast despite the failed push
    assert!(h.store.message_row(response.id).is_some());
    assert_eq!(h.broadcaster.events_named(events::NEW_MESSAGE).len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_group_push_body_carries_sender_name() -> anyhow::Result<()> {
    let h = TestHarness::new();
    h.store.add_user(user_with_push(1, "Alice", ""));
    h.store.add_user(user_with_push(2, "Bob", "bob-token"));
    h.store.add_chat(group_chat(20, "team"));
    h.store.add_member(member(20, 1));
    h.store.add_member(member(20, 2));

    MessageService::new(&h.ctx, &h.registry)
        .send_message(Snowflake::new(1), text_message(20, "lunch?"))
        .await?;

    let payloads = h.push.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].title, "team");
    assert_eq!(payloads[0].body, "Alice: lunch?");
    Ok(())
}
