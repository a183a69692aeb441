//! In-memory repository implementations
//!
//! One store implements every repository port so the engines can run end to
//! end without a database. Semantics mirror the SQL implementations: soft
//! deletes hide rows, mark-read is monotonic and set-based, reaction upsert
//! is keyed on (message, user).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use relay_core::{
    Chat, ChatMember, ChatRepository, DomainError, MemberFlags, Message, MessageRecipient,
    MessageRepository, Priority, Reaction, ReactionRepository, RecipientRepository, RepoResult,
    Snowflake, UnreadCounts, User, UserRepository,
};

/// Shared in-memory backing store
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Snowflake, User>>,
    chats: Mutex<HashMap<Snowflake, Chat>>,
    members: Mutex<Vec<ChatMember>>,
    messages: Mutex<HashMap<Snowflake, Message>>,
    recipients: Mutex<Vec<MessageRecipient>>,
    reactions: Mutex<Vec<Reaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn add_chat(&self, chat: Chat) {
        self.chats.lock().unwrap().insert(chat.id, chat);
    }

    pub fn add_member(&self, member: ChatMember) {
        self.members.lock().unwrap().push(member);
    }

    /// Snapshot of one user row
    pub fn user(&self, id: Snowflake) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    /// Snapshot of one membership row
    pub fn member(&self, chat_id: Snowflake, user_id: Snowflake) -> Option<ChatMember> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.chat_id == chat_id && m.user_id == user_id)
            .cloned()
    }

    /// Snapshot of one message row, soft-deleted included
    pub fn message_row(&self, id: Snowflake) -> Option<Message> {
        self.messages.lock().unwrap().get(&id).cloned()
    }

    /// All recipient rows of one message
    pub fn recipient_rows(&self, message_id: Snowflake) -> Vec<MessageRecipient> {
        self.recipients
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.message_id == message_id)
            .cloned()
            .collect()
    }

    /// All reactions stored for one message
    pub fn reaction_rows(&self, message_id: Snowflake) -> Vec<Reaction> {
        self.reactions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.message_id == message_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn mark_online(&self, id: Snowflake) -> RepoResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.is_online = true;
        Ok(())
    }

    async fn mark_offline(&self, id: Snowflake) -> RepoResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.is_online = false;
        user.last_seen_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl ChatRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>> {
        Ok(self.chats.lock().unwrap().get(&id).cloned())
    }

    async fn find_members(&self, chat_id: Snowflake) -> RepoResult<Vec<ChatMember>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn find_member(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ChatMember>> {
        Ok(self.member(chat_id, user_id))
    }

    async fn chat_ids_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id && m.is_active())
            .map(|m| m.chat_id)
            .collect())
    }

    async fn update_member_flags(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        flags: MemberFlags,
    ) -> RepoResult<()> {
        let mut members = self.members.lock().unwrap();
        let member = members
            .iter_mut()
            .find(|m| m.chat_id == chat_id && m.user_id == user_id)
            .ok_or(DomainError::MemberNotFound)?;
        member.flags = flags;
        Ok(())
    }

    async fn bump_unread(
        &self,
        chat_id: Snowflake,
        recipient_ids: &[Snowflake],
        priority: Priority,
        mentioned_ids: &[Snowflake],
    ) -> RepoResult<()> {
        let mut members = self.members.lock().unwrap();
        for member in members
            .iter_mut()
            .filter(|m| m.chat_id == chat_id && recipient_ids.contains(&m.user_id))
        {
            *member.unread.for_priority_mut(priority) += 1;
            if mentioned_ids.contains(&member.user_id) {
                member.unread.mentions += 1;
            }
        }
        Ok(())
    }

    async fn reset_unread(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut members = self.members.lock().unwrap();
        if let Some(member) = members
            .iter_mut()
            .find(|m| m.chat_id == chat_id && m.user_id == user_id)
        {
            member.unread = UnreadCounts::default();
        }
        Ok(())
    }

    async fn write_unread_counts(
        &self,
        user_id: Snowflake,
        counts: &[(Snowflake, UnreadCounts)],
    ) -> RepoResult<()> {
        let mut members = self.members.lock().unwrap();
        for member in members.iter_mut().filter(|m| m.user_id == user_id) {
            member.unread = counts
                .iter()
                .find(|(chat_id, _)| *chat_id == member.chat_id)
                .map(|(_, c)| *c)
                .unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(&id)
            .filter(|m| !m.is_deleted())
            .cloned())
    }

    async fn create(
        &self,
        message: &Message,
        recipients: &[MessageRecipient],
    ) -> RepoResult<()> {
        self.messages
            .lock()
            .unwrap()
            .insert(message.id, message.clone());
        self.recipients
            .lock()
            .unwrap()
            .extend(recipients.iter().cloned());
        if let Some(chat) = self.chats.lock().unwrap().get_mut(&message.chat_id) {
            chat.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut messages = self.messages.lock().unwrap();
        let message = messages
            .get_mut(&id)
            .filter(|m| !m.is_deleted())
            .ok_or(DomainError::MessageNotFound(id))?;
        message.soft_delete();
        Ok(())
    }
}

#[async_trait]
impl RecipientRepository for MemoryStore {
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<MessageRecipient>> {
        Ok(self.recipient_rows(message_id))
    }

    async fn mark_read(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<u64> {
        let mut recipients = self.recipients.lock().unwrap();
        let mut flipped = 0;
        for row in recipients
            .iter_mut()
            .filter(|r| r.chat_id == chat_id && r.recipient_id == user_id)
        {
            if row.mark_read() {
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn unread_counts(
        &self,
        user_id: Snowflake,
    ) -> RepoResult<Vec<(Snowflake, UnreadCounts)>> {
        let recipients = self.recipients.lock().unwrap();
        let messages = self.messages.lock().unwrap();

        let mut per_chat: HashMap<Snowflake, UnreadCounts> = HashMap::new();
        for row in recipients
            .iter()
            .filter(|r| r.recipient_id == user_id && !r.is_read)
        {
            let Some(message) = messages.get(&row.message_id).filter(|m| !m.is_deleted()) else {
                continue;
            };
            let counts = per_chat.entry(row.chat_id).or_default();
            *counts.for_priority_mut(message.priority) += 1;
            if message.mentioned_user_ids.contains(&user_id) {
                counts.mentions += 1;
            }
        }

        Ok(per_chat.into_iter().collect())
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reaction>> {
        Ok(self
            .reactions
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        let mut reactions = self.reaction_rows(message_id);
        reactions.sort_by_key(|r| r.created_at);
        Ok(reactions)
    }

    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()> {
        let mut reactions = self.reactions.lock().unwrap();
        match reactions
            .iter_mut()
            .find(|r| r.message_id == reaction.message_id && r.user_id == reaction.user_id)
        {
            Some(existing) => {
                // Keyed upsert keeps the original row id
                existing.emoji = reaction.emoji.clone();
                existing.created_at = reaction.created_at;
            }
            None => reactions.push(reaction.clone()),
        }
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut reactions = self.reactions.lock().unwrap();
        let before = reactions.len();
        reactions.retain(|r| r.id != id);
        if reactions.len() == before {
            return Err(DomainError::ReactionNotFound(id));
        }
        Ok(())
    }
}
