//! Service context - dependency container for services
//!
//! Holds all repositories, transport ports, and other dependencies needed by
//! the engines.

use std::sync::Arc;

use relay_core::traits::{
    ChatRepository, MessageRepository, PushNotifier, ReactionRepository, RealtimeBroadcaster,
    RecipientRepository, UserRepository,
};
use relay_core::SnowflakeGenerator;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The broadcast port (implemented by the gateway's connection manager)
/// - The push notification port
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    message_repo: Arc<dyn MessageRepository>,
    recipient_repo: Arc<dyn RecipientRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    // Transport ports
    broadcaster: Arc<dyn RealtimeBroadcaster>,
    push_notifier: Arc<dyn PushNotifier>,

    // Services
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the chat repository
    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the recipient repository
    pub fn recipient_repo(&self) -> &dyn RecipientRepository {
        self.recipient_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Transport ports ===

    /// Get the broadcast port
    pub fn broadcaster(&self) -> &dyn RealtimeBroadcaster {
        self.broadcaster.as_ref()
    }

    /// Get the push notification port
    pub fn push_notifier(&self) -> &dyn PushNotifier {
        self.push_notifier.as_ref()
    }

    // === Services ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> relay_core::Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("broadcaster", &"...")
            .field("push_notifier", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    chat_repo: Option<Arc<dyn ChatRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    recipient_repo: Option<Arc<dyn RecipientRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    broadcaster: Option<Arc<dyn RealtimeBroadcaster>>,
    push_notifier: Option<Arc<dyn PushNotifier>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            chat_repo: None,
            message_repo: None,
            recipient_repo: None,
            reaction_repo: None,
            broadcaster: None,
            push_notifier: None,
            snowflake_generator: None,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn recipient_repo(mut self, repo: Arc<dyn RecipientRepository>) -> Self {
        self.recipient_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn broadcaster(mut self, broadcaster: Arc<dyn RealtimeBroadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn push_notifier(mut self, notifier: Arc<dyn PushNotifier>) -> Self {
        self.push_notifier = Some(notifier);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            chat_repo: self
                .chat_repo
                .ok_or_else(|| ServiceError::validation("chat_repo is required"))?,
            message_repo: self
                .message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            recipient_repo: self
                .recipient_repo
                .ok_or_else(|| ServiceError::validation("recipient_repo is required"))?,
            reaction_repo: self
                .reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            broadcaster: self
                .broadcaster
                .ok_or_else(|| ServiceError::validation("broadcaster is required"))?,
            push_notifier: self
                .push_notifier
                .ok_or_else(|| ServiceError::validation("push_notifier is required"))?,
            snowflake_generator: self
                .snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
