//! Data transfer objects for the socket event surface

pub mod mappers;
pub mod requests;
pub mod responses;

pub use mappers::hydrate_message;
pub use requests::{
    CreateReactionRequest, DeleteReactionRequest, JoinChatRequest, MarkReadRequest,
    SendMessageRequest,
};
pub use responses::{
    MarkReadResponse, MessageReactionsResponse, MessageResponse, PresenceResponse,
    QuotedMessageResponse, ReactionResponse, SenderResponse,
};
