//! # relay-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `relay-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_db::pool::{create_pool, PoolConfig};
//! use relay_db::repositories::PgChatRepository;
//! use relay_core::traits::ChatRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PoolConfig::default();
//!     let pool = create_pool(&config).await?;
//!     let chat_repo = PgChatRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{
    PgChatRepository, PgMessageRepository, PgReactionRepository, PgRecipientRepository,
    PgUserRepository,
};
