//! MessageRecipient entity - per-recipient delivery/read-tracking row

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Delivery annotation for a recipient row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryAnnotation {
    Cc,
    Bcc,
}

/// One row per (message, recipient) pair
///
/// `is_read` transitions false→true only, never back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecipient {
    pub id: Snowflake,
    pub message_id: Snowflake,
    pub chat_id: Snowflake,
    pub recipient_id: Snowflake,
    pub is_read: bool,
    pub annotation: Option<DeliveryAnnotation>,
    pub read_at: Option<DateTime<Utc>>,
}

impl MessageRecipient {
    /// Create a new unread recipient row
    pub fn new(
        id: Snowflake,
        message_id: Snowflake,
        chat_id: Snowflake,
        recipient_id: Snowflake,
    ) -> Self {
        Self {
            id,
            message_id,
            chat_id,
            recipient_id,
            is_read: false,
            annotation: None,
            read_at: None,
        }
    }

    /// Attach a cc/bcc annotation
    #[must_use]
    pub fn with_annotation(mut self, annotation: DeliveryAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Mark read; no-op when already read (monotonic transition)
    pub fn mark_read(&mut self) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        self.read_at = Some(Utc::now());
        true
    }
}
