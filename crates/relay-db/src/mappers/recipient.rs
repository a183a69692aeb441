//! MessageRecipient entity <-> model mapper

use relay_core::entities::{DeliveryAnnotation, MessageRecipient};
use relay_core::value_objects::Snowflake;

use crate::models::RecipientModel;

fn annotation_from_str(s: &str) -> Option<DeliveryAnnotation> {
    match s {
        "cc" => Some(DeliveryAnnotation::Cc),
        "bcc" => Some(DeliveryAnnotation::Bcc),
        _ => None,
    }
}

pub(crate) fn annotation_to_str(annotation: DeliveryAnnotation) -> &'static str {
    match annotation {
        DeliveryAnnotation::Cc => "cc",
        DeliveryAnnotation::Bcc => "bcc",
    }
}

impl From<RecipientModel> for MessageRecipient {
    fn from(model: RecipientModel) -> Self {
        MessageRecipient {
            id: Snowflake::new(model.id),
            message_id: Snowflake::new(model.message_id),
            chat_id: Snowflake::new(model.chat_id),
            recipient_id: Snowflake::new(model.recipient_id),
            is_read: model.is_read,
            annotation: model.annotation.as_deref().and_then(annotation_from_str),
            read_at: model.read_at,
        }
    }
}
