//! Interpretation of `/chat` replies.
//!
//! The backend answers every chat turn with a string. Most of the time it is
//! plain text from the model, but the agent can also answer with a JSON-encoded
//! action: an offer of meeting slots, or a success confirmation.

use crate::schedule::{LeadContext, Slot};
use serde::Deserialize;
use serde_json::Value;

/// A classified `/chat` reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The agent offers meeting times for a qualified lead.
    ShowSlots {
        slots: Vec<Slot>,
        lead: LeadContext,
    },
    /// The agent reports a completed action.
    Confirmation(Confirmation),
    /// Anything else, shown verbatim.
    Text(String),
}

/// A `status == "success"` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub pipefy_card_url: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

impl Confirmation {
    /// Text of the message appended to the conversation.
    pub fn summary(&self) -> String {
        let mut text = self.message.clone();
        if let Some(url) = &self.pipefy_card_url {
            text.push_str("\nCard: ");
            text.push_str(url);
        }
        if let Some(link) = &self.meeting_link {
            text.push_str("\nMeeting link: ");
            text.push_str(link);
        }
        text
    }
}

#[derive(Deserialize)]
struct SlotOffer {
    slots: Vec<Slot>,
    #[serde(flatten)]
    lead: LeadContext,
}

impl Reply {
    /// Classify a raw reply string.
    ///
    /// Non-JSON input and JSON of unknown shape become [`Reply::Text`] with the
    /// raw string untouched. A payload that announces a known action but does
    /// not match its shape is an error.
    pub fn parse(raw: &str) -> Result<Self, ReplyError> {
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            return Ok(Reply::Text(raw.to_string()));
        };

        if value.get("action").and_then(Value::as_str) == Some("show_slots") {
            let offer: SlotOffer = serde_json::from_value(value).map_err(ReplyError::SlotOffer)?;
            return Ok(Reply::ShowSlots {
                slots: offer.slots,
                lead: offer.lead,
            });
        }

        if value.get("status").and_then(Value::as_str) == Some("success") {
            let confirmation: Confirmation =
                serde_json::from_value(value).map_err(ReplyError::Confirmation)?;
            return Ok(Reply::Confirmation(confirmation));
        }

        Ok(Reply::Text(raw.to_string()))
    }
}

/// Errors raised while interpreting a reply.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    /// A `show_slots` payload with a malformed slot list.
    #[error("invalid slot offer: {0}")]
    SlotOffer(#[source] serde_json::Error),

    /// A `status: success` payload with malformed fields.
    #[error("invalid confirmation: {0}")]
    Confirmation(#[source] serde_json::Error),
}
