//! leadchat-engine: Headless conversation engine for the leadchat client
//!
//! This crate provides everything except the terminal UI:
//! - Conversation state and the send / schedule request lifecycle
//! - Interpretation of backend replies (plain text, slot offers, confirmations)
//! - The `ConversationService` abstraction and its HTTP implementation
//! - Configuration

pub mod client;
pub mod config;
pub mod conversation;
pub mod message;
pub mod reply;
pub mod schedule;
pub mod service;

// Re-export commonly used types
pub use client::HttpConversationService;
pub use config::{Config, ConfigError};
pub use conversation::{Conversation, Phase, NO_SLOTS, SLOTS_INTRO};
pub use message::{ChatMessage, Role};
pub use reply::{Confirmation, Reply, ReplyError};
pub use schedule::{LeadContext, ScheduleRequest, ScheduleResponse, Slot};
pub use service::{ConversationService, ServiceError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
