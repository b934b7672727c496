//! Conversation state and its request lifecycle.
//!
//! [`Conversation`] owns everything the chat view shows: the message list, the
//! slots currently on offer, and the lead context needed to book one of them.
//! At most one backend request is in flight at a time; the [`Phase`] is the
//! single flag that enforces it.
//!
//! Each operation comes in two halves so that a UI loop can keep rendering
//! while the request runs:
//!
//! ```text
//!            begin_send ──► Sending ──► finish_send
//!          ╱                                      ╲
//!   Idle ─┤                                        ├─► Idle
//!          ╲                                      ╱
//!        begin_schedule ─► Scheduling ─► finish_schedule
//! ```
//!
//! [`Conversation::send_message`] and [`Conversation::select_slot`] run both
//! halves against a [`ConversationService`].

use crate::message::ChatMessage;
use crate::reply::Reply;
use crate::schedule::{LeadContext, ScheduleRequest, ScheduleResponse, Slot};
use crate::service::{ConversationService, ServiceError};
use tracing::{debug, info, warn};

/// Message appended when the backend offers meeting slots.
pub const SLOTS_INTRO: &str = "Great! Here are some available times. Which one works for you?";

/// Message appended when a slot offer turns out to be empty.
pub const NO_SLOTS: &str = "Sorry, there are no available times right now.";

/// Request lifecycle of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request in flight.
    #[default]
    Idle,
    /// Waiting for a `/chat` reply.
    Sending,
    /// Waiting for a `/schedule` reply.
    Scheduling,
}

impl Phase {
    /// Short label for status displays.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Ready",
            Phase::Sending => "Sending",
            Phase::Scheduling => "Scheduling",
        }
    }
}

/// State of a single chat session.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    slots: Vec<Slot>,
    lead: Option<LeadContext>,
    phase: Phase,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Slots currently on offer.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Lead context held for booking, if any.
    pub fn lead(&self) -> Option<&LeadContext> {
        self.lead.as_ref()
    }

    /// Current request phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Start a chat turn.
    ///
    /// Returns the history to post to `/chat`, or `None` if `text` is blank or
    /// a request is already in flight (in which case nothing changes).
    pub fn begin_send(&mut self, text: &str) -> Option<Vec<ChatMessage>> {
        let text = text.trim();
        if text.is_empty() || self.is_busy() {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        self.slots.clear();
        self.lead = None;
        self.phase = Phase::Sending;
        debug!(messages = self.messages.len(), "chat turn started");

        Some(self.messages.clone())
    }

    /// Complete a chat turn with the backend's outcome.
    pub fn finish_send(&mut self, outcome: Result<String, ServiceError>) {
        if self.phase != Phase::Sending {
            warn!(phase = ?self.phase, "ignoring chat reply with no turn in flight");
            return;
        }
        self.phase = Phase::Idle;

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.messages.push(ChatMessage::error(e));
                return;
            }
        };

        match Reply::parse(&raw) {
            Ok(Reply::ShowSlots { slots, lead }) => {
                if slots.is_empty() {
                    self.messages.push(ChatMessage::assistant(NO_SLOTS));
                } else {
                    info!(slots = slots.len(), "backend offered meeting slots");
                    self.slots = slots;
                    self.lead = Some(lead);
                    self.messages.push(ChatMessage::assistant(SLOTS_INTRO));
                }
            }
            Ok(Reply::Confirmation(confirmation)) => {
                self.messages
                    .push(ChatMessage::assistant(confirmation.summary()));
            }
            Ok(Reply::Text(text)) => {
                self.messages.push(ChatMessage::assistant(text));
            }
            Err(e) => {
                warn!(error = %e, "could not interpret chat reply");
                self.messages.push(ChatMessage::error(e));
            }
        }
    }

    /// Start booking `slot`.
    ///
    /// Returns the `/schedule` request, or `None` if no lead context is held or
    /// a request is already in flight. The offered slots and the lead context
    /// are consumed here, so a stale context can never be submitted twice.
    pub fn begin_schedule(&mut self, slot: Slot) -> Option<ScheduleRequest> {
        if self.is_busy() {
            return None;
        }
        let lead = self.lead.take()?;

        self.slots.clear();
        self.messages.push(ChatMessage::assistant(format!(
            "Booking your meeting for {}...",
            slot.display_local()
        )));
        self.phase = Phase::Scheduling;
        info!(start_time = %slot.start_time, "scheduling slot");

        Some(ScheduleRequest::new(slot, lead))
    }

    /// Start booking the offered slot at `index`.
    pub fn begin_schedule_at(&mut self, index: usize) -> Option<ScheduleRequest> {
        let slot = self.slots.get(index)?.clone();
        self.begin_schedule(slot)
    }

    /// Complete a booking with the backend's outcome.
    pub fn finish_schedule(&mut self, outcome: Result<ScheduleResponse, ServiceError>) {
        if self.phase != Phase::Scheduling {
            warn!(phase = ?self.phase, "ignoring schedule reply with no booking in flight");
            return;
        }
        self.phase = Phase::Idle;
        self.lead = None;

        match outcome {
            Ok(response) => self.messages.push(ChatMessage::assistant(response.summary())),
            Err(e) => {
                warn!(error = %e, "schedule request failed");
                self.messages.push(ChatMessage::error(e));
            }
        }
    }

    /// Run a full chat turn. Returns `false` if the turn was rejected.
    pub async fn send_message(&mut self, service: &dyn ConversationService, text: &str) -> bool {
        let Some(history) = self.begin_send(text) else {
            return false;
        };
        let outcome = service.send_message(&history).await;
        self.finish_send(outcome);
        true
    }

    /// Run a full booking of `slot`. Returns `false` if it was rejected.
    pub async fn select_slot(&mut self, service: &dyn ConversationService, slot: Slot) -> bool {
        let Some(request) = self.begin_schedule(slot) else {
            return false;
        };
        let outcome = service.confirm_schedule(&request).await;
        self.finish_schedule(outcome);
        true
    }
}
