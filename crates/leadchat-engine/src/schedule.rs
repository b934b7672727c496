//! Scheduling types: offered slots, lead context, and the `/schedule` exchange.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

/// Display format for slot and meeting times.
const TIME_FORMAT: &str = "%a %d %b %Y %H:%M";

/// A backend timestamp, with or without a UTC offset.
enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    /// No offset given; a wall-clock time in the viewer's zone.
    Floating(NaiveDateTime),
}

impl Timestamp {
    fn parse(raw: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Zoned(dt));
        }
        raw.parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()
            .map(Self::Floating)
    }
}

/// Render `raw` in `tz`, or return it unchanged when it is not a timestamp.
fn format_time<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match Timestamp::parse(raw) {
        Some(Timestamp::Zoned(dt)) => dt.with_timezone(tz).format(TIME_FORMAT).to_string(),
        Some(Timestamp::Floating(naive)) => naive.format(TIME_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// An appointment time offered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Start of the offered meeting, exactly as the backend sent it.
    #[serde(deserialize_with = "slot_start")]
    pub start_time: String,

    /// Any other fields the backend attached (e.g. `schedulable_url`).
    /// Echoed back untouched as part of `slot_info`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keep the raw start time, but refuse one that is not a timestamp at all.
fn slot_start<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match Timestamp::parse(&raw) {
        Some(_) => Ok(raw),
        None => Err(de::Error::custom(format!("invalid start_time {raw:?}"))),
    }
}

impl Slot {
    /// Create a slot with no extra fields.
    pub fn new(start_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            extra: Map::new(),
        }
    }

    /// Start time rendered in the local time zone.
    pub fn display_local(&self) -> String {
        self.display_in(&Local)
    }

    /// Start time rendered in the given time zone. Times without an offset
    /// are shown as given.
    pub fn display_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format_time(&self.start_time, tz)
    }
}

/// Backend-supplied record needed to finalize a booking.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LeadContext {
    /// Qualified lead details, opaque to the client.
    #[serde(default = "empty_object")]
    pub lead_data: Value,

    /// CRM card that the meeting gets attached to.
    #[serde(default, rename = "pipefy_card_id", deserialize_with = "card_id")]
    pub card_id: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Accept the card id either as a JSON string or a bare number.
fn card_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// Body of `POST /schedule`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRequest {
    /// The slot the user picked.
    pub slot_info: Slot,
    /// Lead details from the slot offer.
    pub lead_data: Value,
    /// CRM card id from the slot offer.
    pub pipefy_card_id: Option<String>,
}

impl ScheduleRequest {
    /// Build a request for `slot` using the held lead context.
    pub fn new(slot: Slot, lead: LeadContext) -> Self {
        Self {
            slot_info: slot,
            lead_data: lead.lead_data,
            pipefy_card_id: lead.card_id,
        }
    }
}

/// Successful response of `POST /schedule`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleResponse {
    pub message: String,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub meeting_datetime: Option<String>,
}

impl ScheduleResponse {
    /// Text of the confirmation message appended to the conversation.
    pub fn summary(&self) -> String {
        let mut text = self.message.clone();
        if let Some(link) = &self.meeting_link {
            text.push_str("\nMeeting link: ");
            text.push_str(link);
        }
        if let Some(when) = &self.meeting_datetime {
            text.push_str("\nMeeting time: ");
            text.push_str(&format_time(when, &Local));
        }
        text
    }
}
