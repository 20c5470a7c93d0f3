//! Query DTOs - Data Transfer Objects per query string

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// ?identifier=... su /auth/user/, accetta sia l'id che lo username
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UserIdentifierQuery {
    #[serde(default)]
    pub identifier: Option<String>,
}

/// ?chat_id=... su /messages/get_chat_messages
#[derive(Serialize, Deserialize, Debug)]
pub struct ChatMessagesQuery {
    pub chat_id: i64,
}

/// Filtri grezzi di GET /messages/messages
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct MessagesQuery {
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub receiver_id: Option<String>,
    #[serde(default)]
    pub time_delivered: Option<String>,
}

/// Filtro su `time_delivered`: un istante esatto oppure un intero giorno UTC
#[derive(Debug, Clone, PartialEq)]
pub enum TimeFilter {
    At(DateTime<Utc>),
    Day(NaiveDate),
}

impl TimeFilter {
    /// Parses an RFC 3339 instant or a `YYYY-MM-DD` date.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self::At(instant.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Self::Day)
            .map_err(|_| format!("Invalid time_delivered '{}': expected RFC 3339 or YYYY-MM-DD", raw))
    }

    /// Half-open `[start, end)` range covered by this filter, `None` for exact instants.
    pub fn day_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Self::At(_) => None,
            Self::Day(date) => {
                let start = date.and_time(NaiveTime::MIN).and_utc();
                Some((start, start + TimeDelta::days(1)))
            }
        }
    }
}

/// Filtri validati, pronti per il MessageRepository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageFilter {
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    pub time_delivered: Option<TimeFilter>,
}

impl TryFrom<MessagesQuery> for MessageFilter {
    type Error = String;

    fn try_from(value: MessagesQuery) -> Result<Self, Self::Error> {
        // ?sender_id= vuoto equivale a nessun filtro
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let time_delivered = match non_empty(value.time_delivered) {
            Some(raw) => Some(TimeFilter::parse(raw.trim())?),
            None => None,
        };

        Ok(Self {
            sender_id: non_empty(value.sender_id),
            receiver_id: non_empty(value.receiver_id),
            time_delivered,
        })
    }
}
