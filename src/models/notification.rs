//! Transient notifications shown above the book list

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
}

/// A message that is visible until `expires_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub tone: Tone,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, tone: Tone, now: DateTime<Utc>, display: Duration) -> Self {
        Self {
            message: message.into(),
            tone,
            expires_at: now + display,
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
