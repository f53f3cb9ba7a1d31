//! Transient user-facing notices.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The operation went through.
    Success,
    /// The operation failed or was rejected.
    Error,
}

/// One message shown to the user until it expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Success or failure.
    pub kind: NoticeKind,
    /// Text to show.
    pub message: String,
    /// When the notice stops being shown.
    pub expires_at: DateTime<Utc>,
}

/// Collects notices and forgets them once their time to live has passed.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: TimeDelta,
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBoard {
    /// Creates an empty board whose notices live for `ttl`.
    #[must_use]
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            notices: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Posts a notice at `now`.
    pub fn post(&self, kind: NoticeKind, message: impl Into<String>, now: DateTime<Utc>) {
        self.lock().push(Notice {
            kind,
            message: message.into(),
            expires_at: now + self.ttl,
        });
    }

    /// Posts a success notice at `now`.
    pub fn success(&self, message: impl Into<String>, now: DateTime<Utc>) {
        self.post(NoticeKind::Success, message, now);
    }

    /// Posts an error notice at `now`.
    pub fn error(&self, message: impl Into<String>, now: DateTime<Utc>) {
        self.post(NoticeKind::Error, message, now);
    }

    /// Returns the notices still live at `now`, oldest first. Expired ones
    /// are dropped.
    #[must_use]
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Notice> {
        let mut notices = self.lock();
        notices.retain(|notice| notice.expires_at > now);
        notices.clone()
    }
}
