//! Success and error notices recorded by the stores.

use serde::Serialize;

/// Whether an action succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// The action succeeded.
    Success,
    /// The action failed.
    Error,
}

/// A short message about the outcome of a store action, for display to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Whether the action succeeded.
    pub kind: NoticeKind,
    /// The message to show.
    pub message: String,
}

/// The notices recorded by a store, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    /// Record a successful action.
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message.into());
    }

    /// Record a failed action.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.push(NoticeKind::Error, message);
    }

    /// The notices that have not been taken yet.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The most recent notice.
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Remove and return every notice, e.g. once they have been shown.
    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn push(&mut self, kind: NoticeKind, message: String) {
        self.notices.push(Notice { kind, message });
    }
}
