//! Transient notifications raised by the screens

use console::style;
use std::collections::VecDeque;
use std::fmt;
use tracing::{info, warn};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// An operation succeeded
    Success,
    /// An operation failed or was refused
    Error,
}

/// One notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the operator
    pub message: String,
}

impl Notice {
    /// Styled single-line rendering
    pub fn render(&self) -> String {
        match self.level {
            NoticeLevel::Success => format!("{} {}", style("✓").green().bold(), self.message),
            NoticeLevel::Error => format!("{} {}", style("✗").red().bold(), self.message),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Bounded FIFO of pending notifications
///
/// At capacity the oldest notice is evicted.
#[derive(Debug, Clone)]
pub struct Toaster {
    capacity: usize,
    notices: VecDeque<Notice>,
}

impl Toaster {
    /// Create a toaster holding at most `capacity` notices (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            notices: VecDeque::with_capacity(capacity),
        }
    }

    /// Raise a success notice
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    /// Raise an error notice
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Success => info!(%message, "notification"),
            NoticeLevel::Error => warn!(%message, "notification"),
        }

        if self.notices.len() == self.capacity {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice { level, message });
    }

    /// Pending notices, oldest first
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Most recent notice
    pub fn last(&self) -> Option<&Notice> {
        self.notices.back()
    }

    /// Messages of the pending notices, oldest first
    pub fn messages(&self) -> Vec<&str> {
        self.notices.iter().map(|n| n.message.as_str()).collect()
    }

    /// Take every pending notice
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Number of pending notices
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether no notice is pending
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(5)
    }
}
