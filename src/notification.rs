use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use strum::Display;

use crate::logger;

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NotificationSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: NotificationSeverity,
    pub message: String,
    pub created_at: Instant,
}

/// Notification surface shared by the widgets of the render worker.
/// Oldest entries are dropped once `capacity` is reached, and every entry
/// expires `ttl` after it was pushed.
#[derive(Debug)]
pub struct Notifications {
    items: VecDeque<Notification>,
    capacity: usize,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Notifications {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn push(&mut self, severity: NotificationSeverity, message: impl Into<String>) {
        let message = message.into();

        logger!(info, "[notification] {}: {}", severity, message);

        if self.items.len() == self.capacity {
            self.items.pop_front();
        }

        self.items.push_back(Notification {
            severity,
            message,
            created_at: Instant::now(),
        });
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.push(NotificationSeverity::Error, message)
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.push(NotificationSeverity::Warning, message)
    }

    /// Drops the entries older than the ttl.
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;

        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < ttl);
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
