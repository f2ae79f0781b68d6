//! Transient notifications shown after each mutating gesture.

use std::time::{Duration, Instant};

/// How long a notification stays up.
pub const DEFAULT_TOAST_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Toaster {
    current: Option<Toast>,
    ttl: Duration,
}

impl Toaster {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            current: None,
            ttl: Duration::from_millis(ttl_ms),
        }
    }

    /// Replace whatever is showing with `message`.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some(Toast {
            message: message.into(),
            shown_at: now,
        });
    }

    pub fn message(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|toast| now.duration_since(toast.shown_at) < self.ttl)
            .map(|toast| toast.message.as_str())
    }

    /// Drop an expired notification. Returns true if one was dismissed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .map(|toast| now.duration_since(toast.shown_at) >= self.ttl)
            .unwrap_or(false);
        if expired {
            self.current = None;
        }
        expired
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_MS)
    }
}
