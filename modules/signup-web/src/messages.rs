use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn css_class(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub text: String,
    pub kind: MessageKind,
    pub expires_at: Instant,
}

/// A status area that shows one message at a time and hides it after a fixed
/// delay. Showing a new message replaces the old one along with its deadline,
/// so an earlier message can never hide a later one.
#[derive(Debug, Clone)]
pub struct MessageArea {
    current: Option<TransientMessage>,
    ttl: Duration,
}

impl MessageArea {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.current = Some(TransientMessage {
            text: text.into(),
            kind,
            expires_at: Instant::now() + self.ttl,
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(text, MessageKind::Success);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(text, MessageKind::Error);
    }

    pub fn visible(&self) -> Option<&TransientMessage> {
        self.visible_at(Instant::now())
    }

    pub fn visible_at(&self, now: Instant) -> Option<&TransientMessage> {
        self.current.as_ref().filter(|m| now < m.expires_at)
    }

    /// Time until the visible message hides, if one is visible.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.visible_at(now).map(|m| m.expires_at - now)
    }
}
