use std::time::{Duration, Instant};

/// How long a notice stays up before it expires on its own.
pub(crate) const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Severity shared by notices and the remaining-balance indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone)]
pub(crate) struct Notice {
    pub(crate) id: u64,
    pub(crate) level: Level,
    pub(crate) message: String,
    pub(crate) raised_at: Instant,
}

/// Transient, dismissible notices. Newest last.
#[derive(Debug)]
pub(crate) struct Notifier {
    notices: Vec<Notice>,
    next_id: u64,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }
}

impl Notifier {
    pub(crate) fn with_ttl(ttl: Duration) -> Self {
        Self {
            notices: Vec::new(),
            next_id: 1,
            ttl,
        }
    }

    pub(crate) fn push(&mut self, level: Level, message: impl Into<String>) -> u64 {
        self.push_at(level, message, Instant::now())
    }

    pub(crate) fn push_at(&mut self, level: Level, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            level,
            message: message.into(),
            raised_at: now,
        });
        id
    }

    pub(crate) fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub(crate) fn dismiss_latest(&mut self) -> bool {
        match self.latest().map(|n| n.id) {
            Some(id) => self.dismiss(id),
            None => false,
        }
    }

    /// Drop every notice older than the TTL. Returns how many were removed.
    pub(crate) fn expire(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.notices.len();
        self.notices
            .retain(|n| now.saturating_duration_since(n.raised_at) < ttl);
        before - self.notices.len()
    }

    pub(crate) fn active(&self) -> &[Notice] {
        &self.notices
    }

    pub(crate) fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }
}
