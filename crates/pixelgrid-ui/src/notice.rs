use std::collections::VecDeque;

/// How long a notice stays visible by default.
pub const DEFAULT_TTL_MS: f64 = 3_000.0;

/// Maximum notices kept at once; older ones are dropped first.
pub const MAX_NOTICES: usize = 4;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    /// Remaining lifetime in milliseconds.
    pub remaining_ms: f64,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self { level, text: text.into(), remaining_ms: DEFAULT_TTL_MS }
    }
}

/// Bounded queue of notices, newest last. Aged by the shell's frame clock.
#[derive(Debug, Default)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => log::error!("{}", notice.text),
            NoticeLevel::Warning => log::warn!("{}", notice.text),
            NoticeLevel::Info | NoticeLevel::Success => log::info!("{}", notice.text),
        }
        if self.items.len() == MAX_NOTICES {
            self.items.pop_front();
        }
        self.items.push_back(notice);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Info, text));
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Success, text));
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Warning, text));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Error, text));
    }

    /// Ages every notice by `dt_ms` and drops the expired ones.
    pub fn advance(&mut self, dt_ms: f64) {
        if dt_ms.is_nan() || dt_ms <= 0.0 {
            return;
        }
        for n in &mut self.items {
            n.remaining_ms -= dt_ms;
        }
        self.items.retain(|n| n.remaining_ms > 0.0);
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
