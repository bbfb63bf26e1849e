/// Handle of one outstanding frame request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(pub u64);

/// Display-refresh scheduler the animation driver requests frames from.
///
/// Implementations call back into the session with the id and a millisecond
/// timestamp when the request fires. A cancelled request must never fire.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequestId;

    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Scheduler driven by hand: requests fire when [`drain_due`](Self::drain_due) is called.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameRequestId>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests armed and not yet fired or cancelled.
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn pending(&self) -> &[FrameRequestId] {
        &self.pending
    }

    /// Total requests ever made.
    #[inline]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total effective cancellations.
    #[inline]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Fires every pending request: returns their ids and forgets them.
    pub fn drain_due(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.requested += 1;
        self.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        let before = self.pending.len();
        self.pending.retain(|p| *p != id);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_cancel_drain() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        s.cancel_frame(a);
        s.cancel_frame(a);
        assert_eq!(s.cancelled(), 1);
        assert_eq!(s.drain_due(), [b]);
        assert_eq!(s.pending_count(), 0);
        assert_eq!(s.requested(), 2);
    }
}
