//! Refresh bookkeeping
//!
//! At most one refresh is in flight. Ticks that arrive while one is running
//! are skipped; out-of-band requests (after an action) are coalesced into a
//! single follow-up that starts as soon as the current one finishes.

use std::time::Instant;

#[derive(Debug, Default)]
pub struct RefreshState {
    /// Sequence number of the in-flight refresh
    in_flight: Option<u64>,
    next_seq: u64,
    follow_up: bool,
    /// When the last refresh finished, successfully or not
    pub last_refresh: Option<Instant>,
    /// Sub-collection failures in the current snapshot, or 1 after a failed
    /// primary load
    pub error_count: usize,
    /// False after the primary load fails, until the next success
    pub connected: bool,
}

impl RefreshState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a refresh if none is running. Returns its sequence number.
    pub fn try_begin(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            return None;
        }
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        Some(self.next_seq)
    }

    /// Start a refresh now, or remember to run one when the current finishes
    pub fn request(&mut self) -> Option<u64> {
        let seq = self.try_begin();
        if seq.is_none() {
            self.follow_up = true;
        }
        seq
    }

    /// Mark `seq` finished. Returns false for a completion that does not
    /// belong to the in-flight request.
    pub fn finish(&mut self, seq: u64, now: Instant) -> bool {
        if self.in_flight != Some(seq) {
            return false;
        }
        self.in_flight = None;
        self.last_refresh = Some(now);
        true
    }

    /// Consume the pending follow-up, if any
    pub fn take_follow_up(&mut self) -> bool {
        std::mem::take(&mut self.follow_up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_one_refresh_in_flight() {
        let mut refresh = RefreshState::new();
        let seq = refresh.try_begin().unwrap();
        assert!(refresh.is_refreshing());
        assert_eq!(refresh.try_begin(), None);

        assert!(refresh.finish(seq, Instant::now()));
        assert!(!refresh.is_refreshing());
        assert!(refresh.last_refresh.is_some());
        assert!(refresh.try_begin().is_some());
    }

    #[test]
    fn test_out_of_band_requests_coalesce() {
        let mut refresh = RefreshState::new();
        let seq = refresh.request().unwrap();
        assert_eq!(refresh.request(), None);
        assert_eq!(refresh.request(), None);

        refresh.finish(seq, Instant::now());
        assert!(refresh.take_follow_up());
        assert!(!refresh.take_follow_up());
    }

    #[test]
    fn test_unknown_completion_is_ignored() {
        let mut refresh = RefreshState::new();
        let seq = refresh.try_begin().unwrap();
        assert!(!refresh.finish(seq + 1, Instant::now()));
        assert!(refresh.is_refreshing());
        assert!(refresh.last_refresh.is_none());
    }
}
