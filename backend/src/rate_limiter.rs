//! Sliding-window limiter for outbound model calls.
//!
//! The limiter keeps the instants of accepted calls and counts the ones that
//! fall inside the window ending "now". It has no internal locking; the
//! gateway owns the only instance and serializes access to it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    accepted: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            accepted: VecDeque::with_capacity(max_requests),
        }
    }

    pub fn is_limited(&mut self) -> bool {
        self.is_limited_at(Instant::now())
    }

    /// Purges expired instants, then returns `true` if the window is full.
    /// A call that is not limited is recorded at `now`; a limited one is not.
    pub fn is_limited_at(&mut self, now: Instant) -> bool {
        self.purge(now);
        if self.accepted.len() >= self.max_requests {
            return true;
        }
        self.accepted.push_back(now);
        false
    }

    pub fn time_to_wait_ms(&self) -> u64 {
        self.time_to_wait_ms_at(Instant::now())
    }

    /// Milliseconds until the oldest recorded call leaves the window.
    pub fn time_to_wait_ms_at(&self, now: Instant) -> u64 {
        match self.accepted.front() {
            None => 0,
            Some(oldest) => {
                let elapsed = now.saturating_duration_since(*oldest);
                self.window.saturating_sub(elapsed).as_millis() as u64
            }
        }
    }

    fn purge(&mut self, now: Instant) {
        while let Some(oldest) = self.accepted.front() {
            if now.saturating_duration_since(*oldest) > self.window {
                self.accepted.pop_front();
            } else {
                break;
            }
        }
    }
}
