//! Shared utilities for breaker integration tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use fuse::Sender;

/// A request sender with a switchable outcome.
///
/// Counts invocations and flags any call that starts while another one is
/// still running.
#[derive(Debug)]
pub struct SampleRequestSender {
    status: AtomicBool,
    calls: AtomicU32,
    in_flight: AtomicBool,
    overlapped: AtomicBool,
    latency: Duration,
}

impl SampleRequestSender {
    pub fn new(status: bool) -> Self {
        Self {
            status: AtomicBool::new(status),
            calls: AtomicU32::new(0),
            in_flight: AtomicBool::new(false),
            overlapped: AtomicBool::new(false),
            latency: Duration::ZERO,
        }
    }

    pub fn succeeding() -> Self {
        Self::new(true)
    }

    pub fn failing() -> Self {
        Self::new(false)
    }

    /// Simulate a slow remote.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_status(&self, status: bool) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn overlapped(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }
}

impl Sender for SampleRequestSender {
    fn send(&self) -> bool {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        let status = self.status.load(Ordering::SeqCst);
        self.in_flight.store(false, Ordering::SeqCst);
        status
    }
}
