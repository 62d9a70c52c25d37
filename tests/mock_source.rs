//! Mock poll source for testing.
//!
//! Provides a scripted `PollSource` implementation that needs no real
//! network access. Each poll consumes the next scripted step (a batch of
//! items or a failure), optionally after a configurable fetch latency, and
//! the mock records enough about each invocation to verify ordering,
//! cadence, and non-reentrancy.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use poll_stream::{PollError, PollSource, Timestamped};
use tokio::time::Instant;

/// A timestamped item produced by the mock source.
#[derive(Debug, Clone, PartialEq)]
pub struct MockItem {
    pub id: u32,
    pub created_utc: f64,
}

impl Timestamped for MockItem {
    fn created_utc(&self) -> f64 {
        self.created_utc
    }
}

/// Wall-clock seconds since the Unix epoch.
pub fn epoch_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_secs_f64()
}

/// An item created well after any cycle cutoff the test will record.
pub fn fresh_item(id: u32) -> MockItem {
    MockItem {
        id,
        created_utc: epoch_now() + 60.0,
    }
}

/// An item created well before any cycle cutoff the test will record.
pub fn stale_item(id: u32) -> MockItem {
    MockItem {
        id,
        created_utc: epoch_now() - 60.0,
    }
}

/// One scripted poll outcome.
#[derive(Debug)]
pub enum ScriptStep {
    Items(Vec<MockItem>),
    Fail(&'static str),
}

/// Scripted poll source that records its invocations.
///
/// Clones share all state, so tests keep a clone while the stream owns the
/// original. An exhausted script yields empty batches.
#[derive(Clone)]
pub struct MockSource {
    script: Arc<Mutex<VecDeque<ScriptStep>>>,
    latency: Duration,
    poll_count: Arc<AtomicU32>,
    in_flight: Arc<AtomicBool>,
    overlap_detected: Arc<AtomicBool>,
    poll_starts: Arc<Mutex<Vec<Instant>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            latency: Duration::ZERO,
            poll_count: Arc::new(AtomicU32::new(0)),
            in_flight: Arc::new(AtomicBool::new(false)),
            overlap_detected: Arc::new(AtomicBool::new(false)),
            poll_starts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every poll take `latency` before settling.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a successful batch for a future poll.
    pub fn enqueue_items(&self, items: Vec<MockItem>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptStep::Items(items));
    }

    /// Queue a failure for a future poll.
    pub fn enqueue_failure(&self, message: &'static str) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptStep::Fail(message));
    }

    /// Number of polls begun so far.
    pub fn poll_count(&self) -> u32 {
        self.poll_count.load(Ordering::SeqCst)
    }

    /// Whether two polls were ever in flight at once.
    pub fn overlap_detected(&self) -> bool {
        self.overlap_detected.load(Ordering::SeqCst)
    }

    /// Instants at which each poll began.
    pub fn poll_starts(&self) -> Vec<Instant> {
        self.poll_starts.lock().unwrap().clone()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PollSource for MockSource {
    type Item = MockItem;

    async fn poll(&self) -> Result<Vec<MockItem>, PollError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlap_detected.store(true, Ordering::SeqCst);
        }
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        self.poll_starts.lock().unwrap().push(Instant::now());

        if self.latency > Duration::ZERO {
            tokio::time::sleep(self.latency).await;
        }

        let step = self.script.lock().unwrap().pop_front();
        self.in_flight.store(false, Ordering::SeqCst);

        match step {
            None => Ok(Vec::new()),
            Some(ScriptStep::Items(items)) => Ok(items),
            Some(ScriptStep::Fail(message)) => Err(PollError::msg(message)),
        }
    }
}
