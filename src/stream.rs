//! The polling event stream.
//!
//! Runs one self-rescheduling loop task per stream: poll the source, emit
//! qualifying items and failures, then sleep out the remainder of the
//! interval so fetch latency is absorbed into the cadence instead of added
//! to it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use std::future::Future;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::StreamConfig;
use crate::error::{PollError, Result};
use crate::event::{StreamEvent, Timestamped};
use crate::iter::EventIterator;
use crate::source::{FnSource, PollSource};
use crate::subscribers::Subscribers;

/// A stream of events generated by polling an asynchronous source.
///
/// Construction starts the stream immediately; no separate start call is
/// needed for normal use. The polling loop runs as a spawned tokio task, so
/// streams must be created inside a tokio runtime.
///
/// Exactly one fetch is in flight at any time: the next cycle is scheduled
/// only after the current fetch settles, successfully or not. A fetch that
/// never settles therefore stalls the stream; sources that can hang should
/// enforce their own timeouts.
///
/// Cycle order is strict: a cycle's data and error events are dispatched
/// after its fetch settles and before the next cycle's fetch begins.
pub struct PollingEventStream<S: PollSource> {
    config: StreamConfig,
    source: Arc<S>,

    /// Checked at the top of each cycle; set by stop()
    stopped: Arc<AtomicBool>,

    subscribers: Arc<Subscribers<S::Item>>,

    /// Sync channel feeding [`EventIterator`] consumers
    event_tx: mpsc::SyncSender<StreamEvent<S::Item>>,
    event_rx: Arc<Mutex<mpsc::Receiver<StreamEvent<S::Item>>>>,

    /// Total poll cycles begun
    cycle_count: Arc<AtomicU64>,

    /// Cycles whose fetch failed
    failed_cycle_count: Arc<AtomicU64>,

    /// Handle for the current loop task
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: PollSource> PollingEventStream<S> {
    /// Create and start a stream with the given configuration.
    pub fn new(config: StreamConfig, source: S) -> Result<Self> {
        config.validate()?;

        let (event_tx, event_rx) = mpsc::sync_channel(config.event_buffer_size);

        let stream = Self {
            config,
            source: Arc::new(source),
            stopped: Arc::new(AtomicBool::new(true)),
            subscribers: Arc::new(Subscribers::new()),
            event_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            cycle_count: Arc::new(AtomicU64::new(0)),
            failed_cycle_count: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        };

        stream.start();
        Ok(stream)
    }

    /// Create and start a stream with the given interval and default
    /// configuration otherwise.
    pub fn with_interval(poll_interval: Duration, source: S) -> Result<Self> {
        Self::new(StreamConfig::new(poll_interval), source)
    }

    /// (Re)activate the polling loop.
    ///
    /// Clears the stopped flag and fires an immediate cycle; the first poll
    /// does not wait for the interval to elapse. Called by the constructor.
    ///
    /// Calling start on an already-running stream launches an extra
    /// immediate cycle alongside the existing loop; avoid it unless the
    /// stream has been stopped first.
    pub fn start(&self) {
        self.stopped.store(false, Ordering::Relaxed);

        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.source),
            Arc::clone(&self.stopped),
            Arc::clone(&self.subscribers),
            self.event_tx.clone(),
            self.config.poll_interval,
            Arc::clone(&self.cycle_count),
            Arc::clone(&self.failed_cycle_count),
        ));

        if let Ok(mut task) = self.task.lock() {
            // Old handle (if any) is detached, not aborted; a still-running
            // loop terminates itself at its next stopped-flag check.
            *task = Some(handle);
        }
    }

    /// Deactivate future cycles.
    ///
    /// Cooperative: the flag is checked only at the top of each cycle. A
    /// fetch already in flight completes and its qualifying events still
    /// emit; only the next cycle is suppressed.
    pub fn stop(&self) {
        tracing::debug!("Stop requested for polling stream");
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Whether stop() has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Whether the loop task is still alive.
    ///
    /// Remains true briefly after stop() while an in-flight cycle finishes.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .ok()
            .and_then(|task| task.as_ref().map(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Register a handler for data events.
    pub fn on_data<F>(&self, handler: F)
    where
        F: Fn(&S::Item) + Send + Sync + 'static,
    {
        self.subscribers.on_data(handler);
    }

    /// Register a handler for error events.
    ///
    /// Failures emitted while no error handler is registered are logged at
    /// `warn` and dropped.
    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&PollError) + Send + Sync + 'static,
    {
        self.subscribers.on_error(handler);
    }

    /// Get a blocking iterator over this stream's events.
    ///
    /// Every data and error event is also forwarded to the iterator's
    /// bounded channel; if no iterator drains it, events beyond the
    /// configured buffer size are dropped for the iterator only.
    pub fn iter(&self) -> EventIterator<S::Item> {
        EventIterator::new(Arc::clone(&self.event_rx))
    }

    /// Get the stream's configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Get a snapshot of stream statistics.
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            cycles: self.cycle_count.load(Ordering::Relaxed),
            failed_cycles: self.failed_cycle_count.load(Ordering::Relaxed),
            is_running: self.is_running(),
            poll_interval: self.config.poll_interval,
        }
    }
}

impl<A, T> PollingEventStream<FnSource<A, T>>
where
    A: Clone + Send + Sync + 'static,
    T: Timestamped + Send + 'static,
{
    /// Create and start a stream from an interval, fixed arguments, and an
    /// async poll closure.
    ///
    /// Convenience over [`FnSource`] for the common case; bundle multiple
    /// fixed arguments in a tuple.
    pub fn from_fn<F, Fut>(poll_interval: Duration, args: A, poll_fn: F) -> Result<Self>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Vec<T>, PollError>> + Send + 'static,
    {
        Self::with_interval(poll_interval, FnSource::new(args, poll_fn))
    }
}

impl<S: PollSource> Drop for PollingEventStream<S> {
    fn drop(&mut self) {
        tracing::debug!(
            "Polling stream dropping after {} cycles",
            self.cycle_count.load(Ordering::Relaxed)
        );
        self.stopped.store(true, Ordering::Relaxed);
    }
}

/// Statistics snapshot for a polling stream.
#[derive(Debug, Clone)]
pub struct StreamStats {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub is_running: bool,
    pub poll_interval: Duration,
}

/// Wall-clock seconds since the Unix epoch, as the cutoff for item filtering.
fn epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

/// Main polling loop.
///
/// One cycle: check the stopped flag, record the cycle start, poll the
/// source, dispatch events, then sleep `max(interval - elapsed, 0)` so the
/// next cycle starts one interval after this one did. A fetch slower than
/// the interval makes the next cycle fire back-to-back.
async fn run_loop<S: PollSource>(
    source: Arc<S>,
    stopped: Arc<AtomicBool>,
    subscribers: Arc<Subscribers<S::Item>>,
    event_tx: mpsc::SyncSender<StreamEvent<S::Item>>,
    interval: Duration,
    cycle_count: Arc<AtomicU64>,
    failed_cycle_count: Arc<AtomicU64>,
) {
    tracing::info!("Polling loop started (interval: {:?})", interval);

    loop {
        if stopped.load(Ordering::Relaxed) {
            break;
        }

        let cycle_start = Instant::now();
        let cutoff = epoch_seconds();
        let cycle = cycle_count.fetch_add(1, Ordering::Relaxed) + 1;

        match source.poll().await {
            Ok(items) => {
                let total = items.len();
                let mut emitted = 0usize;

                for item in items {
                    // Items created before this cycle began were presumably
                    // seen by a prior cycle.
                    if item.created_utc() >= cutoff {
                        subscribers.notify_data(&item);
                        forward(&event_tx, StreamEvent::Data(item));
                        emitted += 1;
                    }
                }

                tracing::debug!(cycle, total, emitted, "Poll cycle completed");
            }
            Err(error) => {
                failed_cycle_count.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(cycle, "Poll cycle failed: {}", error);

                let error = Arc::new(error);
                subscribers.notify_error(&error);
                forward(&event_tx, StreamEvent::Error(error));
            }
        }

        let elapsed = cycle_start.elapsed();
        tokio::time::sleep(interval.saturating_sub(elapsed)).await;
    }

    tracing::info!("Polling loop ended");
}

/// Forward an event to the iterator channel without blocking the loop.
fn forward<T>(event_tx: &mpsc::SyncSender<StreamEvent<T>>, event: StreamEvent<T>) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(mpsc::TrySendError::Full(event)) => {
            tracing::warn!("Event buffer full, dropping {} event for iterator", event.kind());
        }
        // Stream dropped mid-cycle; subscribers already notified
        Err(mpsc::TrySendError::Disconnected(_)) => {}
    }
}
