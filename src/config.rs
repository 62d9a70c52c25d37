//! Configuration types for the poll-stream crate.
//!
//! This module defines the configuration structure that controls the
//! behavior of a [`PollingEventStream`](crate::stream::PollingEventStream):
//! the poll cadence and the buffering of events handed to iterators.

use std::time::Duration;

use crate::error::{Result, StreamError};

/// Configuration for a polling event stream.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Target time between the start of consecutive poll cycles.
    /// Default: 5 seconds
    pub poll_interval: Duration,

    /// Buffer size for the sync event channel backing [`EventIterator`].
    /// When the buffer is full, further events are dropped for the iterator
    /// (subscribed handlers still see them).
    /// Default: 1000
    ///
    /// [`EventIterator`]: crate::iter::EventIterator
    pub event_buffer_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            event_buffer_size: 1000,
        }
    }
}

impl StreamConfig {
    /// Create a config with the given poll interval and default buffering.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..Default::default()
        }
    }

    /// Create a StreamConfig optimized for fast polling.
    pub fn fast_polling() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            ..Default::default()
        }
    }

    /// Create a StreamConfig optimized for resource efficiency.
    pub fn resource_efficient() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            event_buffer_size: 100,
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval == Duration::ZERO {
            return Err(StreamError::Configuration(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(StreamError::Configuration(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder pattern methods for fluent configuration

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }
}
