//! Publish/subscribe registry for stream events.
//!
//! An explicit registry of callback lists keyed by event kind, rather than
//! an inheritance-based emitter. Handlers are registered before or after the
//! stream starts and are invoked on the stream's polling task, in
//! registration order, strictly after the producing cycle's fetch settles.

use std::sync::{Arc, RwLock};

use crate::error::PollError;

type DataHandler<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorHandler = Box<dyn Fn(&PollError) + Send + Sync>;

/// Registry of data and error handlers for one stream.
pub struct Subscribers<T> {
    data: RwLock<Vec<DataHandler<T>>>,
    error: RwLock<Vec<ErrorHandler>>,
}

impl<T> Subscribers<T> {
    pub(crate) fn new() -> Self {
        Self {
            data: RwLock::new(Vec::new()),
            error: RwLock::new(Vec::new()),
        }
    }

    /// Register a handler for data events.
    pub fn on_data<F>(&self, handler: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.data.write() {
            handlers.push(Box::new(handler));
        }
    }

    /// Register a handler for error events.
    ///
    /// If a cycle fails while no error handler is registered, the failure is
    /// logged at `warn` and dropped; it never panics or aborts the stream.
    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&PollError) + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.error.write() {
            handlers.push(Box::new(handler));
        }
    }

    /// Number of registered data handlers.
    pub fn data_handler_count(&self) -> usize {
        self.data.read().map(|h| h.len()).unwrap_or(0)
    }

    /// Number of registered error handlers.
    pub fn error_handler_count(&self) -> usize {
        self.error.read().map(|h| h.len()).unwrap_or(0)
    }

    /// Dispatch one item to every data handler, in registration order.
    pub(crate) fn notify_data(&self, item: &T) {
        if let Ok(handlers) = self.data.read() {
            for handler in handlers.iter() {
                handler(item);
            }
        }
    }

    /// Dispatch one failure to every error handler, in registration order.
    pub(crate) fn notify_error(&self, error: &Arc<PollError>) {
        match self.error.read() {
            Ok(handlers) if handlers.is_empty() => {
                tracing::warn!("Unhandled poll error (no error handler registered): {}", error);
            }
            Ok(handlers) => {
                for handler in handlers.iter() {
                    handler(error);
                }
            }
            Err(_) => {
                tracing::warn!("Error handler registry poisoned, dropping: {}", error);
            }
        }
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}
