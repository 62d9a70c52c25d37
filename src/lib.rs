//! # poll-stream
//!
//! A micro-crate for turning a recurring asynchronous fetch into a stream of
//! discrete events, with timestamp filtering and a latency-absorbing cadence.
//!
//! ## Overview
//!
//! Given a poll interval and a fetch operation, a [`PollingEventStream`]
//! repeatedly invokes the operation, emits each returned item created at or
//! after the moment the cycle began, and relays any fetch failure as an
//! error event. The stream tolerates failures by logging and continuing; the
//! next regularly scheduled cycle is the retry.
//!
//! ## Key Behaviors
//!
//! - **Auto-start**: construction starts the stream; `start()`/`stop()` are
//!   exposed for explicit control
//! - **One fetch in flight**: the next cycle is scheduled only after the
//!   current fetch settles, so polls never overlap
//! - **Constant cadence**: the wait after a fetch is
//!   `max(interval - elapsed, 0)`, measured from cycle start to cycle start
//! - **Timestamp cutoff**: items created before the cycle began are
//!   discarded as already seen
//! - **Cooperative stop**: the stopped flag is checked only at cycle
//!   boundaries; an in-flight fetch completes and its events still emit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use poll_stream::prelude::*;
//!
//! // Poll every 30 seconds, passing the same fixed arguments each time
//! let stream = PollingEventStream::from_fn(
//!     Duration::from_secs(30),
//!     ("rust", 25u32),
//!     |(subreddit, limit)| async move {
//!         fetch_new_posts(subreddit, limit).await.map_err(PollError::new)
//!     },
//! )?;
//!
//! stream.on_data(|post| println!("new post: {}", post.title));
//! stream.on_error(|err| eprintln!("poll failed: {err}"));
//!
//! // Or consume events from blocking code instead of handlers
//! for event in stream.iter() {
//!     match event {
//!         StreamEvent::Data(post) => println!("new post: {}", post.title),
//!         StreamEvent::Error(err) => eprintln!("poll failed: {err}"),
//!     }
//! }
//! ```
//!
//! ## Error Policy
//!
//! A fetch failure is delivered once per failed cycle on the error channel
//! and never raised into the caller's control flow. If no error handler is
//! registered when a failure arrives, it is logged at `warn` via `tracing`
//! and dropped; registering a handler is recommended.
//!
//! A fetch that never settles stalls the stream indefinitely, since the next
//! cycle cannot be scheduled until the current one completes. Sources that
//! can hang should enforce their own timeouts.

pub mod config;
pub mod error;
pub mod event;
pub mod iter;
pub mod source;
pub mod stream;
pub mod subscribers;

// Re-export main types for convenience
pub use config::StreamConfig;
pub use error::{PollError, Result, StreamError};
pub use event::{EventKind, StreamEvent, Timestamped};
pub use iter::EventIterator;
pub use source::{FnSource, PollSource};
pub use stream::{PollingEventStream, StreamStats};

/// Prelude module for convenient imports
///
/// Use this to import the most commonly used types and traits:
///
/// ```rust
/// use poll_stream::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        EventIterator, EventKind, FnSource, PollError, PollSource, PollingEventStream, Result,
        StreamConfig, StreamError, StreamEvent, StreamStats, Timestamped,
    };
}
