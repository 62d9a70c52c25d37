//! Event types for the poll-stream crate.

use std::sync::Arc;

use crate::error::PollError;

/// Access to an item's creation timestamp.
///
/// The stream inspects nothing else about an item; payload shape is owned
/// by the poll source's contract. Timestamps are seconds since the Unix
/// epoch, fractional seconds allowed, as reported by the external source.
pub trait Timestamped {
    /// Creation time of this item, in seconds since the Unix epoch.
    fn created_utc(&self) -> f64;
}

/// The kind of an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A qualifying item produced by a poll cycle
    Data,
    /// A fetch failure produced by a poll cycle
    Error,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Data => write!(f, "data"),
            EventKind::Error => write!(f, "error"),
        }
    }
}

/// An event emitted by a polling event stream.
///
/// Errors are shared via `Arc` so the same failure value can be handed to
/// every registered handler and to the event channel without cloning the
/// underlying error.
#[derive(Debug, Clone)]
pub enum StreamEvent<T> {
    /// One qualifying item, in the order the source returned it
    Data(T),
    /// The failure value from a failed poll cycle
    Error(Arc<PollError>),
}

impl<T> StreamEvent<T> {
    /// Get the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            StreamEvent::Data(_) => EventKind::Data,
            StreamEvent::Error(_) => EventKind::Error,
        }
    }

    /// Borrow the item payload, if this is a data event.
    pub fn data(&self) -> Option<&T> {
        match self {
            StreamEvent::Data(item) => Some(item),
            StreamEvent::Error(_) => None,
        }
    }

    /// Borrow the failure payload, if this is an error event.
    pub fn error(&self) -> Option<&PollError> {
        match self {
            StreamEvent::Data(_) => None,
            StreamEvent::Error(err) => Some(err.as_ref()),
        }
    }
}
