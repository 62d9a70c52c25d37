//! The poll source seam.
//!
//! A [`PollSource`] is the caller-supplied fetch operation: given its fixed
//! arguments, it asynchronously produces an ordered batch of timestamped
//! items or fails with an opaque error. The actual request it makes (HTTP,
//! database, anything) is entirely outside this crate's scope.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::future::Future;
use std::marker::PhantomData;

use crate::error::PollError;
use crate::event::Timestamped;

/// An asynchronous fetch operation polled on a fixed cadence.
///
/// Implementors capture their fixed call arguments at construction; the
/// stream invokes `poll` with no per-cycle inputs and never mutates the
/// source. At most one `poll` call is in flight at a time.
#[async_trait]
pub trait PollSource: Send + Sync + 'static {
    /// The item type this source produces.
    type Item: Timestamped + Send + 'static;

    /// Fetch the current batch of items.
    ///
    /// The returned order is preserved through event emission.
    async fn poll(&self) -> Result<Vec<Self::Item>, PollError>;
}

/// Adapter turning a closure plus a fixed argument value into a [`PollSource`].
///
/// The argument value is the Rust rendition of "fixed call arguments": it is
/// captured immutably at construction and a clone of it is passed to the
/// closure on every cycle. Bundle multiple arguments in a tuple or struct.
///
/// # Example
///
/// ```rust,ignore
/// let source = FnSource::new(("rust", 25u32), |(subreddit, limit)| async move {
///     fetch_new_posts(subreddit, limit).await.map_err(PollError::new)
/// });
/// ```
pub struct FnSource<A, T> {
    args: A,
    poll_fn: Box<dyn Fn(A) -> BoxFuture<'static, Result<Vec<T>, PollError>> + Send + Sync>,
    _item: PhantomData<fn() -> T>,
}

impl<A, T> FnSource<A, T>
where
    A: Clone + Send + Sync + 'static,
    T: Timestamped + Send + 'static,
{
    /// Create a source from fixed arguments and an async closure.
    pub fn new<F, Fut>(args: A, poll_fn: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, PollError>> + Send + 'static,
    {
        Self {
            args,
            poll_fn: Box::new(move |a| Box::pin(poll_fn(a))),
            _item: PhantomData,
        }
    }

    /// Borrow the fixed arguments this source was built with.
    pub fn args(&self) -> &A {
        &self.args
    }
}

#[async_trait]
impl<A, T> PollSource for FnSource<A, T>
where
    A: Clone + Send + Sync + 'static,
    T: Timestamped + Send + 'static,
{
    type Item = T;

    async fn poll(&self) -> Result<Vec<T>, PollError> {
        (self.poll_fn)(self.args.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct Item {
        created_utc: f64,
    }

    impl Timestamped for Item {
        fn created_utc(&self) -> f64 {
            self.created_utc
        }
    }

    #[tokio::test]
    async fn test_fn_source_passes_fixed_args() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_fn = Arc::clone(&calls);

        let source = FnSource::new(("rust", 25u32), move |(name, limit)| {
            let calls = Arc::clone(&calls_in_fn);
            async move {
                assert_eq!(name, "rust");
                assert_eq!(limit, 25);
                calls.fetch_add(1, Ordering::Relaxed);
                Ok(vec![Item { created_utc: 1.0 }])
            }
        });

        assert_eq!(source.args().0, "rust");

        let items = source.poll().await.unwrap();
        assert_eq!(items.len(), 1);

        // Same arguments on every invocation
        source.poll().await.unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_fn_source_relays_failure() {
        let source: FnSource<(), Item> =
            FnSource::new((), |_| async { Err(PollError::msg("boom")) });

        let err = source.poll().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
