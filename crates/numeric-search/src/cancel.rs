//! Cooperative cancellation of the search loop.
//!
//! The solver polls its [`Cancellation`] exactly once per generation, after
//! the candidate has been evaluated. Implementations must not block.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Source of a stop request, polled once per generation.
pub trait Cancellation {
    /// Returns `true` when the search should stop.
    fn is_cancelled(&mut self) -> bool;
}

impl<C> Cancellation for &mut C
where
    C: Cancellation + ?Sized,
{
    fn is_cancelled(&mut self) -> bool {
        (**self).is_cancelled()
    }
}

/// `None` never cancels.
impl<C> Cancellation for Option<C>
where
    C: Cancellation,
{
    fn is_cancelled(&mut self) -> bool {
        self.as_mut().is_some_and(Cancellation::is_cancelled)
    }
}

/// Cancelled when either source is.
impl<A, B> Cancellation for (A, B)
where
    A: Cancellation,
    B: Cancellation,
{
    fn is_cancelled(&mut self) -> bool {
        self.0.is_cancelled() || self.1.is_cancelled()
    }
}

/// Flag that can be set from anywhere, including other threads.
///
/// Clones share the same flag.
///
/// # Example
///
/// ```
/// use numeric_search::cancel::{CancelToken, Cancellation as _};
///
/// let mut token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl Cancellation for CancelToken {
    fn is_cancelled(&mut self) -> bool {
        self.is_set()
    }
}

/// Stops the search after a fixed number of generations.
#[derive(Debug, Clone, Copy)]
pub struct GenerationLimit {
    remaining: u64,
}

impl GenerationLimit {
    #[must_use]
    pub fn new(generations: u64) -> Self {
        Self {
            remaining: generations,
        }
    }
}

impl Cancellation for GenerationLimit {
    fn is_cancelled(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_token_shared_across_threads() {
        let mut token = CancelToken::new();
        let handle = token.clone();
        thread::spawn(move || handle.cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_generation_limit_counts_polls() {
        let mut limit = GenerationLimit::new(3);
        assert!(!limit.is_cancelled());
        assert!(!limit.is_cancelled());
        assert!(limit.is_cancelled());
        assert!(limit.is_cancelled());
    }

    #[test]
    fn test_option_and_pair() {
        let mut none: Option<CancelToken> = None;
        assert!(!none.is_cancelled());

        let token = CancelToken::new();
        let mut pair = (GenerationLimit::new(10), Some(token.clone()));
        assert!(!pair.is_cancelled());
        token.cancel();
        assert!(pair.is_cancelled());
    }
}
