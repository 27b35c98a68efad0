//! Deadlines and cancellation for the randomized searches.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag that asks running searches to stop early.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional wall-clock deadline plus an optional cancel token. The default
/// budget never runs out.
#[derive(Clone, Debug, Default)]
pub struct SearchBudget {
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn is_exhausted(&self) -> bool {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_budget_never_expires() {
        assert!(!SearchBudget::unlimited().is_exhausted());
    }

    #[test]
    fn cancel_token_is_shared() {
        let token = CancelToken::new();
        let budget = SearchBudget::unlimited().with_cancel(token.clone());
        assert!(!budget.is_exhausted());
        token.cancel();
        assert!(budget.is_exhausted());
    }

    #[test]
    fn past_deadline_is_exhausted() {
        let budget = SearchBudget::unlimited().with_deadline(Instant::now());
        assert!(budget.is_exhausted());
    }
}
