use crate::error::{DownloadError, Result};
use std::ops::ControlFlow;

/// Number of additional attempts after the first one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryBudget(pub u32);

impl RetryBudget {
    /// Total attempts allowed.
    pub fn attempts(&self) -> u32 {
        self.0.saturating_add(1)
    }
}

impl From<u32> for RetryBudget {
    fn from(retries: u32) -> Self {
        RetryBudget(retries)
    }
}

/// Run `attempt` for attempt numbers `1..=budget.attempts()`.
///
/// `Break` ends the loop with its result. `Continue` carries a retryable error,
/// returned once the budget is spent.
pub(crate) fn with_retries<T, F>(budget: RetryBudget, mut attempt: F) -> Result<T>
where
    F: FnMut(u32) -> ControlFlow<Result<T>, DownloadError>,
{
    let attempts = budget.attempts();
    let mut n = 1;
    loop {
        match attempt(n) {
            ControlFlow::Break(result) => return result,
            ControlFlow::Continue(e) if n >= attempts => return Err(e),
            ControlFlow::Continue(e) => {
                warn!("attempt {}/{} failed: {}", n, attempts, e);
                n += 1;
            }
        }
    }
}
