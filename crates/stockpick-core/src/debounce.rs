//! Quiet-interval filter turning raw keystrokes into a stable value.

use std::time::Duration;

use tokio::time::Instant;

/// Default quiet interval before a raw value becomes stable.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest raw value until no newer value has arrived for a full
/// interval.
///
/// Only one deadline exists at a time: every [`push`](Self::push) replaces
/// the pending value and restarts the wait.
#[derive(Debug, Clone)]
pub struct DebounceFilter<T> {
    interval: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> DebounceFilter<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Record a new raw value observed at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.interval));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Emit the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Wait for the pending value to settle.
    ///
    /// Never resolves while nothing is pending, so it can sit in a
    /// `tokio::select!` next to other event sources.
    pub async fn settled(&mut self) -> T {
        loop {
            match self.deadline() {
                Some(deadline) => {
                    tokio::time::sleep_until(deadline).await;
                    if let Some(value) = self.poll(Instant::now()) {
                        return value;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}

impl<T> Default for DebounceFilter<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
