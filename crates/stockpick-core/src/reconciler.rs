use tracing::info;

use crate::SourceError;

/// Lifecycle of the result area for the active stable query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilerState {
    /// No stable value has been computed yet.
    Idle,
    Loading,
    Loaded,
    Empty,
    Failed(SourceError),
}

/// Whether an observed stable value started a new query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTransition {
    Unchanged,
    Changed { previous: Option<String> },
}

/// Tracks stable-query transitions and the state they lead to.
#[derive(Debug, Clone)]
pub struct QueryReconciler {
    stable_value: Option<String>,
    state: ReconcilerState,
}

impl Default for QueryReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryReconciler {
    pub const fn new() -> Self {
        Self {
            stable_value: None,
            state: ReconcilerState::Idle,
        }
    }

    pub const fn state(&self) -> &ReconcilerState {
        &self.state
    }

    /// The active stable value, or `""` before the first one settles.
    pub fn stable_value(&self) -> &str {
        self.stable_value.as_deref().unwrap_or_default()
    }

    pub fn has_stable_value(&self) -> bool {
        self.stable_value.is_some()
    }

    /// Observe a settled value. A change moves the machine to `Loading`; the
    /// caller is expected to reset pagination and the store.
    pub fn observe(&mut self, value: &str) -> QueryTransition {
        if self.stable_value.as_deref() == Some(value) {
            return QueryTransition::Unchanged;
        }

        let previous = self.stable_value.replace(value.to_owned());
        info!(
            previous = previous.as_deref().unwrap_or_default(),
            current = value,
            "stable query changed"
        );
        self.state = ReconcilerState::Loading;
        QueryTransition::Changed { previous }
    }

    /// A page was applied; `total` is the store size afterwards.
    pub fn on_page(&mut self, total: usize) {
        self.state = if total == 0 {
            ReconcilerState::Empty
        } else {
            ReconcilerState::Loaded
        };
    }

    pub fn on_failure(&mut self, error: SourceError) {
        self.state = ReconcilerState::Failed(error);
    }

    /// A retry or load-more left the failed state.
    pub fn on_retry(&mut self, total: usize) {
        if matches!(self.state, ReconcilerState::Failed(_)) {
            self.state = if total == 0 {
                ReconcilerState::Loading
            } else {
                ReconcilerState::Loaded
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_without_stable_value() {
        let reconciler = QueryReconciler::new();
        assert_eq!(reconciler.state(), &ReconcilerState::Idle);
        assert_eq!(reconciler.stable_value(), "");
        assert!(!reconciler.has_stable_value());
    }

    #[test]
    fn first_value_is_a_change_even_when_empty() {
        let mut reconciler = QueryReconciler::new();
        assert_eq!(
            reconciler.observe(""),
            QueryTransition::Changed { previous: None }
        );
        assert_eq!(reconciler.state(), &ReconcilerState::Loading);
    }

    #[test]
    fn repeated_value_is_unchanged() {
        let mut reconciler = QueryReconciler::new();
        reconciler.observe("AAPL");
        reconciler.on_page(3);

        assert_eq!(reconciler.observe("AAPL"), QueryTransition::Unchanged);
        assert_eq!(reconciler.state(), &ReconcilerState::Loaded);
    }

    #[test]
    fn transitions_follow_page_outcomes() {
        let mut reconciler = QueryReconciler::new();
        reconciler.observe("zzz");
        reconciler.on_page(0);
        assert_eq!(reconciler.state(), &ReconcilerState::Empty);

        assert_eq!(
            reconciler.observe("AAPL"),
            QueryTransition::Changed {
                previous: Some(String::from("zzz"))
            }
        );
        reconciler.on_failure(SourceError::unavailable("down"));
        assert!(matches!(reconciler.state(), ReconcilerState::Failed(_)));

        reconciler.on_retry(0);
        assert_eq!(reconciler.state(), &ReconcilerState::Loading);
    }
}
