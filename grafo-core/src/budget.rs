//! Caller-imposed limits for exponential searches.
//!
//! Isomorphism, clique enumeration, k-colourability and Hamiltonian cycle
//! searches expand an explicit stack of frames. Each expansion ticks a
//! [`BudgetMeter`]; once the node cap or the deadline is exhausted the search
//! stops with [`AlgorithmError::SearchBudgetExceeded`] or
//! [`AlgorithmError::DeadlineExceeded`].

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{AlgorithmError, Result};

/// How often, in ticks, the wall clock is consulted.
const DEADLINE_STRIDE: u64 = 256;

/// Node and time limits for a single search.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use grafo_core::SearchBudget;
///
/// let budget = SearchBudget::nodes(10_000).with_deadline(Duration::from_millis(50));
/// assert_eq!(budget.max_nodes(), Some(10_000));
/// assert_eq!(budget.deadline(), Some(Duration::from_millis(50)));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchBudget {
    max_nodes: Option<u64>,
    deadline: Option<Duration>,
}

impl SearchBudget {
    /// Node cap applied by [`Default`].
    pub const DEFAULT_MAX_NODES: u64 = 1_000_000;

    /// Limits the search to `max_nodes` expanded frames.
    #[must_use]
    pub const fn nodes(max_nodes: u64) -> Self {
        Self {
            max_nodes: Some(max_nodes),
            deadline: None,
        }
    }

    /// Limits the search to a wall-clock duration only.
    #[must_use]
    pub const fn time(deadline: Duration) -> Self {
        Self {
            max_nodes: None,
            deadline: Some(deadline),
        }
    }

    /// Adds or replaces the node cap.
    #[must_use]
    pub const fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Adds or replaces the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the node cap.
    #[must_use]
    #[rustfmt::skip]
    pub const fn max_nodes(&self) -> Option<u64> { self.max_nodes }

    /// Returns the deadline measured from the start of the search.
    #[must_use]
    #[rustfmt::skip]
    pub const fn deadline(&self) -> Option<Duration> { self.deadline }

    pub(crate) fn start(self, algorithm: &'static str) -> BudgetMeter {
        let started = Instant::now();
        BudgetMeter {
            algorithm,
            max_nodes: self.max_nodes,
            deadline: self.deadline.and_then(|limit| started.checked_add(limit)),
            started,
            explored: 0,
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::nodes(Self::DEFAULT_MAX_NODES)
    }
}

/// Running counter for one search.
#[derive(Debug)]
pub(crate) struct BudgetMeter {
    algorithm: &'static str,
    max_nodes: Option<u64>,
    deadline: Option<Instant>,
    started: Instant,
    explored: u64,
}

impl BudgetMeter {
    /// Records one expanded frame.
    pub(crate) fn tick(&mut self) -> Result<()> {
        self.explored += 1;
        if self.max_nodes.is_some_and(|cap| self.explored > cap) {
            debug!(algorithm = self.algorithm, explored = self.explored, "search budget exhausted");
            return Err(AlgorithmError::SearchBudgetExceeded {
                algorithm: self.algorithm,
                explored: self.explored - 1,
            });
        }
        if self.explored % DEADLINE_STRIDE == 1 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    let elapsed_ms = self.started.elapsed().as_millis();
                    debug!(algorithm = self.algorithm, elapsed_ms, "search deadline expired");
                    return Err(AlgorithmError::DeadlineExceeded {
                        algorithm: self.algorithm,
                        elapsed_ms,
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) const fn explored(&self) -> u64 {
        self.explored
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::SearchBudget;
    use crate::error::AlgorithmError;

    #[rstest]
    fn node_cap_stops_after_limit() {
        let mut meter = SearchBudget::nodes(3).start("test");
        for _ in 0..3 {
            assert!(meter.tick().is_ok());
        }
        let err = meter.tick().expect_err("fourth tick exceeds the cap");
        assert_eq!(
            err,
            AlgorithmError::SearchBudgetExceeded {
                algorithm: "test",
                explored: 3
            }
        );
    }

    #[rstest]
    fn zero_deadline_expires_on_first_tick() {
        let mut meter = SearchBudget::time(Duration::ZERO).start("test");
        let err = meter.tick().expect_err("deadline already passed");
        assert!(matches!(err, AlgorithmError::DeadlineExceeded { algorithm: "test", .. }));
    }

    #[rstest]
    fn default_budget_caps_nodes() {
        assert_eq!(
            SearchBudget::default().max_nodes(),
            Some(SearchBudget::DEFAULT_MAX_NODES)
        );
        assert_eq!(SearchBudget::default().deadline(), None);
    }
}
