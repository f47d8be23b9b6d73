//! Shared fixed-point iteration with an iteration cap and tolerance.
//!
//! PageRank, eigenvector and Katz centrality all iterate `x_{k+1} = f(x_k)`
//! until the L1 change drops below `n * tolerance`. The cap is mandatory:
//! exhausting it yields [`AlgorithmError::ConvergenceFailure`] instead of a
//! partially converged vector.

use tracing::trace;

use crate::error::{AlgorithmError, Result};

/// Iteration cap and tolerance for power-method style algorithms.
///
/// # Examples
/// ```
/// use grafo_core::IterationControl;
///
/// let control = IterationControl::new(200, 1e-8);
/// assert_eq!(control.max_iterations(), 200);
/// assert_eq!(control.tolerance(), 1e-8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationControl {
    max_iterations: usize,
    tolerance: f64,
}

impl IterationControl {
    /// Creates a control with the given cap and tolerance.
    #[must_use]
    pub const fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Returns a copy with a different cap.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns a copy with a different tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Maximum number of iterations.
    #[must_use]
    #[rustfmt::skip]
    pub const fn max_iterations(&self) -> usize { self.max_iterations }

    /// Per-entry tolerance on the L1 change.
    #[must_use]
    #[rustfmt::skip]
    pub const fn tolerance(&self) -> f64 { self.tolerance }
}

impl Default for IterationControl {
    fn default() -> Self {
        Self::new(100, 1e-6)
    }
}

/// Converged vector and the number of iterations it took.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FixedPoint {
    pub(crate) values: Vec<f64>,
    pub(crate) iterations: usize,
}

/// Iterates `step(previous, next)` from `initial` until convergence.
///
/// `step` must overwrite every entry of `next`.
#[expect(
    clippy::cast_precision_loss,
    reason = "vector lengths stay far below 2^52"
)]
pub(crate) fn iterate_to_fixed_point<F>(
    algorithm: &'static str,
    initial: Vec<f64>,
    control: IterationControl,
    mut step: F,
) -> Result<FixedPoint>
where
    F: FnMut(&[f64], &mut [f64]),
{
    let threshold = initial.len() as f64 * control.tolerance;
    let mut current = initial;
    let mut next = vec![0.0; current.len()];
    for iteration in 1..=control.max_iterations {
        step(&current, &mut next);
        let delta: f64 = current
            .iter()
            .zip(&next)
            .map(|(old, new)| (old - new).abs())
            .sum();
        std::mem::swap(&mut current, &mut next);
        trace!(algorithm, iteration, delta, "fixed-point step");
        if delta < threshold {
            return Ok(FixedPoint {
                values: current,
                iterations: iteration,
            });
        }
    }
    Err(AlgorithmError::ConvergenceFailure {
        algorithm,
        iterations: control.max_iterations,
    })
}
