//! Damped fixed-point iteration.
//!
//! `x_{k+1} = x_k + ω·(G(x_k) − x_k)` until `max|G(x_k) − x_k| < tol` or the
//! iteration cap is reached. `G` is supplied by the caller; a failure of `G`
//! that [`SolverError::aborts_iteration`] stops the loop at the last stable
//! iterate instead of propagating.

use crate::error::{SolverError, SolverResult};
use nalgebra::DVector;
use tracing::{debug, warn};

/// Relaxed iteration configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxConfig {
    /// Maximum number of update evaluations
    pub max_iterations: usize,
    /// Convergence threshold on the largest absolute change
    pub tolerance: f64,
    /// Under-relaxation factor ω in (0, 1]
    pub relaxation: f64,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.01,
            relaxation: 0.5,
        }
    }
}

impl RelaxConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_iterations == 0 {
            return Err(hl_core::HlError::InvalidArg {
                what: "max_iterations must be at least 1",
            }
            .into());
        }
        hl_core::ensure_positive(self.tolerance, "tolerance")?;
        hl_core::ensure_positive(self.relaxation, "relaxation")?;
        if self.relaxation > 1.0 {
            return Err(hl_core::HlError::InvalidParameter {
                what: "relaxation",
                value: self.relaxation,
                reason: "must lie in (0, 1]",
            }
            .into());
        }
        Ok(())
    }
}

/// Iteration state machine.
///
/// `Iterating` is also the final state when the cap is reached without
/// meeting the tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum IterationState {
    Iterating,
    Converged,
    Aborted,
}

/// Result of a relaxed iteration.
#[derive(Clone, Debug)]
pub struct RelaxOutcome {
    /// Final iterate
    pub x: DVector<f64>,
    /// Number of update evaluations performed (equals the cap on non-convergence)
    pub iterations: usize,
    /// Terminal state
    pub state: IterationState,
    /// Largest absolute change per successful update
    pub history: Vec<f64>,
    /// Failure that stopped the loop, when `state == Aborted`
    pub abort_reason: Option<SolverError>,
}

impl RelaxOutcome {
    pub fn converged(&self) -> bool {
        self.state == IterationState::Converged
    }
}

/// Run a damped fixed-point iteration from `x0`.
///
/// `update` maps the current iterate to its undamped successor. On
/// convergence the undamped successor is returned; otherwise the damped one.
pub fn relaxed_fixed_point<G>(
    x0: DVector<f64>,
    mut update: G,
    config: &RelaxConfig,
) -> SolverResult<RelaxOutcome>
where
    G: FnMut(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    config.validate()?;

    let mut x = x0;
    let mut history = Vec::new();
    let mut state = IterationState::Iterating;
    let mut abort_reason = None;
    let mut iterations = 0;

    while state == IterationState::Iterating && iterations < config.max_iterations {
        iterations += 1;

        let solved = match update(&x) {
            Ok(solved) => solved,
            Err(e) if e.aborts_iteration() => {
                warn!(iteration = iterations, error = %e, "relaxed iteration aborted");
                state = IterationState::Aborted;
                abort_reason = Some(e);
                break;
            }
            Err(e) => return Err(e),
        };
        if solved.len() != x.len() {
            return Err(SolverError::DimensionMismatch {
                what: format!(
                    "update returned {} values for {} unknowns",
                    solved.len(),
                    x.len()
                ),
            });
        }

        let change = (&solved - &x).amax();
        history.push(change);
        debug!(iteration = iterations, max_change = change, "relaxed iteration");

        if change < config.tolerance {
            x = solved;
            state = IterationState::Converged;
        } else {
            x = &x + config.relaxation * (solved - &x);
        }
    }

    if state == IterationState::Iterating {
        warn!(
            iterations,
            last_change = history.last().copied().unwrap_or(f64::NAN),
            "relaxed iteration reached its cap without converging"
        );
    }

    Ok(RelaxOutcome {
        x,
        iterations,
        state,
        history,
        abort_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contraction_converges() {
        // G(x) = 0.5x + 1 has fixed point 2.
        let update = |x: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(x.map(|v| 0.5 * v + 1.0)) };
        let out = relaxed_fixed_point(DVector::from_element(1, 10.0), update, &RelaxConfig {
            tolerance: 1e-10,
            ..RelaxConfig::default()
        })
        .unwrap();

        assert!(out.converged());
        assert!((out.x[0] - 2.0).abs() < 1e-9);
        assert_eq!(out.history.len(), out.iterations);
    }

    #[test]
    fn cap_reached_reports_iterating() {
        // G(x) = x + 1 never settles.
        let update = |x: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(x.map(|v| v + 1.0)) };
        let config = RelaxConfig {
            max_iterations: 7,
            ..RelaxConfig::default()
        };
        let out = relaxed_fixed_point(DVector::zeros(2), update, &config).unwrap();

        assert_eq!(out.state, IterationState::Iterating);
        assert_eq!(out.iterations, 7);
        assert!((out.x[0] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn singular_update_aborts_with_last_iterate() {
        let mut calls = 0;
        let update = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            calls += 1;
            if calls == 3 {
                Err(SolverError::SingularSystem { dim: 1 })
            } else {
                Ok(x.map(|v| v + 4.0))
            }
        };
        let out = relaxed_fixed_point(DVector::zeros(1), update, &RelaxConfig::default()).unwrap();

        assert_eq!(out.state, IterationState::Aborted);
        assert_eq!(out.iterations, 3);
        assert!((out.x[0] - 4.0).abs() < 1e-12);
        assert_eq!(out.abort_reason, Some(SolverError::SingularSystem { dim: 1 }));
    }

    #[test]
    fn other_errors_propagate() {
        let update = |_: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Err(SolverError::DimensionMismatch {
                what: "test".to_string(),
            })
        };
        assert!(relaxed_fixed_point(DVector::zeros(1), update, &RelaxConfig::default()).is_err());
    }

    #[test]
    fn invalid_config_rejected() {
        let update = |x: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(x.clone()) };
        let config = RelaxConfig {
            relaxation: 1.5,
            ..RelaxConfig::default()
        };
        assert!(relaxed_fixed_point(DVector::zeros(1), update, &config).is_err());
    }
}
