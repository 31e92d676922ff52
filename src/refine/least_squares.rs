use crate::error::{MorphError, RefineError};

use nalgebra::{DMatrix, DVector};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

// damping beyond this means no damped step can improve the residual
const LAMBDA_MAX: f64 = 1e12;
const LAMBDA_MIN: f64 = 1e-12;

/// Levenberg-Marquardt non-linear least-squares solver
///
/// Minimizes the squared norm of a residual vector over a parameter vector,
/// using a forward-difference Jacobian and the multiplicatively damped
/// normal equations `(J^T J + lambda diag(J^T J)) delta = J^T f`. The
/// damping factor shrinks on accepted steps and grows on rejected ones.
///
/// The iteration budget is a hard bound: exceeding it surfaces as
/// [RefineError::IterationLimit] rather than silently returning the best
/// point seen so far.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeastSquares {
    /// Maximum number of accepted Jacobian iterations.
    pub max_iterations: usize,
    /// Relative tolerance on the decrease of the squared residual norm.
    pub ftol: f64,
    /// Relative tolerance on the parameter step.
    pub xtol: f64,
    /// Initial damping factor.
    pub lambda_init: f64,
    /// Factor applied to the damping on a rejected step.
    pub lambda_up: f64,
    /// Factor applied to the damping on an accepted step.
    pub lambda_down: f64,
    /// Relative step for the forward-difference Jacobian.
    pub fd_step: f64,
}

impl LeastSquares {
    /// Create a new [LeastSquares].
    ///
    /// # Arguments
    /// - `max_iterations`: iteration budget, must be positive
    /// - `ftol`: relative chi-square decrease below which the fit converged
    /// - `xtol`: relative parameter step below which the fit converged
    pub fn new(max_iterations: usize, ftol: f64, xtol: f64) -> Self {
        assert!(max_iterations > 0, "max_iterations must be positive");
        assert!(ftol >= 0.0 && ftol.is_finite(), "ftol must be non-negative");
        assert!(xtol >= 0.0 && xtol.is_finite(), "xtol must be non-negative");
        Self {
            max_iterations,
            ftol,
            xtol,
            lambda_init: Self::default_lambda_init(),
            lambda_up: Self::default_lambda_up(),
            lambda_down: Self::default_lambda_down(),
            fd_step: Self::default_fd_step(),
        }
    }

    #[inline]
    pub fn default_max_iterations() -> usize {
        100
    }

    /// Square root of the f64 machine epsilon, like the classic MINPACK
    /// default.
    #[inline]
    pub fn default_ftol() -> f64 {
        1.49e-8
    }

    #[inline]
    pub fn default_xtol() -> f64 {
        1.49e-8
    }

    #[inline]
    pub fn default_lambda_init() -> f64 {
        1e-3
    }

    #[inline]
    pub fn default_lambda_up() -> f64 {
        10.0
    }

    #[inline]
    pub fn default_lambda_down() -> f64 {
        0.1
    }

    #[inline]
    pub fn default_fd_step() -> f64 {
        1.49e-8
    }

    /// Minimize `residual` starting from `x0`.
    ///
    /// The residual callback may fail (e.g. a missing configuration
    /// parameter); its error aborts the solve and propagates.
    pub fn solve<F>(&self, x0: &[f64], mut residual: F) -> Result<Solution, RefineError>
    where
        F: FnMut(&[f64]) -> Result<Array1<f64>, MorphError>,
    {
        let npars = x0.len();
        assert!(npars > 0, "at least one parameter is required");

        let mut x = x0.to_vec();
        let mut fvec = residual(&x)?;
        let mut chi2 = sum_squares(&fvec);
        if chi2 == 0.0 {
            return Ok(Solution {
                x,
                fvec,
                chi2,
                iterations: 0,
            });
        }

        let mut lambda = self.lambda_init;
        for iteration in 0..self.max_iterations {
            let jacobian = self.jacobian(&x, &fvec, &mut residual)?;
            let jtj = jacobian.transpose() * &jacobian;
            let f = DVector::from_iterator(fvec.len(), fvec.iter().copied());
            let jtf = jacobian.transpose() * f;

            loop {
                let mut damped = jtj.clone();
                for i in 0..npars {
                    damped[(i, i)] += lambda * jtj[(i, i)];
                }
                let Some(cholesky) = damped.cholesky() else {
                    lambda *= self.lambda_up;
                    if lambda > LAMBDA_MAX {
                        return Err(RefineError::SingularJacobian { iteration });
                    }
                    continue;
                };
                let delta = cholesky.solve(&jtf);

                let x_trial: Vec<f64> = x
                    .iter()
                    .zip(delta.iter())
                    .map(|(&xi, &di)| xi - di)
                    .collect();
                let fvec_trial = residual(&x_trial)?;
                let chi2_trial = sum_squares(&fvec_trial);

                if chi2_trial.is_finite() && chi2_trial < chi2 {
                    let df = chi2 - chi2_trial;
                    let small_step = x
                        .iter()
                        .zip(delta.iter())
                        .all(|(&xi, &di)| di.abs() <= self.xtol * (xi.abs() + self.xtol));
                    x = x_trial;
                    fvec = fvec_trial;
                    chi2 = chi2_trial;
                    lambda = (lambda * self.lambda_down).max(LAMBDA_MIN);
                    if df <= self.ftol * chi2.max(f64::MIN_POSITIVE) || small_step {
                        return Ok(Solution {
                            x,
                            fvec,
                            chi2,
                            iterations: iteration + 1,
                        });
                    }
                    break;
                }

                lambda *= self.lambda_up;
                if lambda > LAMBDA_MAX {
                    // no damped step improves the residual: a local minimum
                    return Ok(Solution {
                        x,
                        fvec,
                        chi2,
                        iterations: iteration + 1,
                    });
                }
            }
        }
        Err(RefineError::IterationLimit {
            limit: self.max_iterations,
        })
    }

    fn jacobian<F>(
        &self,
        x: &[f64],
        fvec: &Array1<f64>,
        residual: &mut F,
    ) -> Result<DMatrix<f64>, RefineError>
    where
        F: FnMut(&[f64]) -> Result<Array1<f64>, MorphError>,
    {
        let nsamples = fvec.len();
        let mut jacobian = DMatrix::zeros(nsamples, x.len());
        let mut x_step = x.to_vec();
        for j in 0..x.len() {
            let step = self.fd_step * x[j].abs().max(1.0);
            x_step[j] = x[j] + step;
            let fvec_step = residual(&x_step)?;
            x_step[j] = x[j];
            for i in 0..nsamples {
                jacobian[(i, j)] = (fvec_step[i] - fvec[i]) / step;
            }
        }
        Ok(jacobian)
    }
}

impl Default for LeastSquares {
    fn default() -> Self {
        Self::new(
            Self::default_max_iterations(),
            Self::default_ftol(),
            Self::default_xtol(),
        )
    }
}

/// Result of a successful least-squares solve.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Solved parameter vector, in the order of the initial guess.
    pub x: Vec<f64>,
    /// Residual vector at the solution.
    pub fvec: Array1<f64>,
    /// Sum of squared residuals at the solution.
    pub chi2: f64,
    /// Accepted iterations performed.
    pub iterations: usize,
}

fn sum_squares(fvec: &Array1<f64>) -> f64 {
    fvec.iter().map(|&v| v * v).sum()
}
