//! Least-squares refinement of morph chain parameters.

pub mod least_squares;
pub use least_squares::{LeastSquares, Solution};

use crate::curve::Curve;
use crate::error::RefineError;
use crate::morphs::MorphChain;
use crate::tools;
use crate::types::ArrayRef1;

use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};

/// Residual strategy minimized by [Refiner::refine].
///
/// Every variant maps the chain's output curves to a residual vector with a
/// fixed signature, so strategies are swappable without touching the
/// refiner.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Residual {
    /// Elementwise `y_target - y_morph`.
    #[default]
    Difference,
    /// Constant vector `exp(-pcc)` where `pcc` is the Pearson correlation
    /// of the output curves; minimal when the correlation is largest.
    /// Insensitive to scale by construction.
    Pearson,
    /// Concatenation of [Residual::Difference] and [Residual::Pearson],
    /// trading off shape match and correlation match simultaneously.
    DifferencePlusPearson,
}

impl Residual {
    fn evaluate(&self, y_morph: &ArrayRef1, y_target: &ArrayRef1) -> Array1<f64> {
        match self {
            Self::Difference => Zip::from(y_target)
                .and(y_morph)
                .map_collect(|&t, &m| t - m),
            Self::Pearson => {
                let pcc = tools::pearson(y_morph, y_target);
                Array1::from_elem(y_morph.len(), f64::exp(-pcc))
            }
            Self::DifferencePlusPearson => {
                let difference = Self::Difference.evaluate(y_morph, y_target);
                let pearson = Self::Pearson.evaluate(y_morph, y_target);
                Array1::from_iter(difference.iter().chain(pearson.iter()).copied())
            }
        }
    }
}

/// Refines the parameters of a [MorphChain] against a fixed target curve.
///
/// The refiner owns the chain and the two input curves; each call to
/// [refine](Refiner::refine) reads the current configuration values as its
/// initial guess and writes the solved values back, so staged refinement is
/// a sequence of calls with different parameter subsets on the same
/// refiner.
///
/// Not safe for concurrent use: intermediate per-call arrays live on the
/// chain elements.
#[derive(Clone, Debug)]
pub struct Refiner {
    chain: MorphChain,
    morph_in: Curve,
    target_in: Curve,
    residual: Residual,
    solver: LeastSquares,
    pars: Vec<String>,
}

impl Refiner {
    pub fn new(chain: MorphChain, morph_in: Curve, target_in: Curve) -> Self {
        Self {
            chain,
            morph_in,
            target_in,
            residual: Residual::default(),
            solver: LeastSquares::default(),
            pars: Vec::new(),
        }
    }

    pub fn with_residual(mut self, residual: Residual) -> Self {
        self.residual = residual;
        self
    }

    pub fn set_residual(&mut self, residual: Residual) {
        self.residual = residual;
    }

    pub fn residual(&self) -> Residual {
        self.residual
    }

    pub fn solver(&self) -> &LeastSquares {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut LeastSquares {
        &mut self.solver
    }

    pub fn chain(&self) -> &MorphChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut MorphChain {
        &mut self.chain
    }

    pub fn into_chain(self) -> MorphChain {
        self.chain
    }

    /// Parameter subset used by the most recent refine call.
    pub fn pars(&self) -> &[String] {
        &self.pars
    }

    /// Refine the given parameter subset; an empty `names` refines every
    /// parameter the chain declares.
    pub fn refine(&mut self, names: &[&str]) -> Result<f64, RefineError> {
        self.refine_with(names, &[])
    }

    /// Like [refine](Refiner::refine), but first seeds the configuration
    /// with explicit starting values, refined or not.
    ///
    /// Returns the sum of squared final residuals. Refining zero parameters
    /// is a no-op returning `0.0`. On any error the configuration is left
    /// exactly as it was after seeding; solved values are written back only
    /// on success.
    pub fn refine_with(
        &mut self,
        names: &[&str],
        seeds: &[(&str, f64)],
    ) -> Result<f64, RefineError> {
        let pars: Vec<String> = if names.is_empty() {
            self.chain
                .par_names()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            names.iter().map(|name| name.to_string()).collect()
        };

        for &(name, value) in seeds {
            self.chain.config_mut().set(name, value);
        }

        self.pars = pars.clone();
        if pars.is_empty() {
            return Ok(0.0);
        }

        let initial: Vec<f64> = pars
            .iter()
            .map(|name| self.chain.config().require(name, "refine"))
            .collect::<Result<_, _>>()?;
        let snapshot = self.chain.config().clone();

        let Self {
            chain,
            morph_in,
            target_in,
            residual,
            solver,
            ..
        } = self;
        let result = solver.solve(&initial, |pvals| {
            chain
                .config_mut()
                .update(pars.iter().cloned().zip(pvals.iter().copied()));
            let (morph_out, target_out) = chain.apply(morph_in, target_in)?;
            Ok(residual.evaluate(&morph_out.y, &target_out.y))
        });

        match result {
            Ok(solution) => {
                chain
                    .config_mut()
                    .update(pars.into_iter().zip(solution.x.iter().copied()));
                // leave the chain applied at the solution
                match chain.apply(morph_in, target_in) {
                    Ok((morph_out, target_out)) => {
                        let fvec = residual.evaluate(&morph_out.y, &target_out.y);
                        Ok(fvec.iter().map(|&v| v * v).sum())
                    }
                    Err(err) => {
                        *chain.config_mut() = snapshot;
                        Err(err.into())
                    }
                }
            }
            Err(err) => {
                *chain.config_mut() = snapshot;
                Err(err)
            }
        }
    }
}
