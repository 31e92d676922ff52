//! Estimation and agreement helpers used around morphs and refinement.

use crate::error::RefineError;
use crate::refine::LeastSquares;
use crate::types::ArrayRef1;

use ndarray::{Array1, Zip};

/// Least-squares estimate of the scale that best matches the morph to the
/// target: `<m, t> / <m, m>`.
pub fn estimate_scale(y_morph: &ArrayRef1, y_target: &ArrayRef1) -> f64 {
    dot(y_morph, y_target) / dot(y_morph, y_morph)
}

/// Estimate the slope of the linear baseline of a PDF.
///
/// Fits `slope * r` through the bottom of the PDF over `[rmin, rmax]`
/// (either bound optional). Residuals are `gr - slope * r`, scaled by
/// `1 + 0.5 * p` where `p` is the squared norm of the negative residuals;
/// the asymmetric penalty pushes the line below the data instead of through
/// its middle.
///
/// If the PDF is scaled properly the result equals `-4 * pi * rho0` with
/// `rho0` the sample number density.
pub fn estimate_baseline_slope(
    r: &ArrayRef1,
    gr: &ArrayRef1,
    rmin: Option<f64>,
    rmax: Option<f64>,
) -> Result<f64, RefineError> {
    let lo = rmin.unwrap_or(f64::NEG_INFINITY);
    let hi = rmax.unwrap_or(f64::INFINITY);
    let selected: Vec<(f64, f64)> = r
        .iter()
        .zip(gr.iter())
        .filter(|&(&ri, _)| ri >= lo && ri <= hi)
        .map(|(&ri, &gi)| (ri, gi))
        .collect();
    let rp = Array1::from_iter(selected.iter().map(|&(ri, _)| ri));
    let grp = Array1::from_iter(selected.iter().map(|&(_, gi)| gi));

    let solver = LeastSquares::default();
    let solution = solver.solve(&[0.0], |pars| {
        let slope = pars[0];
        let mut chiv = Zip::from(&grp)
            .and(&rp)
            .map_collect(|&gi, &ri| gi - slope * ri);
        let negpenalty: f64 = chiv
            .iter()
            .filter(|&&v| v < 0.0)
            .map(|&v| v * v)
            .sum();
        chiv *= 1.0 + 0.5 * negpenalty;
        Ok(chiv)
    })?;
    Ok(solution.x[0])
}

/// Normalized sum-of-squared-residual agreement between the morphed and
/// target curves; zero for a perfect match.
pub fn rw(y_morph: &ArrayRef1, y_target: &ArrayRef1) -> f64 {
    let diff = Zip::from(y_target)
        .and(y_morph)
        .map_collect(|&t, &m| t - m);
    (dot(&diff, &diff) / dot(y_target, y_target)).sqrt()
}

/// Sample Pearson correlation coefficient of two equal-length arrays;
/// zero when either input is constant.
pub fn pearson(a: &ArrayRef1, b: &ArrayRef1) -> f64 {
    assert_eq!(a.len(), b.len(), "inputs must have the same length");
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    Zip::from(a).and(b).for_each(|&ai, &bi| {
        let da = ai - mean_a;
        let db = bi - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    });
    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        cov / denominator
    }
}

/// Magnitude of a radius-like user input, flagging whether the sign had to
/// be flipped so the caller can surface a warning.
pub fn nn_value(value: f64) -> (f64, bool) {
    (value.abs(), value < 0.0)
}

fn dot(a: &ArrayRef1, b: &ArrayRef1) -> f64 {
    Zip::from(a).and(b).fold(0.0, |acc, &x, &y| acc + x * y)
}
