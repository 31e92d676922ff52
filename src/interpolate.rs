//! Piecewise-linear interpolation onto arbitrary sample points.

use crate::types::ArrayRef1;

use ndarray::Array1;

/// Interpolate `(xp, fp)` at the points `x`.
///
/// `xp` must be ascending and non-empty, with `fp` of the same length.
/// Points outside `[xp[0], xp[last]]` clamp to the boundary values.
pub fn interp(x: &ArrayRef1, xp: &ArrayRef1, fp: &ArrayRef1) -> Array1<f64> {
    assert!(!xp.is_empty(), "interpolation grid must be non-empty");
    assert_eq!(xp.len(), fp.len(), "grid and values must have the same length");
    Array1::from_iter(x.iter().map(|&xi| interp_one(xi, xp, fp)))
}

fn interp_one(xi: f64, xp: &ArrayRef1, fp: &ArrayRef1) -> f64 {
    let n = xp.len();
    if xi <= xp[0] {
        return fp[0];
    }
    if xi >= xp[n - 1] {
        return fp[n - 1];
    }
    // invariant: xp[lo] <= xi < xp[hi]
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if xp[mid] <= xi {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let t = (xi - xp[lo]) / (xp[hi] - xp[lo]);
    fp[lo] + t * (fp[hi] - fp[lo])
}
