use crate::interpolate::interp;
use crate::morphs::morph::*;

use ndarray::Array1;

// roundoff tolerance for selecting bounds on arrays
const EPSILON: f64 = 1e-8;

macro_const! {
    const DOC: &str = r#"
Resample both curves onto a common r-grid

Configuration parameters: `rmin`, `rmax` (exclusive within a 1e-8
tolerance), `rstep`. Any of them that is unset, or less inclusive than what
the raw input grids support, is replaced by the natural bound from the data
(largest first point, smallest last point plus one native step, largest
native step) and the corrected value is written back to the configuration.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphRGrid {
    arrays: MorphArrays,
}

impl MorphRGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl_morph_props!(
    MorphRGrid,
    "Interpolate data onto specified grid",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_GR),
    ["rmin", "rmax", "rstep"],
);

impl MorphTrait for MorphRGrid {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;

        let actual = morph.len().min(target.len());
        if actual < 2 {
            return Err(MorphError::ShortCurve {
                actual,
                minimum: 2,
                morph: self.summary(),
            });
        }
        let step_morph = morph.x[1] - morph.x[0];
        let step_target = target.x[1] - target.x[0];
        let rmin_inc = morph.x[0].max(target.x[0]);
        let rmax_inc =
            (morph.x[morph.len() - 1] + step_morph).min(target.x[target.len() - 1] + step_target);
        let rstep_inc = step_morph.max(step_target);

        // widen toward inclusivity, never narrow below what the data supports
        let rmin = match config.get("rmin") {
            Some(value) if value >= rmin_inc => value,
            _ => rmin_inc,
        };
        let rmax = match config.get("rmax") {
            Some(value) if value <= rmax_inc => value,
            _ => rmax_inc,
        };
        let rstep = match config.get("rstep") {
            Some(value) if value >= rstep_inc => value,
            _ => rstep_inc,
        };
        config.set("rmin", rmin);
        config.set("rmax", rmax);
        config.set("rstep", rstep);

        // rmax stays exclusive within the roundoff tolerance
        let x_out = arange(rmin, rmax - EPSILON, rstep);
        let y_morph = interp(&x_out, &morph.x, &morph.y);
        let y_target = interp(&x_out, &target.x, &target.y);
        self.arrays.morph_out = Some(Curve::new(x_out.clone(), y_morph));
        self.arrays.target_out = Some(Curve::new(x_out, y_target));
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}

/// Evenly spaced values over the half-open interval `[start, stop)`.
fn arange(start: f64, stop: f64, step: f64) -> Array1<f64> {
    if stop <= start || step <= 0.0 {
        return Array1::zeros(0);
    }
    let n = ((stop - start) / step).ceil() as usize;
    Array1::from_iter((0..n).map(|i| start + i as f64 * step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    check_morph_props!(check_props, MorphRGrid);

    fn sine_pair() -> (Curve, Curve) {
        let x_morph = grid(0.0, 10.0, 0.01);
        let y_morph = x_morph.mapv(f64::sin);
        let x_target = grid(1.0, 5.0, 0.01);
        let y_target = x_target.mapv(f64::sin);
        (
            Curve::new(x_morph, y_morph),
            Curve::new(x_target, y_target),
        )
    }

    #[test]
    fn arange_excludes_stop() {
        let values = arange(0.0, 1.0, 0.25);
        all_close(values.as_slice().unwrap(), &[0.0, 0.25, 0.5, 0.75], 1e-12);
        assert_eq!(arange(1.0, 1.0, 0.1).len(), 0);
        assert_eq!(arange(0.0, -1.0, 0.1).len(), 0);
    }

    #[test]
    fn unset_config_takes_natural_bounds() {
        let (morph, target) = sine_pair();
        let mut config = MorphConfig::new();
        let mut rgrid = MorphRGrid::new();
        let (morph_out, target_out) = rgrid.morph(&mut config, &morph, &target).unwrap();

        // narrowest r-range covered by both curves, one common grid
        assert_eq!(config.get("rmin"), Some(1.0));
        assert!((config.get("rmax").unwrap() - 5.0).abs() < 1e-8);
        assert!((config.get("rstep").unwrap() - 0.01).abs() < 1e-12);
        assert_eq!(morph_out.x, target_out.x);
        assert_eq!(morph_out.first_x(), Some(1.0));
        assert!(morph_out.last_x().unwrap() < 5.0);
        all_close(
            morph_out.y.as_slice().unwrap(),
            &morph_out.x.mapv(f64::sin).to_vec(),
            1e-4,
        );
    }

    #[test]
    fn narrowing_within_bounds_is_kept() {
        let (morph, target) = sine_pair();
        let mut config = MorphConfig::new();
        config.set("rmin", 2.0);
        config.set("rmax", 4.0);
        config.set("rstep", 0.1);
        let mut rgrid = MorphRGrid::new();
        let (morph_out, _) = rgrid.morph(&mut config, &morph, &target).unwrap();

        assert_eq!(config.get("rmin"), Some(2.0));
        assert_eq!(config.get("rmax"), Some(4.0));
        assert_eq!(config.get("rstep"), Some(0.1));
        assert_eq!(morph_out.first_x(), Some(2.0));
        assert_eq!(morph_out.len(), 20);
    }

    #[test]
    fn widening_invariant() {
        // requested bounds more inclusive than the data get corrected back
        let (morph, target) = sine_pair();
        let mut config = MorphConfig::new();
        config.set("rmin", 0.0);
        config.set("rmax", 100.0);
        config.set("rstep", 0.001);
        let mut rgrid = MorphRGrid::new();
        rgrid.morph(&mut config, &morph, &target).unwrap();

        assert_eq!(config.get("rmin"), Some(1.0));
        assert!((config.get("rmax").unwrap() - 5.0).abs() < 1e-8);
        assert!((config.get("rstep").unwrap() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn idempotent_on_matching_grid() {
        let x = grid(1.0, 3.0, 0.25);
        let y = x.mapv(|v| v * v);
        let pair = Curve::new(x, y);
        let mut config = MorphConfig::new();
        config.set("rmin", 1.0);
        config.set("rmax", 3.0);
        config.set("rstep", 0.25);
        let mut rgrid = MorphRGrid::new();
        let (morph_out, target_out) = rgrid.morph(&mut config, &pair, &pair).unwrap();

        assert_eq!(config.get("rmin"), Some(1.0));
        assert_eq!(config.get("rmax"), Some(3.0));
        assert_eq!(config.get("rstep"), Some(0.25));
        assert_eq!(morph_out.len(), pair.len());
        all_close(
            morph_out.y.as_slice().unwrap(),
            pair.y.as_slice().unwrap(),
            1e-8,
        );
        all_close(
            target_out.y.as_slice().unwrap(),
            pair.y.as_slice().unwrap(),
            1e-8,
        );
    }

    #[test]
    fn too_short_curve_errors() {
        let short = Curve::new(Array1::from(vec![0.0]), Array1::from(vec![1.0]));
        let mut config = MorphConfig::new();
        let mut rgrid = MorphRGrid::new();
        let err = rgrid.morph(&mut config, &short, &short).unwrap_err();
        assert!(matches!(err, MorphError::ShortCurve { actual: 1, .. }));
    }
}
