use crate::interpolate::interp;
use crate::morphs::morph::*;

macro_const! {
    const DOC: &str = r#"
Stretch the morph along the r-axis

Configuration parameters: `stretch`. A feature at `r` moves to
`r * (1 + stretch)`; the morph is resampled back onto its own grid by
linear interpolation.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphStretch {
    arrays: MorphArrays,
}

impl MorphStretch {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl_morph_props!(
    MorphStretch,
    "Stretch morph by desired amount",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_GR),
    ["stretch"],
);

impl MorphTrait for MorphStretch {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let stretch = config.require("stretch", self.summary())?;
        if stretch == 0.0 {
            return Ok(self.arrays.outputs_cloned());
        }

        let r = morph.x.mapv(|x| x / (1.0 + stretch));
        self.arrays.morph_out_mut().y = interp(&r, &morph.x, &morph.y);
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    check_morph_props!(check_props, MorphStretch);

    #[test]
    fn zero_stretch_is_identity() {
        let x = grid(0.0, 5.0, 0.01);
        let curve = Curve::new(x.clone(), x.mapv(f64::sin));
        let mut config = MorphConfig::new();
        config.set("stretch", 0.0);
        let mut mstretch = MorphStretch::new();
        let (morph_out, _) = mstretch.morph(&mut config, &curve, &curve).unwrap();
        assert_eq!(morph_out, curve);
    }

    #[test]
    fn moves_peak_outward() {
        let x = grid(0.0, 10.0, 0.01);
        let peak = gaussian(&x, 4.0, 0.2);
        let morph = Curve::new(x.clone(), peak);
        let mut config = MorphConfig::new();
        config.set("stretch", 0.25);
        let mut mstretch = MorphStretch::new();
        let (morph_out, _) = mstretch.morph(&mut config, &morph, &morph).unwrap();

        // peak at 4.0 moves to 4.0 * 1.25 = 5.0
        let expected = gaussian(&x, 5.0, 0.2 * 1.25);
        all_close(
            morph_out.y.as_slice().unwrap(),
            expected.as_slice().unwrap(),
            1e-3,
        );
    }

    #[test]
    fn compression_moves_peak_inward() {
        let x = grid(0.0, 10.0, 0.01);
        let morph = Curve::new(x.clone(), gaussian(&x, 5.0, 0.2));
        let mut config = MorphConfig::new();
        config.set("stretch", -0.2);
        let mut mstretch = MorphStretch::new();
        let (morph_out, _) = mstretch.morph(&mut config, &morph, &morph).unwrap();

        let expected = gaussian(&x, 4.0, 0.2 * 0.8);
        all_close(
            morph_out.y.as_slice().unwrap(),
            expected.as_slice().unwrap(),
            1e-3,
        );
    }
}
