use crate::morphs::morph::*;

macro_const! {
    const DOC: &str = r#"
Damp the morph with a Q-resolution envelope

Configuration parameters: `qdamp`. Multiplies the morph by the Gaussian
envelope `exp(-(r * qdamp)^2 / 2)` modeling the finite reciprocal-space
resolution of the measurement.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphResolutionDamping {
    arrays: MorphArrays,
}

impl MorphResolutionDamping {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl_morph_props!(
    MorphResolutionDamping,
    "Apply resolution damping to the morph",
    (LABEL_RA, LABEL_RR) -> (LABEL_RA, LABEL_RR),
    ["qdamp"],
);

impl MorphTrait for MorphResolutionDamping {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let qdamp = config.require("qdamp", self.summary())?;

        let envelope = morph.x.mapv(|r| f64::exp(-0.5 * (r * qdamp).powi(2)));
        self.arrays.morph_out_mut().y *= &envelope;
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}
