use crate::morphs::morph::*;

macro_const! {
    const DOC: &str = r#"
Scale the morph by a configured multiplicative factor

Configuration parameters: `scale`. Applied to the morph y-values only.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphScale {
    arrays: MorphArrays,
}

impl MorphScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl_morph_props!(
    MorphScale,
    "Scale morph by specified amount",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_GR),
    ["scale"],
);

impl MorphTrait for MorphScale {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let scale = config.require("scale", self.summary())?;
        self.arrays.morph_out_mut().y *= scale;
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}
