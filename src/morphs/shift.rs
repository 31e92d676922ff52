use crate::interpolate::interp;
use crate::morphs::morph::*;

macro_const! {
    const DOC: &str = r#"
Shift the morph horizontally and/or vertically

Configuration parameters: `hshift`, `vshift`; either may be left unset and
defaults to zero. A horizontal shift can introduce edge effects, since the
morph does not know what lies beyond the edge of the signal.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphShift {
    arrays: MorphArrays,
}

impl MorphShift {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl_morph_props!(
    MorphShift,
    "Shift morph by specified amount",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_GR),
    ["hshift", "vshift"],
);

impl MorphTrait for MorphShift {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let hshift = config.get("hshift").unwrap_or(0.0);
        let vshift = config.get("vshift").unwrap_or(0.0);

        let r = morph.x.mapv(|x| x - hshift);
        let mut y = interp(&r, &morph.x, &morph.y);
        y += vshift;
        self.arrays.morph_out_mut().y = y;
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}
