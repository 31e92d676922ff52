use crate::morphs::morph::*;
use crate::morphs::shape::{coerce_non_negative, spherical_cf, spheroidal_cf};

use ndarray::Zip;

macro_const! {
    const ISPHERE_DOC: &str = r#"
Divide the morph by a spherical characteristic function

Configuration parameters: `iradius`, the sphere radius. Samples where the
characteristic function is zero (at and beyond the particle diameter) are
forced to zero instead of dividing by zero. A negative radius is coerced to
its magnitude and written back to the configuration.
"#;
}

#[doc = ISPHERE_DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphISphere {
    arrays: MorphArrays,
}

impl MorphISphere {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        ISPHERE_DOC
    }
}

impl_morph_props!(
    MorphISphere,
    "Apply inverse spherical characteristic function to morph",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_GR),
    ["iradius"],
);

impl MorphTrait for MorphISphere {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let iradius = config.require("iradius", self.summary())?;

        let psize = 2.0 * iradius;
        let factor = morph.x.mapv(|r| spherical_cf(r, psize));
        self.arrays.morph_out_mut().y = divide_guarded(&morph.y, &factor);
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }

    fn check_config(&self, config: &mut MorphConfig) -> Result<(), MorphError> {
        coerce_non_negative(config, "iradius");
        Ok(())
    }
}

macro_const! {
    const ISPHEROID_DOC: &str = r#"
Divide the morph by a spheroidal characteristic function

Configuration parameters: `iradius` (equatorial) and `ipradius` (polar).
Samples where the characteristic function is zero are forced to zero
instead of dividing by zero. Negative radii are coerced to their magnitudes
and written back to the configuration.
"#;
}

#[doc = ISPHEROID_DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphISpheroid {
    arrays: MorphArrays,
}

impl MorphISpheroid {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        ISPHEROID_DOC
    }
}

impl_morph_props!(
    MorphISpheroid,
    "Apply inverse spheroidal characteristic function to morph",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_GR),
    ["iradius", "ipradius"],
);

impl MorphTrait for MorphISpheroid {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let iradius = config.require("iradius", self.summary())?;
        let ipradius = config.require("ipradius", self.summary())?;

        let factor = morph.x.mapv(|r| spheroidal_cf(r, iradius, ipradius));
        self.arrays.morph_out_mut().y = divide_guarded(&morph.y, &factor);
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }

    fn check_config(&self, config: &mut MorphConfig) -> Result<(), MorphError> {
        coerce_non_negative(config, "iradius");
        coerce_non_negative(config, "ipradius");
        Ok(())
    }
}

fn divide_guarded(
    y: &ndarray::Array1<f64>,
    factor: &ndarray::Array1<f64>,
) -> ndarray::Array1<f64> {
    Zip::from(y)
        .and(factor)
        .map_collect(|&yi, &fi| if fi == 0.0 { 0.0 } else { yi / fi })
}
