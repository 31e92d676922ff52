use crate::morphs::morph::*;

macro_const! {
    const SPHERE_DOC: &str = r#"
Attenuate the morph with a spherical characteristic function

Configuration parameters: `radius`, the sphere radius. A negative radius is
coerced to its magnitude and written back to the configuration.

The characteristic function follows Kodama et al., Acta Cryst. A 62,
444-453, expressed in the particle diameter.
"#;
}

#[doc = SPHERE_DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphSphere {
    arrays: MorphArrays,
}

impl MorphSphere {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        SPHERE_DOC
    }
}

impl_morph_props!(
    MorphSphere,
    "Apply spherical characteristic function to morph",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_GR),
    ["radius"],
);

impl MorphTrait for MorphSphere {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let radius = config.require("radius", self.summary())?;

        let psize = 2.0 * radius;
        let factor = morph.x.mapv(|r| spherical_cf(r, psize));
        self.arrays.morph_out_mut().y *= &factor;
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }

    fn check_config(&self, config: &mut MorphConfig) -> Result<(), MorphError> {
        coerce_non_negative(config, "radius");
        Ok(())
    }
}

macro_const! {
    const SPHEROID_DOC: &str = r#"
Attenuate the morph with a spheroidal characteristic function

Configuration parameters: `radius` (equatorial) and `pradius` (polar).
Negative radii are coerced to their magnitudes and written back to the
configuration.

The characteristic function follows Lei et al., Phys. Rev. B 80, 024118
(2009): prolate for `pradius < radius`, oblate for `pradius > radius`,
reducing to the sphere when they are equal.
"#;
}

#[doc = SPHEROID_DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphSpheroid {
    arrays: MorphArrays,
}

impl MorphSpheroid {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        SPHEROID_DOC
    }
}

impl_morph_props!(
    MorphSpheroid,
    "Apply spheroidal characteristic function to morph",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_GR),
    ["radius", "pradius"],
);

impl MorphTrait for MorphSpheroid {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let radius = config.require("radius", self.summary())?;
        let pradius = config.require("pradius", self.summary())?;

        let factor = morph.x.mapv(|r| spheroidal_cf(r, radius, pradius));
        self.arrays.morph_out_mut().y *= &factor;
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }

    fn check_config(&self, config: &mut MorphConfig) -> Result<(), MorphError> {
        coerce_non_negative(config, "radius");
        coerce_non_negative(config, "pradius");
        Ok(())
    }
}

/// Sign is ambiguous user input for radius-like parameters; keep the
/// magnitude instead of failing.
pub(super) fn coerce_non_negative(config: &mut MorphConfig, name: &str) {
    if let Some(value) = config.get(name) {
        if value < 0.0 {
            config.set(name, -value);
        }
    }
}

/// Spherical nanoparticle characteristic function for particle diameter
/// `psize`, zero beyond the particle and for non-positive diameters.
pub(super) fn spherical_cf(r: f64, psize: f64) -> f64 {
    if psize <= 0.0 {
        return 0.0;
    }
    let x = r / psize;
    if x > 1.0 {
        // zero atomic density outside the particle
        0.0
    } else {
        1.0 - 1.5 * x + 0.5 * x * x * x
    }
}

/// Spheroidal nanoparticle characteristic function for a spheroid with
/// radii `(erad, erad, prad)`.
///
/// `prad < erad` is prolate, `prad > erad` oblate, equal radii reduce to
/// the sphere.
pub(super) fn spheroidal_cf(r: f64, erad: f64, prad: f64) -> f64 {
    let psize = 2.0 * erad;
    if psize <= 0.0 || prad <= 0.0 {
        return 0.0;
    }

    // to simplify the equations
    let v = prad / erad;
    let d = psize;
    let d2 = d * d;
    let v2 = v * v;

    if v == 1.0 {
        return spherical_cf(r, psize);
    }

    let r2 = r * r;
    if v < 1.0 {
        // prolate spheroid
        if r <= v * d {
            1.0 - 3.0 * r / (4.0 * d * v) * (1.0 - r2 / (4.0 * d2) * (1.0 + 2.0 / (3.0 * v2)))
                - 3.0 * r / (4.0 * d)
                    * (1.0 - r2 / (4.0 * d2))
                    * (v / (1.0 - v2).sqrt())
                    * (1.0 - v2).sqrt().atanh()
        } else if r <= d {
            (3.0 * d / (8.0 * r) * (1.0 + r2 / (2.0 * d2)) * (1.0 - r2 / d2).sqrt()
                - 3.0 * r / (4.0 * d) * (1.0 - r2 / (4.0 * d2)) * (1.0 - r2 / d2).sqrt().atanh())
                * (v / (1.0 - v2).sqrt())
        } else {
            0.0
        }
    } else {
        // oblate spheroid
        if r <= d {
            1.0 - 3.0 * r / (4.0 * d * v) * (1.0 - r2 / (4.0 * d2) * (1.0 + 2.0 / (3.0 * v2)))
                - 3.0 * r / (4.0 * d)
                    * (1.0 - r2 / (4.0 * d2))
                    * (v / (v2 - 1.0).sqrt())
                    * (v2 - 1.0).sqrt().atan()
        } else if r <= v * d {
            1.0 - 3.0 * r / (4.0 * d * v) * (1.0 - r2 / (4.0 * d2) * (1.0 + 2.0 / (3.0 * v2)))
                - 3.0 / 8.0
                    * (1.0 + r2 / (2.0 * d2))
                    * (1.0 - d2 / r2).sqrt()
                    * (v / (v2 - 1.0).sqrt())
                - 3.0 * r / (4.0 * d)
                    * (1.0 - r2 / (4.0 * d2))
                    * (v / (v2 - 1.0).sqrt())
                    * ((v2 - 1.0).sqrt().atan() - (r2 / d2 - 1.0).sqrt().atan())
        } else {
            0.0
        }
    }
}
