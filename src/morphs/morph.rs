pub(super) use crate::config::MorphConfig;
pub(super) use crate::curve::Curve;
pub(super) use crate::error::MorphError;
pub(super) use macro_const::macro_const;

use enum_dispatch::enum_dispatch;

/// Axis label for an r-grid.
pub const LABEL_RA: &str = "r (A)";
/// Axis label for a PDF G(r).
pub const LABEL_GR: &str = "G (1/A^2)";
/// Axis label for an RDF R(r).
pub const LABEL_RR: &str = "R (1/A)";

/// Last-seen input and output curve pairs of a morph.
///
/// Every invocation records the inputs and seeds the outputs with identity
/// copies before the morph body runs; fields are `None` until the first
/// invocation.
#[derive(Clone, Debug, Default)]
pub struct MorphArrays {
    pub morph_in: Option<Curve>,
    pub target_in: Option<Curve>,
    pub morph_out: Option<Curve>,
    pub target_out: Option<Curve>,
}

impl MorphArrays {
    /// Record inputs and seed outputs with identity copies.
    pub fn record(&mut self, morph: &Curve, target: &Curve) {
        self.morph_in = Some(morph.clone());
        self.target_in = Some(target.clone());
        self.morph_out = Some(morph.clone());
        self.target_out = Some(target.clone());
    }

    pub fn morph_out_mut(&mut self) -> &mut Curve {
        // Safety: record() runs before any morph body touches the outputs
        self.morph_out.as_mut().unwrap()
    }

    pub fn target_out_mut(&mut self) -> &mut Curve {
        // Safety: record() runs before any morph body touches the outputs
        self.target_out.as_mut().unwrap()
    }

    pub fn outputs(&self) -> Option<(&Curve, &Curve)> {
        self.morph_out.as_ref().zip(self.target_out.as_ref())
    }

    pub fn outputs_cloned(&self) -> (Curve, Curve) {
        let (morph, target) = self.outputs().expect("outputs recorded");
        (morph.clone(), target.clone())
    }
}

#[enum_dispatch]
pub trait MorphPropsTrait {
    /// Short description of the morph.
    fn summary(&self) -> &'static str;

    /// Descriptive label for the x input array.
    fn xin_label(&self) -> &'static str;

    /// Descriptive label for the y input array.
    fn yin_label(&self) -> &'static str;

    /// Descriptive label for the x output array.
    fn xout_label(&self) -> &'static str;

    /// Descriptive label for the y output array.
    fn yout_label(&self) -> &'static str;

    /// Ordered list of configuration parameters the morph declares.
    fn par_names(&self) -> &'static [&'static str];
}

#[enum_dispatch]
pub trait MorphTrait: MorphPropsTrait {
    /// Apply the morph to the curve pair, reading declared parameters from
    /// `config` and returning `(morph_out, target_out)`.
    ///
    /// The inputs and outputs are also recorded on the instance and stay
    /// available through the `xy_*` accessors until the next invocation.
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError>;

    /// Last-seen input/output bookkeeping.
    fn arrays(&self) -> &MorphArrays;

    /// Validate or coerce declared parameters; runs at the start of every
    /// invocation. No-op by default.
    fn check_config(&self, _config: &mut MorphConfig) -> Result<(), MorphError> {
        Ok(())
    }

    fn xy_morph_in(&self) -> Option<&Curve> {
        self.arrays().morph_in.as_ref()
    }

    fn xy_morph_out(&self) -> Option<&Curve> {
        self.arrays().morph_out.as_ref()
    }

    fn xy_target_in(&self) -> Option<&Curve> {
        self.arrays().target_in.as_ref()
    }

    fn xy_target_out(&self) -> Option<&Curve> {
        self.arrays().target_out.as_ref()
    }

    /// Both output curves of the last invocation.
    fn xyallout(&self) -> Option<(&Curve, &Curve)> {
        self.arrays().outputs()
    }
}

/// Generates the [MorphPropsTrait] impl from the morph's static declaration.
macro_rules! impl_morph_props {
    ($structure:ty, $summary:literal, ($xin:expr, $yin:expr) -> ($xout:expr, $yout:expr), [$($par:literal),* $(,)?] $(,)?) => {
        impl MorphPropsTrait for $structure {
            fn summary(&self) -> &'static str {
                $summary
            }

            fn xin_label(&self) -> &'static str {
                $xin
            }

            fn yin_label(&self) -> &'static str {
                $yin
            }

            fn xout_label(&self) -> &'static str {
                $xout
            }

            fn yout_label(&self) -> &'static str {
                $yout
            }

            fn par_names(&self) -> &'static [&'static str] {
                &[$($par),*]
            }
        }
    };
}
pub(super) use impl_morph_props;

macro_const! {
    const IDENTITY_DOC: &str = r#"
Identity morph passing all four arrays through unchanged

Declares no parameters. Useful as a placeholder when a chain element must be
disabled, e.g. undoing grid resampling before reporting final curves.
"#;
}

#[doc = IDENTITY_DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphIdentity {
    arrays: MorphArrays,
}

impl MorphIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        IDENTITY_DOC
    }
}

impl_morph_props!(MorphIdentity, "identity transformation", ("x", "y") -> ("x", "y"), []);

impl MorphTrait for MorphIdentity {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}

#[enum_dispatch(MorphTrait, MorphPropsTrait)]
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Morph {
    Identity(MorphIdentity),
    RGrid(super::rgrid::MorphRGrid),
    Scale(super::scale::MorphScale),
    Stretch(super::stretch::MorphStretch),
    Shift(super::shift::MorphShift),
    Smear(super::smear::MorphSmear),
    ResolutionDamping(super::resolution::MorphResolutionDamping),
    PdfToRdf(super::pdf_rdf::TransformPdfToRdf),
    RdfToPdf(super::pdf_rdf::TransformRdfToPdf),
    Sphere(super::shape::MorphSphere),
    Spheroid(super::shape::MorphSpheroid),
    ISphere(super::ishape::MorphISphere),
    ISpheroid(super::ishape::MorphISpheroid),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    check_morph_props!(check_props, MorphIdentity);

    #[test]
    fn identity_passes_through() {
        let mut config = MorphConfig::new();
        let curve = Curve::new(grid(0.0, 1.0, 0.1), grid(0.0, 2.0, 0.2));
        let target = Curve::new(grid(0.0, 1.0, 0.1), grid(1.0, 3.0, 0.2));

        let mut identity = MorphIdentity::new();
        let (morph_out, target_out) = identity.morph(&mut config, &curve, &target).unwrap();
        assert_eq!(morph_out, curve);
        assert_eq!(target_out, target);
        assert!(config.is_empty());
    }

    #[test]
    fn arrays_unset_before_first_invocation() {
        let identity = MorphIdentity::new();
        assert!(identity.xy_morph_in().is_none());
        assert!(identity.xyallout().is_none());
    }

    #[test]
    fn arrays_recorded_after_invocation() {
        let mut config = MorphConfig::new();
        let curve = Curve::new(grid(0.0, 1.0, 0.5), grid(0.0, 1.0, 0.5));

        let mut identity = MorphIdentity::new();
        identity.morph(&mut config, &curve, &curve).unwrap();
        assert_eq!(identity.xy_morph_in(), Some(&curve));
        assert_eq!(identity.xy_target_out(), Some(&curve));
        let (morph_out, target_out) = identity.xyallout().unwrap();
        assert_eq!(morph_out, &curve);
        assert_eq!(target_out, &curve);
    }
}
