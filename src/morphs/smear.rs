use crate::interpolate::interp;
use crate::morphs::morph::*;
use crate::types::ArrayRef1;

use ndarray::Array1;

macro_const! {
    const DOC: &str = r#"
Broaden the peaks of the morph by Gaussian convolution

Configuration parameters: `smear`, the Gaussian width. Operates on an
RDF-like representation; inputs are not converted automatically (chain with
the PDF-to-RDF and RDF-to-PDF transforms when working on PDFs).

The convolution result is realigned so the intensity-weighted centroid of
the curve does not drift, and renormalized so the integrated intensity is
preserved.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphSmear {
    arrays: MorphArrays,
}

impl MorphSmear {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl_morph_props!(
    MorphSmear,
    "Smear morph by desired amount",
    (LABEL_RA, LABEL_RR) -> (LABEL_RA, LABEL_RR),
    ["smear"],
);

impl MorphTrait for MorphSmear {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let smear = config.require("smear", self.summary())?;
        // a zero-width Gaussian is degenerate
        if smear == 0.0 {
            return Ok(self.arrays.outputs_cloned());
        }

        let r = &morph.x;
        let rr = &morph.y;

        // unnormalized Gaussian centered at the middle sample
        let r0 = r[r.len() / 2];
        let kernel = r.mapv(|ri| f64::exp(-0.5 * ((ri - r0) / smear).powi(2)));

        let convolved = convolve_full(rr, &kernel);

        // realign so the intensity-weighted centroid does not move
        let shift = index_centroid(&convolved) - index_centroid(rr);
        let x1 = Array1::from_iter((0..rr.len()).map(|i| i as f64 + shift));
        let xc = Array1::from_iter((0..convolved.len()).map(|i| i as f64));
        let mut broadened = interp(&x1, &xc, &convolved);

        // preserve the integrated intensity
        broadened /= kernel.sum();

        self.arrays.morph_out_mut().y = broadened;
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}

/// Full discrete convolution, output length `a.len() + b.len() - 1`.
fn convolve_full(a: &ArrayRef1, b: &ArrayRef1) -> Array1<f64> {
    let mut out = Array1::zeros(a.len() + b.len() - 1);
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Intensity-weighted centroid in index coordinates.
fn index_centroid(values: &ArrayRef1) -> f64 {
    let weighted: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &v)| v * i as f64)
        .sum();
    weighted / values.iter().sum::<f64>()
}
