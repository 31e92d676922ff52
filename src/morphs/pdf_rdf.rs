use crate::morphs::morph::*;

use ndarray::Zip;

macro_const! {
    const PDF_TO_RDF_DOC: &str = r#"
Convert both curves from PDF to RDF

Configuration parameters: `baselineslope`, the slope of the linear PDF
baseline. With a perfect scale the slope equals `-4 * pi * rho0`, where
`rho0` is the density of the crystalline sample.

With `s = baselineslope`, `R(r) = r * (G(r) - r * s)`.
"#;
}

#[doc = PDF_TO_RDF_DOC!()]
#[derive(Clone, Debug, Default)]
pub struct TransformPdfToRdf {
    arrays: MorphArrays,
}

impl TransformPdfToRdf {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        PDF_TO_RDF_DOC
    }
}

impl_morph_props!(
    TransformPdfToRdf,
    "Turn the PDF into the RDF for both the morph and target",
    (LABEL_RA, LABEL_GR) -> (LABEL_RA, LABEL_RR),
    ["baselineslope"],
);

impl MorphTrait for TransformPdfToRdf {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let slope = config.require("baselineslope", self.summary())?;

        self.arrays.morph_out_mut().y = pdf_to_rdf(morph, slope);
        self.arrays.target_out_mut().y = pdf_to_rdf(target, slope);
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}

macro_const! {
    const RDF_TO_PDF_DOC: &str = r#"
Convert both curves from RDF back to PDF

Configuration parameters: `baselineslope`, the slope of the linear PDF
baseline.

With `s = baselineslope`, `G(r) = R(r) / r + r * s`; the sample at exactly
`r = 0` is forced to zero instead of dividing by zero.
"#;
}

#[doc = RDF_TO_PDF_DOC!()]
#[derive(Clone, Debug, Default)]
pub struct TransformRdfToPdf {
    arrays: MorphArrays,
}

impl TransformRdfToPdf {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn doc() -> &'static str {
        RDF_TO_PDF_DOC
    }
}

impl_morph_props!(
    TransformRdfToPdf,
    "Turn the RDF into the PDF for both the morph and target",
    (LABEL_RA, LABEL_RR) -> (LABEL_RA, LABEL_GR),
    ["baselineslope"],
);

impl MorphTrait for TransformRdfToPdf {
    fn morph(
        &mut self,
        config: &mut MorphConfig,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        self.arrays.record(morph, target);
        self.check_config(config)?;
        let slope = config.require("baselineslope", self.summary())?;

        self.arrays.morph_out_mut().y = rdf_to_pdf(morph, slope);
        self.arrays.target_out_mut().y = rdf_to_pdf(target, slope);
        Ok(self.arrays.outputs_cloned())
    }

    fn arrays(&self) -> &MorphArrays {
        &self.arrays
    }
}

fn pdf_to_rdf(curve: &Curve, slope: f64) -> ndarray::Array1<f64> {
    Zip::from(&curve.x)
        .and(&curve.y)
        .map_collect(|&r, &g| r * (g - r * slope))
}

fn rdf_to_pdf(curve: &Curve, slope: f64) -> ndarray::Array1<f64> {
    Zip::from(&curve.x)
        .and(&curve.y)
        .map_collect(|&r, &rr| if r == 0.0 { 0.0 } else { rr / r + r * slope })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    check_morph_props!(check_forward_props, TransformPdfToRdf);
    check_morph_props!(check_inverse_props, TransformRdfToPdf);

    #[test]
    fn forward_formula() {
        let slope = -0.7;
        let x = grid(0.0, 5.0, 0.1);
        let g = x.mapv(f64::sin);
        let pdf = Curve::new(x.clone(), g.clone());

        let mut config = MorphConfig::new();
        config.set("baselineslope", slope);
        let mut forward = TransformPdfToRdf::new();
        let (morph_out, _) = forward.morph(&mut config, &pdf, &pdf).unwrap();

        let expected =
            Zip::from(&x).and(&g).map_collect(|&r, &gr| r * (gr - r * slope));
        all_close(
            morph_out.y.as_slice().unwrap(),
            expected.as_slice().unwrap(),
            1e-12,
        );
    }

    #[test]
    fn round_trip_away_from_zero() {
        let slope = -0.5;
        let x = grid(0.01, 5.0, 0.01);
        let pdf = Curve::new(x.clone(), x.mapv(f64::cos));
        let mut config = MorphConfig::new();
        config.set("baselineslope", slope);

        let mut forward = TransformPdfToRdf::new();
        let (rdf, _) = forward.morph(&mut config, &pdf, &pdf).unwrap();
        let mut inverse = TransformRdfToPdf::new();
        let (back, _) = inverse.morph(&mut config, &rdf, &rdf).unwrap();

        all_close(
            back.y.as_slice().unwrap(),
            pdf.y.as_slice().unwrap(),
            1e-10,
        );
    }

    #[test]
    fn zero_r_sample_is_guarded() {
        let x = Array1::from(vec![0.0, 1.0, 2.0]);
        let rdf = Curve::new(x, Array1::from(vec![3.0, 2.0, 1.0]));
        let mut config = MorphConfig::new();
        config.set("baselineslope", -1.0);
        let mut inverse = TransformRdfToPdf::new();
        let (morph_out, target_out) = inverse.morph(&mut config, &rdf, &rdf).unwrap();

        assert_eq!(morph_out.y[0], 0.0);
        assert_eq!(target_out.y[0], 0.0);
        assert!((morph_out.y[1] - (2.0 / 1.0 + 1.0 * -1.0)).abs() < 1e-12);
        assert!((morph_out.y[2] - (1.0 / 2.0 + 2.0 * -1.0)).abs() < 1e-12);
    }
}
