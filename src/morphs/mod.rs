pub use morph::{
    LABEL_GR, LABEL_RA, LABEL_RR, Morph, MorphArrays, MorphIdentity, MorphPropsTrait, MorphTrait,
};

pub mod chain;
pub mod ishape;
pub mod morph;
pub mod pdf_rdf;
pub mod resolution;
pub mod rgrid;
pub mod scale;
pub mod shape;
pub mod shift;
pub mod smear;
pub mod stretch;

pub use chain::MorphChain;
pub use ishape::{MorphISphere, MorphISpheroid};
pub use pdf_rdf::{TransformPdfToRdf, TransformRdfToPdf};
pub use resolution::MorphResolutionDamping;
pub use rgrid::MorphRGrid;
pub use scale::MorphScale;
pub use shape::{MorphSphere, MorphSpheroid};
pub use shift::MorphShift;
pub use smear::MorphSmear;
pub use stretch::MorphStretch;
