#![doc = include_str!("../README.md")]


pub mod api;
pub use api::{MorphOptions, MorphResult, morph};

mod config;
pub use config::MorphConfig;

mod curve;
pub use curve::Curve;

mod error;
pub use error::{MorphError, RefineError};

mod interpolate;
pub use interpolate::interp;

pub mod morphs;
pub use morphs::{Morph, MorphChain, MorphIdentity, MorphPropsTrait, MorphTrait};

pub mod refine;
pub use refine::{LeastSquares, Refiner, Residual};

pub mod tools;

mod types;
pub use types::ArrayRef1;

pub use ndarray;
