/// Error returned from [crate::MorphTrait::morph] and configuration access
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MorphError {
    #[error("configuration parameter {name:?} required by {morph:?} is not set")]
    MissingParameter { name: String, morph: &'static str },

    #[error("{morph:?} needs curves of at least {minimum} samples, got {actual}")]
    ShortCurve {
        actual: usize,
        minimum: usize,
        morph: &'static str,
    },

    #[error("parameter {name:?} is not recognized by any morph operation")]
    UnknownParameter { name: String },
}

/// Error returned from [crate::Refiner::refine] and the least-squares solver
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RefineError {
    #[error(transparent)]
    Morph(#[from] MorphError),

    #[error("damped normal equations are singular at iteration {iteration}")]
    SingularJacobian { iteration: usize },

    #[error("least-squares solve did not converge within {limit} iterations")]
    IterationLimit { limit: usize },
}
