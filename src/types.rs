use ndarray::{ArrayRef, Ix1};

pub type ArrayRef1 = ArrayRef<f64, Ix1>;
