use ndarray::Array1;

/// A sampled curve: an ascending x-grid and y-values of the same length.
///
/// Curves come from an external reader; the morphs treat them as immutable
/// inputs and produce fresh output curves, except where a morph explicitly
/// resamples the grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
}

impl Curve {
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have the same length");
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Grid spacing taken from the first two samples, `None` for shorter curves.
    pub fn native_step(&self) -> Option<f64> {
        (self.len() >= 2).then(|| self.x[1] - self.x[0])
    }

    pub fn first_x(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.x[0])
    }

    pub fn last_x(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.x[self.len() - 1])
    }
}
