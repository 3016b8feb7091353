//! Implements the control points constituting the control polygon of the curve.
//!
//! The points are stored as the columns of a `3 × N` matrix. When the polygon grows, the new
//! points are placed on a zigzag line continuing to the right, see [`ControlPoints::generated`].

use crate::types::{Mat3X, Vec3};

#[derive(PartialEq, Debug, Clone)]
pub struct ControlPoints {
    matrix: Mat3X,
}

impl ControlPoints {
    pub fn from_points(points: &[Vec3]) -> Self {
        ControlPoints { matrix: Mat3X::from_fn(points.len(), |r, c| points[c][r]) }
    }

    /// The default position of the `i`-th control point, alternating above and below the x-axis.
    pub fn generated(i: usize) -> Vec3 {
        let y = if i % 2 == 0 { 3.0 } else { -3.0 };
        Vec3::new(i as f64 * 2.0, y, 0.0)
    }

    pub fn count(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn get(&self, i: usize) -> Vec3 {
        self.matrix.column(i).into_owned()
    }

    pub fn set(&mut self, i: usize, point: Vec3) {
        self.matrix.set_column(i, &point);
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.matrix.column_iter().map(|c| c.into_owned())
    }

    /// Returns the first `n` points, appending [generated][Self::generated] points if there are
    /// fewer than `n`.
    pub fn resized(&self, n: usize) -> Self {
        let count = self.count();
        let matrix = Mat3X::from_fn(n, |r, c| if c < count { self.matrix[(r, c)] } else { Self::generated(c)[r] });
        ControlPoints { matrix }
    }

    /// Returns the weighted sum `Σ w[i] P[i]` of the points.
    pub fn combine(&self, weights: impl IntoIterator<Item = f64>) -> Vec3 {
        self.matrix.column_iter().zip(weights).fold(Vec3::zeros(), |sum, (point, w)| sum + point * w)
    }
}
