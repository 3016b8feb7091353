use nalgebra::{Dyn, MatrixView, OMatrix, OVector, Vector3, U1, U3};

pub type VecD = OVector<f64, Dyn>;
pub type VecDView<'a> = MatrixView<'a, f64, Dyn, U1, U1, Dyn>;

/// A point or displacement in 3D space.
pub type Vec3 = Vector3<f64>;

/// Column-major storage of 3D points, one point per column.
pub type Mat3X = OMatrix<f64, U3, Dyn>;

pub trait VecHelpers {
    fn segment(&self, i: usize, n: usize) -> VecDView;
}

impl VecHelpers for VecD {
    fn segment(&self, start: usize, n: usize) -> VecDView {
        self.generic_view((start, 0), (Dyn(n), U1))
    }
}
