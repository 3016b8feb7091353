//! Knot vector generation methods.
//!
//! - Uniform knots
//! - Open-uniform (clamped) knots
//! - Custom knots supplied by the caller

use crate::{
    curve::knots::{KnotError, Knots},
    types::VecD,
};

fn check(order: usize, count: usize) -> Result<(), KnotError> {
    if order == 0 || order > count {
        return Err(KnotError::InvalidOrder { order, count });
    }
    Ok(())
}

/// Distributes all `k+N` knots evenly, also before `t_min` and after `t_max`, so that the curve
/// generally does not pass through its first and last control points.
///
/// The knots inside the domain are `0, 1/(N-k+1), ..., 1`.
///
/// ```text
/// order = 3, N = 6: [-0.5, -0.25, 0, 0.25, 0.5, 0.75, 1, 1.25, 1.5]
/// ```
pub fn uniform(order: usize, count: usize) -> Result<Knots, KnotError> {
    check(order, count)?;

    let step = 1.0 / (count - order + 1) as f64;
    let offset = step * (order - 1) as f64;
    let vector = VecD::from_fn(order + count, |i, _| i as f64 * step - offset);

    Knots::new(order, vector)
}

/// Repeats the first and last knot `k` times so that the curve touches its first and last
/// control points. The interior knots increase by one.
///
/// The last knot is raised by `epsilon` to keep `t_max` inside the last half-open basis
/// function interval, see [`UPPER_BOUND_EPSILON`](super::UPPER_BOUND_EPSILON).
///
/// ```text
/// order = 3, N = 6, epsilon = 0.01: [0, 0, 0, 1, 2, 3, 4, 4, 4.01]
/// ```
pub fn open_uniform(order: usize, count: usize, epsilon: f64) -> Result<Knots, KnotError> {
    check(order, count)?;

    let t_max = (count - order + 1) as f64;
    let shift = (order - 1) as f64;
    let len = order + count;

    let mut vector = VecD::from_fn(len, |i, _| (i as f64 - shift).clamp(0.0, t_max));
    vector[len - 1] += epsilon;

    Knots::new(order, vector)
}

/// Validates a knot vector supplied by the caller for a curve of `order` with `count` control
/// points.
pub fn custom(order: usize, count: usize, vector: VecD) -> Result<Knots, KnotError> {
    check(order, count)?;

    let expected = order + count;
    if vector.len() != expected {
        return Err(KnotError::LengthMismatch { len: vector.len(), order, count, expected });
    }

    Knots::new(order, vector)
}
