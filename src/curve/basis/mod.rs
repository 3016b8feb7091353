#![cfg_attr(feature = "doc-images",
cfg_attr(all(),
doc = ::embed_doc_image::embed_image!("basis-open-uniform", "doc-images/plots/basis/open-uniform.svg")))]
//! Evaluates the B-spline basis functions using the Cox-de Boor recurrence relation
//!
//! ```text
//! N(i,1)(t) = 1  if U[i] <= t < U[i+1]
//!             0  otherwise
//!
//! N(i,k)(t) = (t - U[i]) / (U[i+k-1] - U[i]) N(i,k-1)(t)
//!           + (U[i+k] - t) / (U[i+k] - U[i+1]) N(i+1,k-1)(t)
//! ```
//!
//! with the order `k` (degree `k-1`) and the knot vector `U`.
//! A summand whose denominator vanishes, which happens at repeated knots,
//! contributes zero.
//!
//! ![Basis functions of an open-uniform knot vector][basis-open-uniform]
//!
//! The order-one support intervals are half-open, so the upper end of a clamped knot vector
//! lies outside of every interval. [`basis_closing`] closes a chosen interval instead.

use crate::types::VecD;

/// Evaluates the `i`-th basis function of order `k` at the parameter `t`.
///
/// ## Arguments
///
/// - `knots` the knot vector `U`
/// - `k` the order with `k >= 1`
/// - `i` the index with `i + k < U.len()`
/// - `t` the (unnormalized) parameter
///
/// # Panics
///
/// Panics if `k == 0` or `i + k` is not a valid knot index.
///
/// # Examples
/// ```
/// use bspline_explorer::curve::basis::basis;
///
/// let knots = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
/// assert_eq!(basis(&knots, 3, 0, 0.0), 1.0);
/// assert_eq!(basis(&knots, 3, 1, 0.5), 0.5);
/// ```
pub fn basis(knots: &[f64], k: usize, i: usize, t: f64) -> f64 {
    check(knots, k, i);
    cox_de_boor(knots, k, i, t, None)
}

/// Evaluates the `i`-th basis function of order `k` like [`basis`], but with the order-one
/// support interval `[U[span], U[span+1]]` closed at its upper knot.
///
/// At `t = U[span+1]` the closed interval is the only active one, so the result is the limit
/// from the left. Closing the last non-empty interval of the domain keeps the basis functions
/// summing to one at `t_max` for every knot vector.
pub fn basis_closing(knots: &[f64], k: usize, i: usize, t: f64, span: usize) -> f64 {
    check(knots, k, i);
    assert!(span + 1 < knots.len(), "The closed span {span} has no upper knot in a vector of {} knots", knots.len());
    cox_de_boor(knots, k, i, t, Some(span))
}

/// Evaluates all `U.len() - order` basis functions of `order` at `t` at once.
///
/// The lower order values are shared between the basis functions instead of being recomputed
/// by every recursive call. The results are identical to [`basis`] and [`basis_closing`].
///
/// # Panics
///
/// Panics if `order == 0` or `order >= U.len()`.
pub fn basis_table(knots: &[f64], order: usize, t: f64, closed: Option<usize>) -> VecD {
    assert!(order >= 1, "The order must be at least one");
    assert!(order < knots.len(), "The order {order} requires more than {} knots", knots.len());

    let m = knots.len();
    let mut values = VecD::from_fn(m - 1, |i, _| indicator(knots, i, t, closed));

    for k in 2..=order {
        // `N(i,k)` only depends on `N(i,k-1)` and `N(i+1,k-1)`, so the table is updated in place
        // from the front.
        for i in 0..m - k {
            values[i] = blend(knots, k, i, t, values[i], values[i + 1]);
        }
    }

    values.rows(0, m - order).clone_owned()
}

fn check(knots: &[f64], k: usize, i: usize) {
    assert!(k >= 1, "The order `k` of a basis function must be at least one");
    assert!(
        i + k < knots.len(),
        "The basis function `N({i},{k})` requires the knot `U[{}]`, but there are only {} knots",
        i + k,
        knots.len()
    );
}

fn cox_de_boor(knots: &[f64], k: usize, i: usize, t: f64, closed: Option<usize>) -> f64 {
    if k == 1 {
        return indicator(knots, i, t, closed);
    }

    let left = if knots[i + k - 1] != knots[i] { cox_de_boor(knots, k - 1, i, t, closed) } else { 0.0 };
    let right = if knots[i + k] != knots[i + 1] { cox_de_boor(knots, k - 1, i + 1, t, closed) } else { 0.0 };

    blend(knots, k, i, t, left, right)
}

fn indicator(knots: &[f64], i: usize, t: f64, closed: Option<usize>) -> f64 {
    let active = match closed {
        // The upper knot of the closed span belongs to that span only, even if a later
        // interval starts there.
        Some(span) if t == knots[span + 1] => i == span,
        _ => knots[i] <= t && t < knots[i + 1],
    };

    if active {
        1.0
    } else {
        0.0
    }
}

/// Combines the two order `k-1` values into `N(i,k)(t)`.
fn blend(knots: &[f64], k: usize, i: usize, t: f64, left: f64, right: f64) -> f64 {
    let mut value = 0.0;

    let denominator = knots[i + k - 1] - knots[i];
    if denominator != 0.0 {
        value += left * (t - knots[i]) / denominator;
    }

    let denominator = knots[i + k] - knots[i + 1];
    if denominator != 0.0 {
        value += right * (knots[i + k] - t) / denominator;
    }

    value
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    const CLAMPED: [f64; 10] = [0., 0., 0., 0., 1. / 3., 2. / 3., 1., 1., 1., 1.];

    #[test]
    fn order_one_is_half_open() {
        let knots = [0.0, 1.0, 2.0];
        assert_eq!(basis(&knots, 1, 0, 0.0), 1.0);
        assert_eq!(basis(&knots, 1, 0, 0.5), 1.0);
        assert_eq!(basis(&knots, 1, 0, 1.0), 0.0);
        assert_eq!(basis(&knots, 1, 1, 1.0), 1.0);
        assert_eq!(basis(&knots, 1, 1, 2.0), 0.0);
    }

    #[test]
    fn cubic_clamped() {
        let k = 4;

        // Basis function i = 0
        let mut i = 0;
        assert_eq!(basis(&CLAMPED, k, i, 0.0), 1.0);
        assert_relative_eq!(basis(&CLAMPED, k, i, 1. / 6.), 1. / 8., epsilon = f64::EPSILON.sqrt());
        assert_eq!(basis(&CLAMPED, k, i, 1. / 3.), 0.0);
        assert_eq!(basis(&CLAMPED, k, i, 1. / 2.), 0.0);

        i = 1;
        assert_eq!(basis(&CLAMPED, k, i, 0.), 0.0);
        assert_relative_eq!(basis(&CLAMPED, k, i, 1. / 6.), 19. / 32., epsilon = f64::EPSILON.sqrt());
        assert_relative_eq!(basis(&CLAMPED, k, i, 1. / 3.), 1. / 4., epsilon = f64::EPSILON.sqrt());
        assert_relative_eq!(basis(&CLAMPED, k, i, 1. / 2.), 1. / 32., epsilon = f64::EPSILON.sqrt());
        assert_eq!(basis(&CLAMPED, k, i, 2. / 3.), 0.0);

        i = 2;
        assert_relative_eq!(basis(&CLAMPED, k, i, 1. / 6.), 25. / 96., epsilon = f64::EPSILON.sqrt());
        assert_relative_eq!(basis(&CLAMPED, k, i, 1. / 3.), 7. / 12., epsilon = f64::EPSILON.sqrt());
        assert_relative_eq!(basis(&CLAMPED, k, i, 1. / 2.), 15. / 32., epsilon = f64::EPSILON.sqrt());
        assert_relative_eq!(basis(&CLAMPED, k, i, 5. / 6.), 1. / 48., epsilon = f64::EPSILON.sqrt());

        i = 5;
        assert_eq!(basis(&CLAMPED, k, i, 1. / 2.), 0.0);
        assert_relative_eq!(basis(&CLAMPED, k, i, 5. / 6.), 1. / 8., epsilon = f64::EPSILON.sqrt());
    }

    #[test]
    fn upper_end_of_clamped_vector_is_degenerate() {
        let k = 4;
        let sum: f64 = (0..6).map(|i| basis(&CLAMPED, k, i, 1.0)).sum();
        assert_eq!(sum, 0.0);
    }

    #[test]
    fn closing_the_last_span_reaches_the_upper_end() {
        let k = 4;
        let span = 5;
        assert_eq!(basis_closing(&CLAMPED, k, 5, 1.0, span), 1.0);
        for i in 0..5 {
            assert_eq!(basis_closing(&CLAMPED, k, i, 1.0, span), 0.0);
        }
    }

    #[test]
    fn zero_denominators_contribute_nothing() {
        // All knots coincide, every summand is skipped.
        let knots = [1.0, 1.0, 1.0, 1.0];
        assert_eq!(basis(&knots, 3, 0, 1.0), 0.0);
    }

    #[rstest(t, case(0.0), case(0.1), case(1. / 3.), case(0.5), case(0.9), case(1.0))]
    fn table_matches_recursion(t: f64) {
        let order = 4;
        let table = basis_table(&CLAMPED, order, t, None);
        assert_eq!(table.len(), CLAMPED.len() - order);

        for (i, value) in table.iter().enumerate() {
            assert_eq!(*value, basis(&CLAMPED, order, i, t));
        }
    }

    #[test]
    fn closed_end_excludes_the_following_interval() {
        let knots = [0., 1., 2., 3., 4.];

        assert_eq!(basis(&knots, 1, 2, 2.0), 1.0);
        assert_eq!(basis_closing(&knots, 1, 1, 2.0, 1), 1.0);
        assert_eq!(basis_closing(&knots, 1, 2, 2.0, 1), 0.0);
        assert_eq!(basis_closing(&knots, 1, 2, 2.5, 1), 1.0);
    }

    #[rstest(t, case(0.0), case(0.5), case(1.5), case(2.0))]
    fn closed_span_with_open_tail_sums_to_one(t: f64) {
        // Uniform quadratic knots with the domain `[0, 2]`, the last domain span is `U[3]..U[4]`.
        let knots = [-2., -1., 0., 1., 2., 3., 4.];
        let table = basis_table(&knots, 3, t, Some(3));

        for (i, value) in table.iter().enumerate() {
            assert_eq!(*value, basis_closing(&knots, 3, i, t, 3));
        }
        assert_relative_eq!(table.sum(), 1.0, epsilon = f64::EPSILON.sqrt());
    }

    #[rstest(t, case(0.0), case(0.5), case(1.0))]
    fn closed_table_matches_recursion(t: f64) {
        let order = 3;
        let knots = [0., 0., 0., 0.5, 1., 1., 1.];
        let table = basis_table(&knots, order, t, Some(3));

        for (i, value) in table.iter().enumerate() {
            assert_eq!(*value, basis_closing(&knots, order, i, t, 3));
        }
        assert_relative_eq!(table.sum(), 1.0, epsilon = f64::EPSILON.sqrt());
    }

    #[rstest(k, i, case(1, 0), case(2, 3), case(3, 4))]
    fn local_support(k: usize, i: usize) {
        let knots = [0., 1., 2., 3., 4., 5., 6., 7., 8.];

        assert_eq!(basis(&knots, k, i, knots[i] - 0.5), 0.0);
        assert_eq!(basis(&knots, k, i, knots[i + k]), 0.0);
        assert_eq!(basis(&knots, k, i, knots[i + k] + 0.5), 0.0);
        assert!(basis(&knots, k, i, knots[i] + 0.5) > 0.0);
    }

    #[test]
    #[should_panic]
    fn order_zero_panics() {
        basis(&CLAMPED, 0, 0, 0.5);
    }

    #[test]
    #[should_panic]
    fn index_out_of_range_panics() {
        basis(&CLAMPED, 4, 6, 0.5);
    }
}
