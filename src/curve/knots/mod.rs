#![cfg_attr(feature = "doc-images",
cfg_attr(all(),
doc = ::embed_doc_image::embed_image!("basis-uniform", "doc-images/plots/basis/uniform.svg"),
doc = ::embed_doc_image::embed_image!("basis-open-uniform", "doc-images/plots/basis/open-uniform.svg")))]
//! Implements the knot vector defining the [basis functions][basis].
//!
//! The knot vector of a curve of order `k` with `N` control points is composed of `k+N`
//! scalar values in non-decreasing order, called 'knots'. Repeated values are allowed and
//! increase the multiplicity of a knot.
//!
//! The curve is defined on the domain `[U[k-1], U[N]]`, i.e. between the knots with the indices
//! `t_min_index = k-1` and `t_max_index = N`. The knots outside of the domain only shape the
//! basis functions at its ends.
//!
//! Different [knot vector generation methods][methods] are available.
//!
//! | Uniform            | Open-uniform            |
//! |:------------------:|:-----------------------:|
//! | ![][basis-uniform] | ![][basis-open-uniform] |

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{
    curve::basis,
    types::{VecD, VecDView, VecHelpers},
};

pub mod methods;

/// The amount by which the last knot of an open-uniform knot vector is raised.
///
/// The order-one basis functions are non-zero on half-open intervals `[U[i], U[i+1])`.
/// Raising the last knot keeps `t_max` inside the last interval, so the curve reaches its
/// last control point.
pub const UPPER_BOUND_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Knots {
    vector: VecD,
    order: usize,
}

/// Selects how the knot vector is (re)derived whenever the order or the number of control
/// points changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnotType {
    /// Evenly spaced knots, also before `t_min` and after `t_max`.
    Uniform,
    /// Knots with full multiplicity at both ends, so that the curve touches its first and last
    /// control points.
    #[default]
    OpenUniform,
    /// Knots supplied by the caller. They are never regenerated.
    Custom,
}

/// Treatment of the upper end of the curve domain `t_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Raises the last knot of open-uniform knot vectors by [`UPPER_BOUND_EPSILON`].
    /// Uniform and custom knot vectors are left untouched and evaluate to zero at `t_max`
    /// if their last domain knot is repeated.
    #[default]
    Nudge,
    /// Closes the last non-empty interval of the domain `[U[j], U[j+1]]` for every knot type.
    /// The basis functions are evaluated at `t_max` as the limit from the left, so they sum to
    /// one on the whole closed domain `[t_min, t_max]`.
    CloseLastSpan,
}

#[derive(Error, Debug, PartialEq)]
pub enum KnotError {
    #[error(
        "The knot vector has {len} knots, but a curve of order `k = {order}` with {count} control points \
        requires `k+N = {expected}` knots."
    )]
    LengthMismatch { len: usize, order: usize, count: usize, expected: usize },

    #[error("The order `k = {order}` must lie in the interval `[1, {count}]` set by the number of control points.")]
    InvalidOrder { order: usize, count: usize },

    #[error("The knot `U[{i}] = {value}` is smaller than its predecessor `{previous}`.")]
    Decreasing { i: usize, previous: f64, value: f64 },

    #[error("The knot `U[{i}] = {value}` is not a finite number.")]
    NotFinite { i: usize, value: f64 },

    #[error("The knot index `i = {i}` lies outside the knot vector of length {len}.")]
    IndexOutOfRange { i: usize, len: usize },

    #[error(
        "A custom knot vector cannot be generated for order `k = {order}` and {count} control points. \
        Supply the knots explicitly or switch to a generated knot type."
    )]
    CustomKnotsLocked { order: usize, count: usize },
}

/// Generates the knot vector of `knot_type` for a curve of `order` with `count` control points.
///
/// # Examples
/// ```
/// use bspline_explorer::curve::knots::{generate, BoundaryPolicy, KnotType};
///
/// let knots = generate(KnotType::Uniform, 3, 6, BoundaryPolicy::Nudge).unwrap();
/// assert_eq!(knots.as_slice(), [-0.5, -0.25, 0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5]);
/// ```
pub fn generate(knot_type: KnotType, order: usize, count: usize, policy: BoundaryPolicy) -> Result<Knots, KnotError> {
    match knot_type {
        KnotType::Uniform => methods::uniform(order, count),
        KnotType::OpenUniform => {
            let epsilon = match policy {
                BoundaryPolicy::Nudge => UPPER_BOUND_EPSILON,
                BoundaryPolicy::CloseLastSpan => 0.0,
            };
            methods::open_uniform(order, count, epsilon)
        }
        KnotType::Custom => Err(KnotError::CustomKnotsLocked { order, count }),
    }
}

impl Knots {
    /// Validates the knot vector for a curve of `order`.
    ///
    /// The number of control points `N` follows from the length of the vector.
    pub fn new(order: usize, vector: VecD) -> Result<Self, KnotError> {
        let count = vector.len().saturating_sub(order);
        if order == 0 || count < order {
            return Err(KnotError::InvalidOrder { order, count });
        }

        if let Some((i, &value)) = vector.iter().enumerate().find(|(_, u)| !u.is_finite()) {
            return Err(KnotError::NotFinite { i, value });
        }

        if let Some(i) = (1..vector.len()).find(|&i| vector[i] < vector[i - 1]) {
            return Err(KnotError::Decreasing { i, previous: vector[i - 1], value: vector[i] });
        }

        Ok(Knots { vector, order })
    }

    pub fn vector(&self) -> &VecD {
        &self.vector
    }

    pub fn as_slice(&self) -> &[f64] {
        self.vector.as_slice()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn degree(&self) -> usize {
        self.order - 1
    }

    pub fn len(&self) -> usize {
        self.vector.len()
    }

    /// Returns the number of control points `N` this knot vector belongs to.
    pub fn count(&self) -> usize {
        self.len() - self.order
    }

    pub fn t_min_index(&self) -> usize {
        self.order - 1
    }

    pub fn t_max_index(&self) -> usize {
        self.count()
    }

    pub fn t_min(&self) -> f64 {
        self.vector[self.t_min_index()]
    }

    pub fn t_max(&self) -> f64 {
        self.vector[self.t_max_index()]
    }

    pub fn first(&self) -> f64 {
        self.vector[0]
    }

    pub fn last(&self) -> f64 {
        self.vector[self.len() - 1]
    }

    /// Returns the distance between the first and the last knot.
    pub fn range(&self) -> f64 {
        (self.last() - self.first()).abs()
    }

    pub fn domain_count(&self) -> usize {
        self.t_max_index() - self.t_min_index() + 1
    }

    /// The knots from `t_min` to `t_max`.
    pub fn domain(&self) -> VecDView {
        self.vector.segment(self.t_min_index(), self.domain_count())
    }

    pub fn is_in_domain(&self, i: usize) -> bool {
        (self.t_min_index()..=self.t_max_index()).contains(&i)
    }

    pub fn multiplicity(&self, u: f64) -> usize {
        self.vector.iter().filter(|&&x| x == u).count()
    }

    /// Returns the index `j` of the last non-empty interval `[U[j], U[j+1])` inside the domain.
    pub fn last_domain_span(&self) -> Option<usize> {
        let t_max = self.t_max();
        (self.t_min_index()..self.t_max_index()).rev().find(|&j| self.vector[j] < t_max)
    }

    /// Returns the interval that is treated as closed under `policy`.
    pub fn closed_span(&self, policy: BoundaryPolicy) -> Option<usize> {
        match policy {
            BoundaryPolicy::Nudge => None,
            BoundaryPolicy::CloseLastSpan => self.last_domain_span(),
        }
    }

    /// Evaluates the `i`-th basis function of the knot vector's order at `t`.
    pub fn evaluate(&self, i: usize, t: f64, policy: BoundaryPolicy) -> f64 {
        match self.closed_span(policy) {
            Some(span) => basis::basis_closing(self.as_slice(), self.order, i, t, span),
            None => basis::basis(self.as_slice(), self.order, i, t),
        }
    }

    /// Evaluates all `N` basis functions of the knot vector's order at `t`.
    pub fn evaluate_all(&self, t: f64, policy: BoundaryPolicy) -> VecD {
        basis::basis_table(self.as_slice(), self.order, t, self.closed_span(policy))
    }

    /// Replaces the knot `U[i]`, keeping the vector sorted.
    pub fn set(&mut self, i: usize, value: f64) -> Result<(), KnotError> {
        self.check_index(i)?;
        if !value.is_finite() {
            return Err(KnotError::NotFinite { i, value });
        }

        if i > 0 && value < self.vector[i - 1] {
            return Err(KnotError::Decreasing { i, previous: self.vector[i - 1], value });
        }
        if i + 1 < self.len() && self.vector[i + 1] < value {
            return Err(KnotError::Decreasing { i: i + 1, previous: value, value: self.vector[i + 1] });
        }

        self.vector[i] = value;
        Ok(())
    }

    /// Restricts `value` to the interval between the neighbours of `U[i]`.
    ///
    /// The first knot is only bounded from above, the last knot only from below.
    pub fn clamp_to_neighbors(&self, i: usize, value: f64) -> Result<f64, KnotError> {
        self.check_index(i)?;
        if !value.is_finite() {
            return Err(KnotError::NotFinite { i, value });
        }

        let lower = if i > 0 { self.vector[i - 1] } else { f64::NEG_INFINITY };
        let upper = if i + 1 < self.len() { self.vector[i + 1] } else { f64::INFINITY };

        Ok(value.clamp(lower, upper))
    }

    fn check_index(&self, i: usize) -> Result<(), KnotError> {
        if i < self.len() {
            Ok(())
        } else {
            Err(KnotError::IndexOutOfRange { i, len: self.len() })
        }
    }
}

impl fmt::Display for KnotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KnotType::Uniform => "uniform",
            KnotType::OpenUniform => "open_uniform",
            KnotType::Custom => "custom",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown knot type `{0}`, expected one of `uniform`, `open_uniform` or `custom`.")]
pub struct ParseKnotTypeError(String);

impl FromStr for KnotType {
    type Err = ParseKnotTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(KnotType::Uniform),
            "open_uniform" => Ok(KnotType::OpenUniform),
            "custom" => Ok(KnotType::Custom),
            other => Err(ParseKnotTypeError(other.to_owned())),
        }
    }
}
