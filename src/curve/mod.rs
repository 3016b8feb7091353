#![cfg_attr(feature = "doc-images",
cfg_attr(all(),
doc = ::embed_doc_image::embed_image!("curve-open-uniform", "doc-images/plots/curve/open-uniform.svg")))]
//! Implements the interactive B-spline model.
//!
//! A B-spline curve of order `k` is defined by
//!
//! ```text
//! C(u) = Σ_i N(i,k)(u) P[i],    u ∈ [U[k-1], U[N]]
//! ```
//!
//! with the
//! - `N` [control points][points] `P`,
//! - the order `k` (degree `k-1`),
//! - the [knot vector][knots] `U` with `k+N` knots, and
//! - the [basis functions][basis] `N(i,k)` defined by `U`.
//!
//! ![A quadratic curve on open-uniform knots][curve-open-uniform]
//!
//! [`BSpline`] owns all of these and keeps them consistent while the order, the number of
//! control points, the knot type, or single knots change. [Sampling][sampling] turns the model
//! into point sequences for display.

use log::debug;
use thiserror::Error;

use crate::{
    curve::{
        knots::{methods, BoundaryPolicy, KnotError, KnotType, Knots},
        points::ControlPoints,
    },
    settings::{Limits, Settings, CUSTOM_PRESET_COUNT, CUSTOM_PRESET_KNOTS, CUSTOM_PRESET_ORDER},
    types::{Vec3, VecD},
};

pub mod basis;
pub mod knots;
pub mod points;
pub mod sampling;

#[derive(Debug, Clone)]
pub struct BSpline {
    knots: Knots,
    points: ControlPoints,
    knot_type: KnotType,
    boundary: BoundaryPolicy,
    limits: Limits,
    resolution: usize,
    generation: u64,
}

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("Parameter `t = {t}` lies outside the interval `[{lower_bound}, {upper_bound}]`.")]
    ParameterOutOfBounds { t: f64, lower_bound: f64, upper_bound: f64 },

    #[error("The number of control points `N = {n}` must lie in the interval `[{min}, {max}]`.")]
    ControlPointCountOutOfRange { n: usize, min: usize, max: usize },

    #[error("The order `k = {k}` must lie in the interval `[{min}, {max}]`.")]
    OrderOutOfRange { k: usize, min: usize, max: usize },

    #[error("The order `k = {order}` cannot be greater than the number of control points `N = {count}`.")]
    OrderExceedsControlPoints { order: usize, count: usize },

    #[error("The control point index `i = {i}` lies outside the control polygon with {count} points.")]
    ControlPointIndexOutOfRange { i: usize, count: usize },

    #[error("The control point `P[{i}]` must have finite coordinates.")]
    ControlPointNotFinite { i: usize },

    #[error("The basis function `N({i},{k})` is not defined by a knot vector of length {len}.")]
    BasisIndexOutOfRange { k: usize, i: usize, len: usize },

    #[error("At least two samples are required, got {samples}.")]
    TooFewSamples { samples: usize },

    #[error("The knot type is `custom`, but no custom knots were provided.")]
    MissingCustomKnots,

    #[error("Invalid knot vector: {0}")]
    Knot(#[from] KnotError),
}

impl BSpline {
    /// Creates a model from `settings`.
    ///
    /// # Examples
    /// ```
    /// use bspline_explorer::{curve::BSpline, settings::Settings};
    ///
    /// let mut spline = BSpline::new(&Settings::default()).unwrap();
    /// assert_eq!(spline.knots().as_slice(), [0., 0., 0., 1., 2., 3., 4., 4., 4.01]);
    ///
    /// spline.set_order(4).unwrap();
    /// assert_eq!(spline.knots().len(), spline.order() + spline.count());
    /// println!("{:?}", spline.position(0.5));
    /// ```
    pub fn new(settings: &Settings) -> Result<Self, ModelError> {
        let limits = settings.limits.clone();
        let count = settings.control_points.len();
        let order = settings.order;

        check_count(&limits, count)?;
        check_order(&limits, order)?;
        if order > count {
            return Err(ModelError::OrderExceedsControlPoints { order, count });
        }
        if settings.resolution < 2 {
            return Err(ModelError::TooFewSamples { samples: settings.resolution });
        }

        let knots = match settings.knot_type {
            KnotType::Custom => {
                let custom = settings.custom_knots.as_deref().ok_or(ModelError::MissingCustomKnots)?;
                methods::custom(order, count, VecD::from_row_slice(custom))?
            }
            knot_type => knots::generate(knot_type, order, count, settings.boundary)?,
        };

        debug!("Created a B-spline of order {order} with {count} control points and {} knots", settings.knot_type);

        Ok(BSpline {
            knots,
            points: ControlPoints::from_points(&settings.control_points),
            knot_type: settings.knot_type,
            boundary: settings.boundary,
            limits,
            resolution: settings.resolution,
            generation: 0,
        })
    }

    pub fn order(&self) -> usize {
        self.knots.order()
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    /// Returns the number of control points `N`.
    pub fn count(&self) -> usize {
        self.points.count()
    }

    pub fn knots(&self) -> &Knots {
        &self.knots
    }

    pub fn control_points(&self) -> &ControlPoints {
        &self.points
    }

    pub fn knot_type(&self) -> KnotType {
        self.knot_type
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Returns the number of successful mutations since the model was created.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn t_min_index(&self) -> usize {
        self.knots.t_min_index()
    }

    pub fn t_max_index(&self) -> usize {
        self.knots.t_max_index()
    }

    pub fn t_min(&self) -> f64 {
        self.knots.t_min()
    }

    pub fn t_max(&self) -> f64 {
        self.knots.t_max()
    }

    pub fn knot_range(&self) -> f64 {
        self.knots.range()
    }

    /// Resizes the control polygon to `n` points.
    ///
    /// New points are [generated][ControlPoints::generated], surplus points are dropped.
    /// The order is lowered to `n` if it exceeds it and the knot vector is regenerated.
    /// Custom knot vectors cannot be regenerated, so the call fails for them.
    pub fn set_control_point_count(&mut self, n: usize) -> Result<(), ModelError> {
        check_count(&self.limits, n)?;
        if n == self.count() {
            return Ok(());
        }

        let order = self.order().min(n);
        let knots = knots::generate(self.knot_type, order, n, self.boundary)?;

        if order != self.order() {
            debug!("Lowering the order from {} to {order} to match {n} control points", self.order());
        }
        debug!("Resizing the control polygon from {} to {n} points", self.count());

        self.points = self.points.resized(n);
        self.commit(knots);
        Ok(())
    }

    /// Changes the order to `k`.
    ///
    /// Control points are added if there are fewer than `k` and the knot vector is regenerated.
    /// Custom knot vectors cannot be regenerated, so the call fails for them.
    pub fn set_order(&mut self, k: usize) -> Result<(), ModelError> {
        check_order(&self.limits, k)?;
        if k == self.order() {
            return Ok(());
        }

        let n = self.count().max(k);
        check_count(&self.limits, n)?;
        let knots = knots::generate(self.knot_type, k, n, self.boundary)?;

        if n != self.count() {
            debug!("Raising the number of control points from {} to {n} to match the order {k}", self.count());
        }
        debug!("Changing the order from {} to {k}", self.order());

        self.points = self.points.resized(n);
        self.commit(knots);
        Ok(())
    }

    /// Switches the knot type.
    ///
    /// Generated types replace the knot vector. Switching to [`KnotType::Custom`] keeps the
    /// current knots, which are never regenerated afterwards.
    pub fn set_knot_type(&mut self, knot_type: KnotType) -> Result<(), ModelError> {
        match knot_type {
            KnotType::Custom => {
                if self.knot_type != KnotType::Custom {
                    debug!("Freezing the {} knot vector as custom knots", self.knot_type);
                    self.knot_type = KnotType::Custom;
                    self.generation += 1;
                }
            }
            knot_type => {
                let knots = knots::generate(knot_type, self.order(), self.count(), self.boundary)?;
                debug!("Switching from {} to {knot_type} knots", self.knot_type);
                self.knot_type = knot_type;
                self.commit(knots);
            }
        }
        Ok(())
    }

    /// Replaces the knot vector with custom knots of length `k+N`.
    pub fn set_custom_knots(&mut self, knots: &[f64]) -> Result<(), ModelError> {
        let knots = methods::custom(self.order(), self.count(), VecD::from_row_slice(knots))?;
        self.knot_type = KnotType::Custom;
        self.commit(knots);
        Ok(())
    }

    /// Sets the order, the number of control points and a custom knot vector at once.
    ///
    /// Unlike [`set_order`][Self::set_order] and
    /// [`set_control_point_count`][Self::set_control_point_count], the order and the count are
    /// not adjusted to each other.
    pub fn configure_custom(&mut self, order: usize, count: usize, knots: &[f64]) -> Result<(), ModelError> {
        check_order(&self.limits, order)?;
        check_count(&self.limits, count)?;
        if order > count {
            return Err(ModelError::OrderExceedsControlPoints { order, count });
        }

        let knots = methods::custom(order, count, VecD::from_row_slice(knots))?;
        debug!("Configuring custom knots for order {order} with {count} control points");

        self.points = self.points.resized(count);
        self.knot_type = KnotType::Custom;
        self.commit(knots);
        Ok(())
    }

    /// Loads the preset custom knot vector `[0, 0, 0, 0, 0, 1, 2, 2, 2, 2, 2.1]` of a curve of
    /// order 5 with six control points.
    pub fn use_custom_preset(&mut self) -> Result<(), ModelError> {
        self.configure_custom(CUSTOM_PRESET_ORDER, CUSTOM_PRESET_COUNT, &CUSTOM_PRESET_KNOTS)
    }

    /// Sets the knot `U[i]` to `value`, which must lie between its neighbours.
    ///
    /// The knot type is left unchanged: the next regeneration of a generated knot vector
    /// discards the edit.
    pub fn set_knot_value(&mut self, i: usize, value: f64) -> Result<(), ModelError> {
        self.knots.set(i, value)?;
        self.generation += 1;
        Ok(())
    }

    /// Drags the knot `U[i]` towards `value`, stopping at the neighbouring knots.
    ///
    /// Returns the value the knot was set to.
    pub fn drag_knot(&mut self, i: usize, value: f64) -> Result<f64, ModelError> {
        let clamped = self.knots.clamp_to_neighbors(i, value)?;
        if clamped != value {
            debug!("Knot U[{i}] = {value} clamped to {clamped}");
        }

        self.knots.set(i, clamped)?;
        self.generation += 1;
        Ok(clamped)
    }

    /// Moves the control point `P[i]` to `position`.
    pub fn move_control_point(&mut self, i: usize, position: Vec3) -> Result<(), ModelError> {
        if i >= self.count() {
            return Err(ModelError::ControlPointIndexOutOfRange { i, count: self.count() });
        }
        if !position.iter().all(|x| x.is_finite()) {
            return Err(ModelError::ControlPointNotFinite { i });
        }

        self.points.set(i, position);
        self.generation += 1;
        Ok(())
    }

    /// Evaluates the `i`-th basis function of order `k` on the model's knot vector.
    pub fn basis(&self, k: usize, i: usize, t: f64) -> Result<f64, ModelError> {
        let len = self.knots.len();
        if k == 0 || i + k >= len {
            return Err(ModelError::BasisIndexOutOfRange { k, i, len });
        }

        let knots = self.knots.as_slice();
        Ok(match self.knots.closed_span(self.boundary) {
            Some(span) => basis::basis_closing(knots, k, i, t, span),
            None => basis::basis(knots, k, i, t),
        })
    }

    /// Maps the normalized parameter `t ∈ [0,1]` onto the domain `[t_min, t_max]`.
    pub fn parameter(&self, t: f64) -> f64 {
        self.t_min() * (1.0 - t) + self.t_max() * t
    }

    /// Evaluates the curve at the normalized parameter `t ∈ [0,1]`.
    pub fn position(&self, t: f64) -> Result<Vec3, ModelError> {
        if !(0.0..=1.0).contains(&t) {
            return Err(ModelError::ParameterOutOfBounds { t, lower_bound: 0.0, upper_bound: 1.0 });
        }
        Ok(self.position_at(self.parameter(t)))
    }

    /// Evaluates the curve at the unnormalized parameter `u`.
    ///
    /// Outside of the support of all basis functions, the result is the origin.
    pub fn position_at(&self, u: f64) -> Vec3 {
        let weights = self.knots.evaluate_all(u, self.boundary);
        self.points.combine(weights.iter().copied())
    }

    /// Returns the sum of all basis functions of the model's order at `u`.
    ///
    /// It equals one on `[t_min, t_max)`.
    pub fn weight_sum(&self, u: f64) -> f64 {
        self.knots.evaluate_all(u, self.boundary).sum()
    }

    fn commit(&mut self, knots: Knots) {
        debug!("Knot vector: {:?}", knots.as_slice());
        self.knots = knots;
        self.generation += 1;
    }
}

fn check_count(limits: &Limits, n: usize) -> Result<(), ModelError> {
    if limits.control_points.contains(&n) {
        Ok(())
    } else {
        Err(ModelError::ControlPointCountOutOfRange {
            n,
            min: *limits.control_points.start(),
            max: *limits.control_points.end(),
        })
    }
}

fn check_order(limits: &Limits, k: usize) -> Result<(), ModelError> {
    if limits.order.contains(&k) {
        Ok(())
    } else {
        Err(ModelError::OrderOutOfRange { k, min: *limits.order.start(), max: *limits.order.end() })
    }
}
