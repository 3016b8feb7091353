//! Configuration of a [`BSpline`](crate::curve::BSpline) model.
//!
//! [`Settings::default`] reproduces the initial state of the interactive explorer: a six point
//! zigzag polygon with a quadratic (order 3) curve on open-uniform knots, sampled with 500
//! points.

use std::ops::RangeInclusive;

use crate::{
    curve::knots::{BoundaryPolicy, KnotType},
    types::Vec3,
};

pub const DEFAULT_RESOLUTION: usize = 500;
pub const DEFAULT_ORDER: usize = 3;

/// Custom knot vector loaded by [`BSpline::use_custom_preset`](crate::curve::BSpline::use_custom_preset),
/// for order 5 and six control points.
pub const CUSTOM_PRESET_KNOTS: [f64; 11] = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.1];
pub const CUSTOM_PRESET_ORDER: usize = 5;
pub const CUSTOM_PRESET_COUNT: usize = 6;

/// The parameter ranges accepted by the model mutators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub control_points: RangeInclusive<usize>,
    pub order: RangeInclusive<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { control_points: 2..=11, order: 1..=9 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub control_points: Vec<Vec3>,
    pub order: usize,
    pub knot_type: KnotType,
    /// Required if `knot_type` is [`KnotType::Custom`], ignored otherwise.
    pub custom_knots: Option<Vec<f64>>,
    pub resolution: usize,
    pub boundary: BoundaryPolicy,
    pub limits: Limits,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            control_points: default_control_points(),
            order: DEFAULT_ORDER,
            knot_type: KnotType::OpenUniform,
            custom_knots: None,
            resolution: DEFAULT_RESOLUTION,
            boundary: BoundaryPolicy::default(),
            limits: Limits::default(),
        }
    }
}

impl Settings {
    pub fn with_control_points(mut self, points: Vec<Vec3>) -> Self {
        self.control_points = points;
        self
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_knot_type(mut self, knot_type: KnotType) -> Self {
        self.knot_type = knot_type;
        self
    }

    /// Switches to [`KnotType::Custom`] with the given knots.
    pub fn with_custom_knots(mut self, knots: Vec<f64>) -> Self {
        self.knot_type = KnotType::Custom;
        self.custom_knots = Some(knots);
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

pub fn default_control_points() -> Vec<Vec3> {
    vec![
        Vec3::new(-3.0, -3.0, 0.0),
        Vec3::new(-2.0, 3.0, 0.0),
        Vec3::new(2.0, 3.0, 0.0),
        Vec3::new(3.0, -3.0, 0.0),
        Vec3::new(7.0, 3.0, 0.0),
        Vec3::new(9.0, -3.0, 0.0),
    ]
}
