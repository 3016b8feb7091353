//! Turns a [`BSpline`] into point sequences for display.
//!
//! Samples carry the [generation](BSpline::generation) of the model they were taken from, so
//! a renderer can tell whether they are stale.

use log::trace;

use crate::{
    curve::{
        knots::{BoundaryPolicy, Knots},
        BSpline, ModelError,
    },
    types::Vec3,
};

/// Curve positions sampled over the whole domain.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSamples {
    generation: u64,
    points: Vec<Vec3>,
}

impl CurveSamples {
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Checks whether `model` has not been mutated since the samples were taken.
    pub fn is_current(&self, model: &BSpline) -> bool {
        self.generation == model.generation()
    }
}

/// A knot inside the domain, mapped onto the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotPoint {
    pub index: usize,
    pub value: f64,
    pub position: Vec3,
}

/// A knot on the parameter axis of a basis function plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnotMarker {
    pub index: usize,
    pub value: f64,
    pub in_domain: bool,
}

/// Samples one basis function of the model's order over the whole knot vector.
///
/// Yields `(u, N(i,k)(u))` pairs at `samples` evenly spaced parameters from the first to the
/// last knot. Cloning restarts the sequence.
#[derive(Debug, Clone)]
pub struct BasisSampler<'a> {
    knots: &'a Knots,
    policy: BoundaryPolicy,
    index: usize,
    samples: usize,
    next: usize,
}

impl BasisSampler<'_> {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Iterator for BasisSampler<'_> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.samples {
            return None;
        }

        let t = normalized(self.next, self.samples);
        let u = self.knots.first() + self.knots.range() * t;
        self.next += 1;

        Some((u, self.knots.evaluate(self.index, u, self.policy)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BasisSampler<'_> {}

/// Returns the `j`-th of `samples` evenly spaced values in `[0, 1]`.
fn normalized(j: usize, samples: usize) -> f64 {
    j as f64 / (samples - 1) as f64
}

/// Returns `samples` evenly spaced values from `0` to `1`, both included.
pub fn linspace(samples: usize) -> impl Iterator<Item = f64> + Clone {
    (0..samples).map(move |j| if samples == 1 { 0.0 } else { normalized(j, samples) })
}

impl BSpline {
    /// Samples the curve at `resolution` evenly spaced normalized parameters.
    ///
    /// # Examples
    /// ```
    /// use bspline_explorer::{curve::BSpline, settings::Settings};
    ///
    /// let spline = BSpline::new(&Settings::default()).unwrap();
    /// let samples = spline.sample_curve(100).unwrap();
    ///
    /// assert_eq!(samples.points().len(), 100);
    /// assert!(samples.is_current(&spline));
    /// ```
    pub fn sample_curve(&self, resolution: usize) -> Result<CurveSamples, ModelError> {
        if resolution < 2 {
            return Err(ModelError::TooFewSamples { samples: resolution });
        }
        Ok(self.sample_unchecked(resolution))
    }

    /// Samples the curve at the configured [resolution](BSpline::resolution).
    pub fn sample(&self) -> CurveSamples {
        self.sample_unchecked(self.resolution())
    }

    fn sample_unchecked(&self, resolution: usize) -> CurveSamples {
        trace!("Sampling generation {} of the curve at {resolution} points", self.generation());

        let points = linspace(resolution).map(|t| self.position_at(self.parameter(t))).collect();
        CurveSamples { generation: self.generation(), points }
    }

    /// Samples the `i`-th basis function of the model's order, see [`BasisSampler`].
    pub fn sample_basis(&self, i: usize, samples: usize) -> Result<BasisSampler<'_>, ModelError> {
        if i >= self.count() {
            return Err(ModelError::BasisIndexOutOfRange { k: self.order(), i, len: self.knots().len() });
        }
        if samples < 2 {
            return Err(ModelError::TooFewSamples { samples });
        }
        trace!("Sampling the basis function N({i},{}) at {samples} points", self.order());

        Ok(BasisSampler { knots: self.knots(), policy: self.boundary(), index: i, samples, next: 0 })
    }

    /// Maps every knot of the domain `U[k-1], ..., U[N]` onto the curve.
    pub fn knot_points(&self) -> Vec<KnotPoint> {
        let knots = self.knots().vector();
        (self.t_min_index()..=self.t_max_index())
            .map(|index| KnotPoint { index, value: knots[index], position: self.position_at(knots[index]) })
            .collect()
    }

    /// Returns a marker for every knot, flagging the ones inside the domain.
    pub fn knot_markers(&self) -> Vec<KnotMarker> {
        let knots = self.knots();
        knots
            .vector()
            .iter()
            .enumerate()
            .map(|(index, &value)| KnotMarker { index, value, in_domain: knots.is_in_domain(index) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{
        curve::knots::{KnotType, UPPER_BOUND_EPSILON},
        settings::Settings,
    };

    #[fixture]
    fn spline() -> BSpline {
        BSpline::new(&Settings::default()).unwrap()
    }

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(5).collect::<Vec<_>>(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(1).collect::<Vec<_>>(), vec![0.0]);
        assert_eq!(linspace(0).count(), 0);
    }

    mod curve {
        use super::*;

        #[rstest]
        fn ends_touch_control_polygon(spline: BSpline) {
            let samples = spline.sample_curve(50).unwrap();
            let points = samples.points();

            assert_eq!(points.len(), 50);
            assert_relative_eq!(points[0], spline.control_points().get(0), epsilon = f64::EPSILON.sqrt());
            assert_relative_eq!(points[49], spline.control_points().get(5), epsilon = f64::EPSILON.sqrt());
        }

        #[rstest]
        fn default_resolution(spline: BSpline) {
            let samples = spline.sample();
            assert_eq!(samples.points().len(), 500);
            assert_eq!(samples, spline.sample_curve(500).unwrap());
        }

        #[rstest]
        fn too_few_samples(spline: BSpline) {
            assert_eq!(spline.sample_curve(1), Err(ModelError::TooFewSamples { samples: 1 }));
        }

        #[rstest]
        fn stale_after_mutation(mut spline: BSpline) {
            let samples = spline.sample_curve(10).unwrap();
            assert!(samples.is_current(&spline));

            spline.move_control_point(2, Vec3::new(0.0, 0.0, 1.0)).unwrap();
            assert!(!samples.is_current(&spline));
            assert!(spline.sample_curve(10).unwrap().is_current(&spline));
        }

        #[rstest]
        fn failed_mutation_keeps_samples_current(mut spline: BSpline) {
            let samples = spline.sample_curve(10).unwrap();
            assert!(spline.set_order(12).is_err());
            assert!(samples.is_current(&spline));
        }
    }

    mod basis {
        use super::*;

        #[rstest]
        fn spans_whole_knot_vector(spline: BSpline) {
            let sampler = spline.sample_basis(0, 11).unwrap();
            assert_eq!(sampler.len(), 11);

            let samples: Vec<_> = sampler.collect();
            assert_eq!(samples[0].0, spline.knots().first());
            assert_relative_eq!(samples[10].0, spline.knots().last());
            assert_eq!(samples[0].1, 1.0);
        }

        #[rstest]
        fn matches_model_basis(spline: BSpline) {
            for i in 0..spline.count() {
                for (u, value) in spline.sample_basis(i, 40).unwrap() {
                    assert_eq!(value, spline.basis(spline.order(), i, u).unwrap());
                }
            }
        }

        #[rstest]
        fn clone_restarts(spline: BSpline) {
            let mut sampler = spline.sample_basis(3, 20).unwrap();
            let fresh = sampler.clone();

            sampler.next();
            assert_eq!(sampler.len(), 19);
            assert_eq!(fresh.clone().count(), 20);
            assert_eq!(fresh.clone().collect::<Vec<_>>(), fresh.collect::<Vec<_>>());
        }

        #[rstest]
        fn sums_to_weight_sum(spline: BSpline) {
            let samplers: Vec<_> = (0..spline.count()).map(|i| spline.sample_basis(i, 30).unwrap()).collect();

            for j in 0..30 {
                let u = samplers[0].clone().nth(j).unwrap().0;
                let sum: f64 = samplers.iter().map(|s| s.clone().nth(j).unwrap().1).sum();
                assert_relative_eq!(sum, spline.weight_sum(u), epsilon = 1e-12);
            }
        }

        #[rstest]
        fn invalid_arguments(spline: BSpline) {
            assert_eq!(
                spline.sample_basis(6, 10).unwrap_err(),
                ModelError::BasisIndexOutOfRange { k: 3, i: 6, len: 9 }
            );
            assert_eq!(spline.sample_basis(0, 1).unwrap_err(), ModelError::TooFewSamples { samples: 1 });
        }

        #[test]
        fn uniform_starts_below_domain() {
            let spline = BSpline::new(&Settings::default().with_knot_type(KnotType::Uniform)).unwrap();
            let (u, _) = spline.sample_basis(0, 2).unwrap().next().unwrap();
            assert_eq!(u, -0.5);
        }
    }

    mod knots {
        use super::*;

        #[rstest]
        fn knot_points_cover_domain(spline: BSpline) {
            let knot_points = spline.knot_points();

            assert_eq!(knot_points.iter().map(|p| p.index).collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
            assert_eq!(knot_points.iter().map(|p| p.value).collect::<Vec<_>>(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
            assert_relative_eq!(knot_points[0].position, spline.control_points().get(0), epsilon = f64::EPSILON.sqrt());
            assert_relative_eq!(knot_points[4].position, spline.control_points().get(5), epsilon = f64::EPSILON.sqrt());
        }

        #[rstest]
        fn knot_points_lie_on_curve(spline: BSpline) {
            for knot in spline.knot_points() {
                let t = (knot.value - spline.t_min()) / (spline.t_max() - spline.t_min());
                assert_relative_eq!(knot.position, spline.position(t).unwrap(), epsilon = 1e-12);
            }
        }

        #[rstest]
        fn markers_flag_domain(spline: BSpline) {
            let markers = spline.knot_markers();

            assert_eq!(markers.len(), 9);
            assert_eq!(
                markers.iter().map(|m| m.in_domain).collect::<Vec<_>>(),
                vec![false, false, true, true, true, true, true, false, false]
            );
            assert_eq!(markers[8], KnotMarker { index: 8, value: 4.0 + UPPER_BOUND_EPSILON, in_domain: false });
        }
    }
}
