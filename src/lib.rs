#![cfg_attr(feature = "doc-images",
cfg_attr(all(),
doc = ::embed_doc_image::embed_image!("img-curve", "doc-images/plots/curve/open-uniform.svg"),
doc = ::embed_doc_image::embed_image!("img-basis", "doc-images/plots/basis/open-uniform.svg")))]
//! **bspline-explorer** is the model behind an interactive B-spline explorer, built on [nalgebra].
//!
//! ## Features
//! - A [B-spline model][curve::BSpline] of order `k = 1,..., 9` with `N = 2,..., 11` control points
//!   in 3D space, kept consistent while the order, the control polygon or the knots change.
//! - [Basis function evaluation][curve::basis] by the Cox–de Boor recursion and by an equivalent
//!   bottom-up table.
//! - [Knot vectors][curve::knots]
//!   - [uniform][curve::knots::methods::uniform]
//!   - [open-uniform][curve::knots::methods::open_uniform]
//!   - [custom][curve::knots::methods::custom], with a preset and single-knot dragging
//! - [Sampling][curve::sampling] of the curve, its basis functions and its knots for display,
//!   tagged with the model generation so stale samples can be detected.
//! - [Settings] for the initial state and the accepted parameter ranges.
//!
//! ## What are B-Splines?
//!
//! A B-spline curve is a weighted sum of control points. The weights are piecewise polynomial
//! basis functions of degree `k-1` that are joined at the knots. Every basis function is non-zero
//! on `k` consecutive knot intervals only, so moving a control point changes the curve locally.
//!
//! ![A quadratic B-spline curve.][img-curve]
//!
//! Inside the domain `[U[k-1], U[N]]` the basis functions sum to one.
//!
//! ![Its basis functions.][img-basis]
//!
//! ## Literature:
//! |            |                                                                                                                       |
//! |-----------:|:----------------------------------------------------------------------------------------------------------------------|
//! | Piegl1997  | Piegl, L., Tiller, W. The NURBS Book. Monographs in Visual Communication. Springer, Berlin, Heidelberg, 2nd ed., 1997. |
//!
//! [Settings]: settings::Settings

pub mod curve;
pub mod settings;
pub mod types;
