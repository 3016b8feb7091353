use std::error::Error;

use plotters::prelude::*;

use bspline_explorer::{
    curve::{
        knots::{BoundaryPolicy, KnotType},
        BSpline,
    },
    settings::Settings,
    types::Vec3,
};

use crate::visualization::{Limits, PlotResult};

mod visualization;

const PLOTS_DIR: &str = "doc-images/plots/";

const RED_100: RGBAColor = RGBAColor(255, 0, 0, 1.0);
const BLUE_100: RGBAColor = RGBAColor(0, 0, 255, 1.0);
const PURPLE_100: RGBAColor = RGBAColor(200, 0, 200, 1.0);

fn limits() -> Limits {
    Limits { x: -4.0..10.0, y: -4.5..4.5 }
}

fn default_spline() -> Result<BSpline, Box<dyn Error>> {
    Ok(BSpline::new(&Settings::default())?)
}

fn curve_plots() -> PlotResult {
    let lim = limits();

    let open_uniform = default_spline()?;
    visualization::generate_curve_plot("curve/open-uniform.svg", &open_uniform, RED_100, &lim)?;

    let uniform = BSpline::new(&Settings::default().with_knot_type(KnotType::Uniform))?;
    visualization::generate_curve_plot("curve/uniform.svg", &uniform, BLUE_100, &lim)?;

    let mut custom = default_spline()?;
    custom.use_custom_preset()?;
    visualization::generate_curve_plot("curve/custom.svg", &custom, PURPLE_100, &lim)?;

    let mut dragged = default_spline()?;
    dragged.drag_knot(4, 1.25)?;
    dragged.move_control_point(2, Vec3::new(2.0, 4.0, 0.0))?;
    visualization::generate_curve_plot("curve/dragged.svg", &dragged, RED_100, &lim)?;

    Ok(())
}

fn basis_plots() -> PlotResult {
    visualization::generate_basis_plot("basis/open-uniform.svg", &default_spline()?)?;

    let uniform = BSpline::new(&Settings::default().with_knot_type(KnotType::Uniform))?;
    visualization::generate_basis_plot("basis/uniform.svg", &uniform)?;

    let mut custom = default_spline()?;
    custom.use_custom_preset()?;
    visualization::generate_basis_plot("basis/custom.svg", &custom)?;

    let closed = BSpline::new(&Settings::default().with_boundary(BoundaryPolicy::CloseLastSpan))?;
    visualization::generate_basis_plot("basis/close-last-span.svg", &closed)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    curve_plots()?;
    basis_plots()?;

    Ok(())
}
