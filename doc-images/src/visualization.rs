use std::{error::Error, fs, ops::Range, path::PathBuf};

use log::info;
use plotters::{backend::SVGBackend, chart::ChartContext, coord::types::RangedCoordf64, prelude::*};
use plotters_arrows::TriangleArrow;

use bspline_explorer::curve::{
    points::ControlPoints,
    sampling::{CurveSamples, KnotMarker, KnotPoint},
    BSpline,
};

use crate::PLOTS_DIR;

type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
pub type PlotResult = Result<(), Box<dyn Error>>;

const CURVE_IMG_SIZE: (u32, u32) = (600, 400);
const BASIS_IMG_SIZE: (u32, u32) = (600, 300);
const BASIS_SAMPLES: usize = 300;

// Matches the font color in docs.rs dark mode
const BACKGROUND: RGBAColor = RGBAColor(255, 255, 255, 0.81);
const POLYGON: RGBAColor = RGBAColor(120, 120, 120, 1.0);

pub struct Limits {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

fn plot_path(filename: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = PathBuf::from(PLOTS_DIR).join(filename);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    Ok(path)
}

pub fn draw_curve(chart: &mut Chart, samples: &CurveSamples, color: RGBAColor) -> PlotResult {
    let data = samples.points().iter().map(|p| (p[0], p[1]));
    chart.draw_series(LineSeries::new(data, color.stroke_width(2)))?;
    Ok(())
}

pub fn draw_direction_arrow(chart: &mut Chart, samples: &CurveSamples, style: ShapeStyle) -> PlotResult {
    let points = samples.points();
    let j = (points.len() - 1) * 9 / 10;
    let (tip, next) = (points[j], points[j + 1]);

    let direction = next - tip;
    let norm = direction.norm();
    if norm == 0.0 {
        return Ok(());
    }
    let tail = tip - direction / norm * 0.6;

    let arrow = TriangleArrow::new((tail[0], tail[1]), (tip[0], tip[1]), style).width(10).head(10);
    chart.plotting_area().draw(&arrow)?;
    Ok(())
}

pub fn draw_control_polygon(chart: &mut Chart, points: &ControlPoints, color: RGBAColor) -> PlotResult {
    let point_size = 4;
    chart.draw_series(points.iter().map(|p| Circle::new((p[0], p[1]), point_size, color.filled())))?;
    chart.draw_series(LineSeries::new(points.iter().map(|p| (p[0], p[1])), color))?;
    Ok(())
}

pub fn draw_knot_points(chart: &mut Chart, knot_points: &[KnotPoint], color: RGBAColor) -> PlotResult {
    let point_size = 3;
    chart.draw_series(
        knot_points.iter().map(|k| Circle::new((k.position[0], k.position[1]), point_size, BLACK.mix(0.8).filled())),
    )?;
    chart.draw_series(
        knot_points.iter().map(|k| Circle::new((k.position[0], k.position[1]), point_size + 1, color.stroke_width(1))),
    )?;
    Ok(())
}

pub fn generate_curve_plot(filename: &str, spline: &BSpline, color: RGBAColor, limits: &Limits) -> PlotResult {
    let path = plot_path(filename)?;
    let area = SVGBackend::new(&path, CURVE_IMG_SIZE).into_drawing_area();
    area.fill(&BACKGROUND)?;

    let mut chart_builder = ChartBuilder::on(&area);
    chart_builder.margin(10).set_left_and_bottom_label_area_size(20);

    let mut chart = chart_builder.build_cartesian_2d(limits.x.clone(), limits.y.clone())?;
    chart.configure_mesh().draw()?;

    let samples = spline.sample();
    draw_control_polygon(&mut chart, spline.control_points(), POLYGON)?;
    draw_curve(&mut chart, &samples, color)?;
    draw_knot_points(&mut chart, &spline.knot_points(), color)?;
    if spline.order() > 1 {
        draw_direction_arrow(&mut chart, &samples, color.filled())?;
    }

    area.present()?;
    info!("Result has been saved to {}", path.display());
    Ok(())
}

/// Stacks the labels of repeated knots below each other.
fn label_rows(markers: &[KnotMarker]) -> Vec<usize> {
    markers.iter().enumerate().map(|(j, m)| markers[..j].iter().filter(|o| o.value == m.value).count()).collect()
}

pub fn draw_knot_markers(chart: &mut Chart, spline: &BSpline) -> PlotResult {
    let markers = spline.knot_markers();
    let rows = label_rows(&markers);

    chart.draw_series(std::iter::once(Rectangle::new(
        [(spline.t_min(), -0.03), (spline.t_max(), 0.0)],
        BLACK.mix(0.3).filled(),
    )))?;

    chart.draw_series(markers.iter().map(|m| {
        let style = if m.in_domain { BLACK.filled() } else { BLACK.mix(0.4).filled() };
        Circle::new((m.value, 0.0), 3, style)
    }))?;

    chart.draw_series(markers.iter().zip(&rows).map(|(m, &row)| {
        let y = -0.08 - 0.07 * row as f64;
        Text::new(format!("u{}", m.index), (m.value, y), ("sans-serif", 11).into_font())
    }))?;
    Ok(())
}

pub fn generate_basis_plot(filename: &str, spline: &BSpline) -> PlotResult {
    let path = plot_path(filename)?;
    let area = SVGBackend::new(&path, BASIS_IMG_SIZE).into_drawing_area();
    area.fill(&BACKGROUND)?;

    let knots = spline.knots();
    let max_rows = label_rows(&spline.knot_markers()).into_iter().max().unwrap_or(0);
    let y_min = -0.15 - 0.07 * max_rows as f64;

    let mut chart_builder = ChartBuilder::on(&area);
    chart_builder.margin(10).set_left_and_bottom_label_area_size(20);

    let mut chart = chart_builder.build_cartesian_2d(knots.first()..knots.last(), y_min..1.1)?;
    chart.configure_mesh().draw()?;

    let count = spline.count();
    for i in 0..count {
        let color = HSLColor(i as f64 / count as f64, 0.84, 0.60);
        let sampler = spline.sample_basis(i, BASIS_SAMPLES)?;
        chart.draw_series(LineSeries::new(sampler, color.stroke_width(2)))?;
    }
    draw_knot_markers(&mut chart, spline)?;

    area.present()?;
    info!("Result has been saved to {}", path.display());
    Ok(())
}
