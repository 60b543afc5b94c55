//! Chart rendering from an extracted ERA5 point series.

use era5_common::{format_timeline, UnitTransform};
use renderer::{render_line_chart, render_line_chart_png, ChartData, ChartLayout, ChartStyle};
use test_utils::era5_like_grid;

fn day_chart() -> (ChartData, Vec<f64>) {
    let grid = era5_like_grid(24, 10, 40);
    let series = grid
        .extract_point(33, 2)
        .unwrap()
        .convert(UnitTransform::KelvinToCelsius);
    let labels = format_timeline(series.time()).unwrap();
    let values = series.values().to_vec();
    (ChartData::new("Temperature", labels, values.clone()), values)
}

#[test]
fn test_day_chart_has_every_marker() {
    let (data, values) = day_chart();
    let style = ChartStyle::default();
    let img = render_line_chart(&data, &style).unwrap();

    let layout = ChartLayout::new(&style, &values).unwrap();
    let hits = values
        .iter()
        .enumerate()
        .filter(|&(i, &v)| {
            let px = img.get_pixel(layout.x_for(i).round() as u32, layout.y_for(v).round() as u32);
            *px == style.line_color
        })
        .count();
    assert_eq!(hits, 24);
}

#[test]
fn test_custom_size_png() {
    let (data, _) = day_chart();
    let style = ChartStyle {
        width: 640,
        height: 400,
        ..ChartStyle::default()
    };
    let png = render_line_chart_png(&data, &style).unwrap();
    // IHDR width and height follow the 8-byte signature and chunk header
    assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 640);
    assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 400);
}

#[test]
fn test_solid_line_style() {
    let (data, _) = day_chart();
    let style = ChartStyle {
        dash: (1.0, 0.0),
        ..ChartStyle::default()
    };
    assert!(render_line_chart(&data, &style).is_ok());
}
