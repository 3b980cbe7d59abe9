use crate::axes::{AxisPosition, TERTIARY_SPINE_OFFSET};
use crate::encoding::{Encoding, LineStyle, MarkerShape};
use crate::figure::Figure;
use crate::layout::{LEGEND_FONT_SIZE, PROVENANCE_FONT_SIZE, TERTIARY_LABEL_SPACE, X_LABEL_AREA};
use crate::scale::{format_tick, ticks};
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

// Font sizes
const TITLE_FONT_SIZE: u32 = 24;
const SUBTITLE_FONT_SIZE: u32 = 16;
const AXIS_LABEL_FONT_SIZE: u32 = 16;
const TICK_LABEL_FONT_SIZE: u32 = 13;

const Y_LABEL_AREA: u32 = 70;
const Y_TICKS: usize = 8;
const X_TICKS: usize = 10;
const MARKERS_PER_LINE: usize = 10;
const MARKER_SIZE: i32 = 4;
// Distance from the tertiary spine to the center of its rotated description
const TERTIARY_DESC_GAP: i32 = 50;

const SPAN_COLOR: RGBColor = RGBColor(255, 218, 185); // peachpuff
const VLINE_COLOR: RGBColor = RGBColor(0, 0, 255);

/// X pixel of the tertiary spine, `offset` plot widths left of the plot.
/// Clamped so the rotated description stays on the canvas.
pub fn tertiary_spine_x(plot_left: i32, plot_width: i32, offset: f64) -> i32 {
    let wanted = plot_left - (offset * plot_width as f64).round() as i32;
    wanted.max(TERTIARY_LABEL_SPACE as i32)
}

/// Split a pixel polyline into the visible runs of a dash pattern.
/// A `None` pattern yields the whole line as one run.
pub fn dash_segments(
    points: &[(f64, f64)],
    pattern: Option<(f64, f64)>,
) -> Vec<Vec<(f64, f64)>> {
    let Some((on, off)) = pattern.filter(|(on, off)| *on > 0.0 && *off >= 0.0) else {
        return if points.len() > 1 {
            vec![points.to_vec()]
        } else {
            Vec::new()
        };
    };

    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = points.first().copied().into_iter().collect();
    let mut drawing = true;
    let mut left = on;

    for pair in points.windows(2) {
        let (mut x0, mut y0) = pair[0];
        let (x1, y1) = pair[1];
        let mut length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();

        while length > left {
            let t = left / length;
            let split = (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
            current.push(split);
            if drawing {
                runs.push(std::mem::take(&mut current));
            }
            drawing = !drawing;
            length -= left;
            left = if drawing { on } else { off };
            (x0, y0) = split;
        }

        left -= length;
        if drawing {
            current.push((x1, y1));
        }
    }

    if drawing && current.len() > 1 {
        runs.push(current);
    }
    runs
}

fn to_pixels(run: Vec<(f64, f64)>) -> Vec<(i32, i32)> {
    run.into_iter()
        .map(|(x, y)| (x.round() as i32, y.round() as i32))
        .collect()
}

fn draw_path(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    points: &[(f64, f64)],
    style: LineStyle,
    color: RGBColor,
    width: u32,
) -> Result<()> {
    let pattern = style
        .dash_pattern()
        .map(|(on, off)| (on * width as f64, off * width as f64));
    for run in dash_segments(points, pattern) {
        root.draw(&PathElement::new(to_pixels(run), color.stroke_width(width)))?;
    }
    Ok(())
}

fn draw_marker(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    (x, y): (i32, i32),
    shape: MarkerShape,
    color: RGBColor,
) -> Result<()> {
    let r = MARKER_SIZE;
    match shape {
        MarkerShape::Circle => root.draw(&Circle::new((x, y), r, color.filled()))?,
        MarkerShape::Square => root.draw(&Rectangle::new(
            [(x - r, y - r), (x + r, y + r)],
            color.filled(),
        ))?,
        MarkerShape::TriangleUp => root.draw(&Polygon::new(
            vec![(x, y - r), (x + r, y + r), (x - r, y + r)],
            color.filled(),
        ))?,
        MarkerShape::TriangleDown => root.draw(&Polygon::new(
            vec![(x, y + r), (x + r, y - r), (x - r, y - r)],
            color.filled(),
        ))?,
        MarkerShape::Diamond => root.draw(&Polygon::new(
            vec![(x, y - r), (x + r, y), (x, y + r), (x - r, y)],
            color.filled(),
        ))?,
        MarkerShape::Cross => {
            let style = color.stroke_width(2);
            root.draw(&PathElement::new(vec![(x - r, y - r), (x + r, y + r)], style))?;
            root.draw(&PathElement::new(vec![(x - r, y + r), (x + r, y - r)], style))?;
        }
        MarkerShape::Plus => {
            let style = color.stroke_width(2);
            root.draw(&PathElement::new(vec![(x - r, y), (x + r, y)], style))?;
            root.draw(&PathElement::new(vec![(x, y - r), (x, y + r)], style))?;
        }
    }
    Ok(())
}

fn draw_swatch(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    (x, y): (i32, i32),
    swatch_width: u32,
    encoding: &Encoding,
    width: u32,
) -> Result<()> {
    let line = [(x as f64, y as f64), ((x + swatch_width as i32) as f64, y as f64)];
    draw_path(root, &line, encoding.line_style, encoding.color, width)?;
    if let Some(marker) = encoding.marker {
        draw_marker(root, (x + swatch_width as i32 / 2, y), marker, encoding.color)?;
    }
    Ok(())
}

/// Draw a complete figure onto `root`.
pub fn draw_figure(root: &DrawingArea<SVGBackend<'_>, Shift>, fig: &Figure) -> Result<()> {
    let (left, top, right, bottom) = fig.layout.plot_rect(fig.width, fig.height);
    let host = fig.host();
    let host_upper = host.scale.upper;
    let secondary = fig.axes.get(1);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin_top(top.max(0) as u32)
        .margin_left((left.max(0) as u32).saturating_sub(Y_LABEL_AREA))
        .margin_right(
            fig.width
                .saturating_sub(right.max(0) as u32)
                .saturating_sub(Y_LABEL_AREA),
        )
        .margin_bottom(
            fig.height
                .saturating_sub(bottom.max(0) as u32)
                .saturating_sub(X_LABEL_AREA),
        )
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA);
    if secondary.is_some() {
        builder.right_y_label_area_size(Y_LABEL_AREA);
    }

    let secondary_upper = secondary.map(|a| a.scale.upper).unwrap_or(host_upper);
    let mut chart = builder
        .build_cartesian_2d(0.0..fig.x_max, 0.0..host_upper)?
        .set_secondary_coord(0.0..fig.x_max, 0.0..secondary_upper);

    chart
        .configure_mesh()
        .x_labels(X_TICKS)
        .y_labels(Y_TICKS)
        .x_label_formatter(&|x| format_tick(*x))
        .y_label_formatter(&|y| format_tick(*y))
        .x_desc("Time (s)")
        .y_desc(host.description.as_str())
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    if let Some(secondary) = secondary {
        chart
            .configure_secondary_axes()
            .y_labels(Y_TICKS)
            .y_label_formatter(&|y| format_tick(*y))
            .y_desc(secondary.description.as_str())
            .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
            .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
            .draw()?;
    }

    chart.draw_series(fig.vspans.iter().map(|&(start, end)| {
        Rectangle::new([(start, 0.0), (end, host_upper)], SPAN_COLOR.mix(0.5).filled())
    }))?;

    // Every series is drawn in host coordinates
    for line in &fig.lines {
        let factor = fig.to_host(line.axis);
        let pixels: Vec<(f64, f64)> = line
            .points
            .iter()
            .map(|&(x, y)| {
                let host_y = (y * factor).clamp(0.0, host_upper);
                let (px, py) = chart.backend_coord(&(x.clamp(0.0, fig.x_max), host_y));
                (px as f64, py as f64)
            })
            .collect();

        draw_path(root, &pixels, line.encoding.line_style, line.encoding.color, fig.line_width)?;

        if let Some(marker) = line.encoding.marker {
            let step = (pixels.len() / MARKERS_PER_LINE).max(1);
            for &(px, py) in pixels.iter().skip(step / 2).step_by(step) {
                let at = (px.round() as i32, py.round() as i32);
                draw_marker(root, at, marker, line.encoding.color)?;
            }
        }
    }

    for &x in &fig.vlines {
        let (px, py_top) = chart.backend_coord(&(x, host_upper));
        let (_, py_bottom) = chart.backend_coord(&(x, 0.0));
        let line = [(px as f64, py_top as f64), (px as f64, py_bottom as f64)];
        draw_path(root, &line, LineStyle::Dashed, VLINE_COLOR, fig.line_width)?;
    }

    let (x_range, y_range) = chart.plotting_area().get_pixel_range();
    if let Some(tertiary) = fig.axes.get(2) {
        let offset = match tertiary.axis.position {
            AxisPosition::OffsetLeft { offset } => offset,
            _ => TERTIARY_SPINE_OFFSET,
        };
        let spine = tertiary_spine_x(x_range.start, x_range.end - x_range.start, offset);
        let plot_height = (y_range.end - y_range.start) as f64;

        root.draw(&PathElement::new(
            vec![(spine, y_range.start), (spine, y_range.end)],
            BLACK.stroke_width(1),
        ))?;
        let upper = tertiary.scale.upper;
        for value in ticks(upper, Y_TICKS) {
            let py = y_range.end - (value / upper * plot_height).round() as i32;
            root.draw(&PathElement::new(
                vec![(spine - 5, py), (spine, py)],
                BLACK.stroke_width(1),
            ))?;
            root.draw(&Text::new(
                format_tick(value),
                (spine - 8, py),
                ("sans-serif", TICK_LABEL_FONT_SIZE)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
        root.draw(&Text::new(
            tertiary.description.clone(),
            (spine - TERTIARY_DESC_GAP, (y_range.start + y_range.end) / 2),
            ("sans-serif", AXIS_LABEL_FONT_SIZE)
                .into_font()
                .transform(FontTransform::Rotate270)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }

    let center = fig.width as i32 / 2;
    root.draw(&Text::new(
        fig.title.clone(),
        (center, (top as f64 * 0.35) as i32),
        ("sans-serif", TITLE_FONT_SIZE)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;
    root.draw(&Text::new(
        fig.subtitle.clone(),
        (center, (top as f64 * 0.7) as i32),
        ("sans-serif", SUBTITLE_FONT_SIZE)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    // Legend: column-major grid centered under the plot
    let legend = &fig.layout.legend;
    let legend_top = fig.layout.legend_top(fig.height);
    let legend_width = legend.columns as i32 * legend.column_width as i32;
    let legend_left = ((left + right) / 2 - legend_width / 2).max(0);
    for (idx, entry) in fig.legend.iter().enumerate() {
        let Some(line) = fig.lines.get(entry.line) else {
            continue;
        };
        let (column, row) = legend.cell(idx);
        let x = legend_left + column as i32 * legend.column_width as i32;
        let y = legend_top + row as i32 * legend.row_height as i32 + legend.row_height as i32 / 2;

        draw_swatch(root, (x, y), legend.swatch_width(), &line.encoding, fig.line_width)?;
        root.draw(&Text::new(
            entry.label.clone(),
            (x + legend.swatch_width() as i32 + 6, y),
            ("monospace", LEGEND_FONT_SIZE)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }

    let provenance: Vec<&String> = fig.version_text.iter().chain(fig.source_text.iter()).collect();
    let line_height = PROVENANCE_FONT_SIZE as i32 + 4;
    for (idx, text) in provenance.iter().rev().enumerate() {
        root.draw(&Text::new(
            text.to_string(),
            (fig.width as i32 - 10, fig.height as i32 - 6 - idx as i32 * line_height),
            ("sans-serif", PROVENANCE_FONT_SIZE)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Right, VPos::Bottom)),
        ))?;
    }

    Ok(())
}
