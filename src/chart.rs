use crate::annotate::{legend_labels, parse_vlines, parse_vspans, source_text, titles, version_text};
use crate::axes::AxisSet;
use crate::color::validate_colors;
use crate::encoding;
use crate::error::ChartError;
use crate::export::write_svg;
use crate::figure::{AxisView, Figure};
use crate::layout::{self, LayoutInput};
use crate::normalize::{axis_description, normalize};
use crate::record::{JsonDocument, LogRecord};
use crate::scale;
use crate::series::{drawn_keys, plot_series};
use crate::settings::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Assemble a chart from log records. Nothing is drawn or written here,
/// so every validation error surfaces before any output exists.
pub fn build_figure(
    settings: &Settings,
    records: &[LogRecord],
    summary: Option<&JsonDocument>,
) -> Result<Figure, ChartError> {
    validate_colors(&settings.colors)?;
    let vlines = parse_vlines(settings.vlines.as_deref())?;
    let vspans = parse_vspans(settings.vspans.as_deref())?;

    let dataset = normalize(settings, records);
    let axes = AxisSet::allocate(&dataset.datatypes)?;
    let scales = scale::resolve(&dataset.series, &axes, settings.scale, &settings.max);

    let keys = drawn_keys(&dataset, settings);
    let encodings = encoding::assign(&keys, &settings.colors, settings.enable_markers)?;
    let (lines, mut legend) = plot_series(&dataset, &axes, &encodings, settings);

    let padded = legend_labels(legend.iter().map(|e| e.label.as_str()));
    for (entry, label) in legend.iter_mut().zip(padded) {
        entry.label = label;
    }

    let layout = layout::compute(
        LayoutInput {
            series_count: lines.len(),
            max_label_len: legend.first().map(|e| e.label.chars().count()).unwrap_or(0),
            axis_count: axes.iter().len(),
            width: settings.width,
            height: settings.height,
        },
        &settings.layout,
    )?;

    let block_size = summary.and_then(JsonDocument::block_size);
    let fio_version = summary.and_then(JsonDocument::fio_version);
    let (title, subtitle) = titles(settings, block_size.as_deref());

    let x_max = lines
        .iter()
        .flat_map(|l| l.points.iter().map(|(x, _)| *x))
        .chain(vlines.iter().copied())
        .chain(vspans.iter().map(|(_, end)| *end))
        .fold(0.0_f64, f64::max);

    let axes = axes
        .iter()
        .zip(scales)
        .map(|(axis, scale)| AxisView {
            description: axis_description(axis.metric, &dataset.unit(axis.metric)),
            axis: axis.clone(),
            scale,
        })
        .collect();

    Ok(Figure {
        width: settings.width,
        height: settings.height,
        title,
        subtitle,
        axes,
        x_max: if x_max > 0.0 { x_max } else { 1.0 },
        lines,
        legend,
        vlines,
        vspans,
        version_text: version_text(settings, fio_version.as_deref()),
        source_text: source_text(settings),
        layout,
        line_width: settings.line_width.max(1),
    })
}

/// Build, draw and save one chart; returns the written path.
pub fn chart_2d(
    settings: &Settings,
    records: &[LogRecord],
    summary: Option<&JsonDocument>,
) -> Result<PathBuf> {
    let figure = build_figure(settings, records, summary)?;

    if figure.layout.near_limit {
        eprintln!(
            "Warning: {} series leave little room for the plot, consider fewer iodepths or numjobs",
            figure.lines.len()
        );
    }

    write_svg(&figure, &settings.output)?;
    Ok(settings.output.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Direction, LogSample, Metric};
    use crate::settings::LayoutLimits;
    use serde_json::json;
    use tempfile::tempdir;

    fn record(metric: Metric, iodepth: u32, value: f64) -> LogRecord {
        let samples = (1..=10)
            .flat_map(|t| {
                [Direction::Read, Direction::Write].map(|direction| LogSample {
                    time_ms: t * 1000,
                    value,
                    direction,
                    block_size: 4096,
                })
            })
            .collect();
        LogRecord {
            workload: "randrw".to_string(),
            metric,
            iodepth,
            numjobs: 1,
            hostname: None,
            samples,
        }
    }

    fn scenario() -> (Settings, Vec<LogRecord>) {
        let settings = Settings {
            iodepth: vec![1, 2],
            numjobs: vec![1],
            filter: vec![Direction::Read, Direction::Write],
            metrics: vec![Metric::Iops, Metric::Lat],
            ..Settings::default()
        };
        let records = vec![record(Metric::Iops, 1, 5000.0), record(Metric::Lat, 2, 250_000.0)];
        (settings, records)
    }

    fn summary(value: serde_json::Value) -> JsonDocument {
        JsonDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_end_to_end_figure() {
        let (settings, records) = scenario();
        let figure = build_figure(&settings, &records, None).unwrap();

        assert_eq!(figure.lines.len(), 4);
        assert_eq!(figure.axes.len(), 2);
        assert_eq!(figure.axes[0].axis.metric, Metric::Iops);
        assert_eq!(figure.axes[1].axis.metric, Metric::Lat);
        assert_eq!(figure.axes[1].description, "Latency (µs)");

        let labels: Vec<&str> = figure.legend.iter().map(|e| e.label.trim_end()).collect();
        assert_eq!(
            labels,
            vec![
                "qd1-nj1-read-iops",
                "qd1-nj1-write-iops",
                "qd2-nj1-read-lat",
                "qd2-nj1-write-lat"
            ]
        );
        assert_eq!(figure.x_max, 10.0);
    }

    #[test]
    fn test_block_size_in_subtitle() {
        let (settings, records) = scenario();

        let nested = summary(json!({
            "data": [{"job options": {"bs": "4k"}, "fio_version": "fio-3.35"}]
        }));
        let figure = build_figure(&settings, &records, Some(&nested)).unwrap();
        assert!(figure.subtitle.contains("4k"));
        assert_eq!(figure.version_text.as_deref(), Some("fio version: 3.35"));

        let flat = summary(json!({"data": [{"bs": "4k"}]}));
        let figure = build_figure(&settings, &records, Some(&flat)).unwrap();
        assert!(figure.subtitle.contains("4k"));
        assert_eq!(figure.version_text, None);

        let neither = summary(json!({"data": [{"rw": "randrw"}]}));
        let figure = build_figure(&settings, &records, Some(&neither)).unwrap();
        assert!(figure.subtitle.contains(crate::annotate::UNKNOWN_BLOCK_SIZE));
    }

    #[test]
    fn test_invalid_color_writes_nothing() {
        let (mut settings, records) = scenario();
        let dir = tempdir().unwrap();
        settings.output = dir.path().join("chart.svg");
        settings.colors = vec!["red".to_string(), "not-a-color".to_string()];

        for _ in 0..2 {
            let err = chart_2d(&settings, &records, None).unwrap_err();
            assert_eq!(
                err.downcast_ref::<ChartError>(),
                Some(&ChartError::InvalidColor {
                    value: "not-a-color".to_string()
                })
            );
        }
        assert!(!settings.output.exists());
    }

    #[test]
    fn test_too_many_series_writes_nothing() {
        let (mut settings, records) = scenario();
        let dir = tempdir().unwrap();
        settings.output = dir.path().join("chart.svg");
        settings.layout = LayoutLimits {
            max_series: Some(3),
            ..LayoutLimits::default()
        };

        let err = chart_2d(&settings, &records, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChartError>(),
            Some(ChartError::LayoutInfeasible { series: 4, .. })
        ));
        assert!(!settings.output.exists());
    }

    #[test]
    fn test_geometric_limit() {
        let settings = Settings {
            iodepth: (1..=64).collect(),
            metrics: vec![Metric::Iops],
            height: 400,
            ..Settings::default()
        };
        let records: Vec<LogRecord> = (1..=64).map(|qd| record(Metric::Iops, qd, 1.0)).collect();
        assert!(matches!(
            build_figure(&settings, &records, None),
            Err(ChartError::LayoutInfeasible { series: 128, .. })
        ));
    }

    #[test]
    fn test_three_axes() {
        let settings = Settings {
            metrics: vec![Metric::Iops, Metric::Lat, Metric::Bw],
            ..Settings::default()
        };
        let records = vec![
            record(Metric::Bw, 1, 2048.0),
            record(Metric::Lat, 1, 100.0),
            record(Metric::Iops, 1, 10.0),
        ];
        let figure = build_figure(&settings, &records, None).unwrap();
        assert_eq!(figure.axes.len(), 3);
        assert_eq!(figure.axes[2].description, "Bandwidth (MiB/s)");
        assert!(figure.layout.left > 0.2);
        // bandwidth is drawn on the third axis
        assert_eq!(figure.lines[0].axis, 2);
    }

    #[test]
    fn test_no_data() {
        let (settings, _) = scenario();
        assert_eq!(build_figure(&settings, &[], None).unwrap_err(), ChartError::NoData);
    }

    #[test]
    fn test_bad_vline_rejected_before_drawing() {
        let (mut settings, records) = scenario();
        settings.vlines = Some("3,abc".to_string());
        assert!(matches!(
            build_figure(&settings, &records, None),
            Err(ChartError::InvalidCoordinate { kind: "vline", .. })
        ));
    }

    #[test]
    fn test_chart_2d_writes_svg() {
        let (mut settings, records) = scenario();
        let dir = tempdir().unwrap();
        settings.output = dir.path().join("nested").join("chart.svg");
        settings.vlines = Some("2.5".to_string());
        settings.vspans = Some("4:6".to_string());
        settings.source = Some("test rig".to_string());

        let doc = summary(json!({"data": [{"bs": "4k", "fio_version": "fio-3.35"}]}));
        let path = chart_2d(&settings, &records, Some(&doc)).unwrap();
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("bs 4k"));
        assert!(svg.contains("fio version: 3.35"));
        assert!(svg.contains("Source: test rig"));
        assert!(svg.contains("qd2-nj1-write-lat"));
    }

    fn count_color(svg: &str, (r, g, b): (u8, u8, u8)) -> usize {
        let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
        let rgb = format!("rgb({},{},{})", r, g, b);
        let lower = svg.to_lowercase();
        lower.matches(&hex).count() + lower.replace(' ', "").matches(&rgb).count()
    }

    /// `x` and `y` attributes of the `<text>` element holding `label`
    fn text_position(svg: &str, label: &str) -> (i32, i32) {
        let end = svg.find(label).unwrap();
        let start = svg[..end].rfind("<text").unwrap();
        let tag = &svg[start..end];
        let attr = |name: &str| -> i32 {
            let key = format!(" {}=\"", name);
            let from = tag.find(&key).unwrap() + key.len();
            let len = tag[from..].find('"').unwrap();
            tag[from..from + len].parse::<f64>().unwrap().round() as i32
        };
        (attr("x"), attr("y"))
    }

    #[test]
    fn test_mixed_workloads_get_distinct_encodings() {
        let settings = Settings {
            metrics: vec![Metric::Iops],
            filter: vec![Direction::Read],
            ..Settings::default()
        };
        let mut random = record(Metric::Iops, 1, 100.0);
        random.workload = "randread".to_string();
        let mut sequential = record(Metric::Iops, 1, 200.0);
        sequential.workload = "seqread".to_string();

        let figure = build_figure(&settings, &[random, sequential], None).unwrap();
        assert_eq!(figure.lines.len(), 2);
        assert_ne!(figure.lines[0].encoding, figure.lines[1].encoding);

        let labels: Vec<&str> = figure.legend.iter().map(|e| e.label.trim_end()).collect();
        assert_eq!(
            labels,
            vec!["randread qd1-nj1-read-iops", "seqread qd1-nj1-read-iops"]
        );
    }

    #[test]
    fn test_svg_draws_span_and_dashed_vline() {
        let (mut settings, records) = scenario();
        settings.vlines = Some("2.5".to_string());
        settings.vspans = Some("4:6".to_string());

        let plain = build_figure(&scenario().0, &records, None).unwrap();
        let plain = crate::export::render_svg(&plain).unwrap();
        assert_eq!(count_color(&plain, (255, 218, 185)), 0);
        assert_eq!(count_color(&plain, (0, 0, 255)), 0);

        let figure = build_figure(&settings, &records, None).unwrap();
        let svg = crate::export::render_svg(&figure).unwrap();
        // peachpuff span fill
        assert!(count_color(&svg, (255, 218, 185)) > 0);
        // one dashed line is drawn as many short segments
        assert!(count_color(&svg, (0, 0, 255)) > 5);
    }

    #[test]
    fn test_vlines_follow_line_width() {
        let (mut settings, records) = scenario();
        settings.vlines = Some("2.5".to_string());
        settings.line_width = 3;
        let figure = build_figure(&settings, &records, None).unwrap();
        let svg = crate::export::render_svg(&figure).unwrap();

        let blue: Vec<&str> = svg
            .split('<')
            .filter(|tag| tag.starts_with("polyline") && count_color(tag, (0, 0, 255)) > 0)
            .collect();
        assert!(!blue.is_empty());
        assert!(blue.iter().all(|tag| tag.contains("stroke-width=\"3\"")));
    }

    #[test]
    fn test_svg_legend_is_column_major() {
        let (mut settings, records) = scenario();
        settings.width = 600;
        let figure = build_figure(&settings, &records, None).unwrap();
        assert_eq!(figure.layout.legend.columns, 2);
        assert_eq!(figure.layout.legend.rows, 2);

        let svg = crate::export::render_svg(&figure).unwrap();
        let first = text_position(&svg, "qd1-nj1-read-iops");
        let second = text_position(&svg, "qd1-nj1-write-iops");
        let third = text_position(&svg, "qd2-nj1-read-lat");
        let fourth = text_position(&svg, "qd2-nj1-write-lat");

        assert_eq!(first.0, second.0);
        assert!(second.1 > first.1);
        assert!(third.0 > first.0);
        assert_eq!(third, (third.0, first.1));
        assert_eq!(fourth, (third.0, second.1));
    }

    #[test]
    fn test_near_limit_still_writes_chart() {
        let (mut settings, records) = scenario();
        let dir = tempdir().unwrap();
        settings.output = dir.path().join("chart.svg");
        settings.layout = LayoutLimits {
            max_series: None,
            warn_ratio: 0.1,
        };

        assert!(build_figure(&settings, &records, None).unwrap().layout.near_limit);
        assert!(!build_figure(&scenario().0, &records, None).unwrap().layout.near_limit);

        chart_2d(&settings, &records, None).unwrap();
        assert!(settings.output.exists());
    }
}
