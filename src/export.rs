use crate::figure::Figure;
use crate::render::draw_figure;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

/// Render a figure to an SVG document in memory.
pub fn render_svg(figure: &Figure) -> Result<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (figure.width, figure.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        draw_figure(&root, figure)?;
        root.present()?;
    }
    Ok(buffer)
}

/// Render and save a figure. The file is only created once rendering succeeded.
pub fn write_svg(figure: &Figure, path: &Path) -> Result<()> {
    let svg = render_svg(figure)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    std::fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Generated: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_figure;
    use crate::record::{Direction, LogRecord, LogSample, Metric};
    use crate::settings::Settings;
    use tempfile::tempdir;

    fn figure(metrics: &[Metric]) -> Figure {
        let records: Vec<LogRecord> = metrics
            .iter()
            .map(|&metric| LogRecord {
                workload: "randread".to_string(),
                metric,
                iodepth: 1,
                numjobs: 1,
                hostname: None,
                samples: (1..=30)
                    .map(|t| LogSample {
                        time_ms: t * 500,
                        value: (t * 100) as f64,
                        direction: Direction::Read,
                        block_size: 4096,
                    })
                    .collect(),
            })
            .collect();
        let settings = Settings {
            metrics: metrics.to_vec(),
            filter: vec![Direction::Read],
            ..Settings::default()
        };
        build_figure(&settings, &records, None).unwrap()
    }

    #[test]
    fn test_render_contains_axis_descriptions() {
        let svg = render_svg(&figure(&[Metric::Iops, Metric::Lat, Metric::Bw])).unwrap();
        assert!(svg.contains("IOPS"));
        assert!(svg.contains("Latency (µs)"));
        assert!(svg.contains("Bandwidth (MiB/s)"));
        assert!(svg.contains("Time (s)"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_single_axis_without_markers() {
        let mut fig = figure(&[Metric::Iops]);
        for line in &mut fig.lines {
            line.encoding.marker = None;
        }
        let svg = render_svg(&fig).unwrap();
        assert!(svg.contains("qd1-nj1-read-iops"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("chart.svg");
        write_svg(&figure(&[Metric::Iops]), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("<svg"));
    }
}
