use crate::axes::AxisSet;
use crate::encoding::{Encoding, EncodingAssignment};
use crate::normalize::{Dataset, SeriesKey};
use crate::settings::Settings;

/// A series placed on its axis with its encoding
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub key: SeriesKey,
    pub axis: usize,
    pub points: Vec<(f64, f64)>,
    pub encoding: Encoding,
}

/// Handle (line index) and label of one legend row
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub line: usize,
    pub label: String,
}

/// Keys of the series that will be drawn, in draw order
pub fn drawn_keys(dataset: &Dataset, settings: &Settings) -> Vec<SeriesKey> {
    dataset
        .series
        .iter()
        .filter(|s| settings.wants(&s.key))
        .map(|s| s.key.clone())
        .collect()
}

/// Place every wanted series on its axis. Series that fail the filters,
/// or whose metric has no axis, are left out.
pub fn plot_series(
    dataset: &Dataset,
    axes: &AxisSet,
    encodings: &EncodingAssignment,
    settings: &Settings,
) -> (Vec<PlotLine>, Vec<LegendEntry>) {
    let mut lines = Vec::new();
    let mut legend = Vec::new();

    for series in &dataset.series {
        if !settings.wants(&series.key) {
            continue;
        }
        let axis = axes.index_of(series.metric());
        let (Some(axis), Some(encoding)) = (axis, encodings.get(&series.key)) else {
            continue;
        };

        legend.push(LegendEntry {
            line: lines.len(),
            label: series.label.clone(),
        });
        lines.push(PlotLine {
            key: series.key.clone(),
            axis,
            points: series.points.clone(),
            encoding: *encoding,
        });
    }

    (lines, legend)
}
