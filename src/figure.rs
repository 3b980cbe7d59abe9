use crate::axes::Axis;
use crate::layout::LayoutParameters;
use crate::scale::AxisScale;
use crate::series::{LegendEntry, PlotLine};

/// One Y-axis as it will be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct AxisView {
    pub axis: Axis,
    pub scale: AxisScale,
    pub description: String,
}

/// Everything needed to draw one chart, independent of the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub subtitle: String,
    /// Host first, then secondary and tertiary
    pub axes: Vec<AxisView>,
    pub x_max: f64,
    pub lines: Vec<PlotLine>,
    pub legend: Vec<LegendEntry>,
    pub vlines: Vec<f64>,
    pub vspans: Vec<(f64, f64)>,
    pub version_text: Option<String>,
    pub source_text: Option<String>,
    pub layout: LayoutParameters,
    pub line_width: u32,
}

impl Figure {
    pub fn host(&self) -> &AxisView {
        &self.axes[0]
    }

    /// Factor mapping a value on axis `idx` into host coordinates.
    /// All axes start at zero, so a single ratio is enough.
    pub fn to_host(&self, idx: usize) -> f64 {
        self.host().scale.upper / self.axes[idx].scale.upper
    }
}
