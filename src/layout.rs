use crate::axes::TERTIARY_SPINE_OFFSET;
use crate::error::ChartError;
use crate::settings::LayoutLimits;

// Figure fractions, measured from the bottom-left corner
const BASE_BOTTOM: f64 = 0.18;
const BOTTOM_PER_SERIES: f64 = 1.0 / 120.0;
const TOP: f64 = 0.88;
const RIGHT: f64 = 0.90;
const LEFT: f64 = 0.125;
// Room for the offset third spine and its labels
const TERTIARY_LEFT: f64 = 0.21;

// Pixel sizes below the plot
pub const X_LABEL_AREA: u32 = 50;
pub const LEGEND_FONT_SIZE: u32 = 11;
pub const PROVENANCE_FONT_SIZE: u32 = 10;
const LEGEND_PAD: u32 = 8;
const LEGEND_ROW_HEIGHT: u32 = 16;
const LEGEND_SWATCH_WIDTH: u32 = 30;
const LEGEND_COLUMN_GAP: u32 = 18;
/// Pixels left of the tertiary spine for its tick labels and description
pub const TERTIARY_LABEL_SPACE: u32 = 66;
const PROVENANCE_HEIGHT: u32 = 2 * (PROVENANCE_FONT_SIZE + 4);
/// Monospace advance as a fraction of the font size
const MONO_CHAR_WIDTH: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    pub series_count: usize,
    pub max_label_len: usize,
    pub axis_count: usize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendGeometry {
    pub columns: usize,
    pub rows: usize,
    pub column_width: u32,
    pub row_height: u32,
}

impl LegendGeometry {
    pub fn swatch_width(&self) -> u32 {
        LEGEND_SWATCH_WIDTH
    }

    pub fn height(&self) -> u32 {
        self.rows as u32 * self.row_height
    }

    /// Column-major cell of entry `idx`
    pub fn cell(&self, idx: usize) -> (usize, usize) {
        let rows = self.rows.max(1);
        (idx / rows, idx % rows)
    }
}

/// Plot rectangle as figure fractions plus the legend grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParameters {
    pub bottom: f64,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub legend: LegendGeometry,
    /// Bottom margin is close to the point where the plot disappears
    pub near_limit: bool,
}

impl LayoutParameters {
    /// Plot rectangle in pixels: (left, top, right, bottom)
    pub fn plot_rect(&self, width: u32, height: u32) -> (i32, i32, i32, i32) {
        let w = width as f64;
        let h = height as f64;
        (
            (self.left * w).round() as i32,
            ((1.0 - self.top) * h).round() as i32,
            (self.right * w).round() as i32,
            ((1.0 - self.bottom) * h).round() as i32,
        )
    }

    /// Top edge of the legend block in pixels
    pub fn legend_top(&self, height: u32) -> i32 {
        let (_, _, _, plot_bottom) = self.plot_rect(1, height);
        plot_bottom + (X_LABEL_AREA + LEGEND_PAD) as i32
    }
}

fn legend_geometry(input: &LayoutInput) -> LegendGeometry {
    let text_width = input.max_label_len as f64 * LEGEND_FONT_SIZE as f64 * MONO_CHAR_WIDTH;
    let text_width = text_width.ceil() as u32;
    let column_width = LEGEND_SWATCH_WIDTH + text_width + LEGEND_COLUMN_GAP;
    let usable = (input.width as f64 * (RIGHT - LEFT + 0.05)) as u32;

    let fit = (usable / column_width.max(1)) as usize;
    let columns = fit.clamp(1, input.series_count.max(1));
    let rows = input.series_count.div_ceil(columns);

    LegendGeometry {
        columns,
        rows,
        column_width,
        row_height: LEGEND_ROW_HEIGHT,
    }
}

/// Left margin that keeps the offset spine `TERTIARY_LABEL_SPACE` px
/// from the canvas edge: left·w − offset·(right − left)·w ≥ space.
fn tertiary_left(width: u32) -> f64 {
    let space = TERTIARY_LABEL_SPACE as f64 / width.max(1) as f64;
    let needed = (space + TERTIARY_SPINE_OFFSET * RIGHT) / (1.0 + TERTIARY_SPINE_OFFSET);
    TERTIARY_LEFT.max(needed)
}

/// Size margins and the legend for one chart.
pub fn compute(input: LayoutInput, limits: &LayoutLimits) -> Result<LayoutParameters, ChartError> {
    if let Some(max) = limits.max_series {
        if input.series_count > max {
            return Err(ChartError::LayoutInfeasible {
                series: input.series_count,
                bottom: BASE_BOTTOM + input.series_count as f64 * BOTTOM_PER_SERIES,
                limit: TOP,
            });
        }
    }

    let legend = legend_geometry(&input);

    let linear = BASE_BOTTOM + input.series_count as f64 * BOTTOM_PER_SERIES;
    let needed_px = X_LABEL_AREA + LEGEND_PAD + legend.height() + PROVENANCE_HEIGHT;
    let needed = needed_px as f64 / input.height.max(1) as f64;
    let bottom = linear.max(needed);

    if bottom >= TOP {
        return Err(ChartError::LayoutInfeasible {
            series: input.series_count,
            bottom,
            limit: TOP,
        });
    }

    let left = if input.axis_count > 2 {
        tertiary_left(input.width)
    } else {
        LEFT
    };

    Ok(LayoutParameters {
        bottom,
        left,
        top: TOP,
        right: RIGHT,
        legend,
        near_limit: bottom >= TOP * limits.warn_ratio,
    })
}
