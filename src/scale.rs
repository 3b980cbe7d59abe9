use crate::axes::AxisSet;
use crate::normalize::NormalizedSeries;
use crate::record::Metric;
use crate::settings::{MaxOverrides, ScaleMode};

/// Space kept above the tallest point
const HEADROOM: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub metric: Metric,
    /// Largest value drawn on the axis
    pub max: f64,
    /// Upper Y limit, lower is always 0
    pub upper: f64,
}

/// Upper Y bounds for every axis, in axis order.
pub fn resolve(
    series: &[NormalizedSeries],
    axes: &AxisSet,
    mode: ScaleMode,
    overrides: &MaxOverrides,
) -> Vec<AxisScale> {
    let global = series.iter().map(|s| s.max).fold(0.0_f64, f64::max);

    axes.iter()
        .map(|axis| {
            let max = match mode {
                ScaleMode::Global => global,
                ScaleMode::PerAxis => series
                    .iter()
                    .filter(|s| s.metric() == axis.metric)
                    .map(|s| s.max)
                    .fold(0.0_f64, f64::max),
            };
            let upper = match overrides.for_metric(axis.metric) {
                Some(limit) if limit > 0.0 => limit,
                _ if max > 0.0 => max * HEADROOM,
                _ => 1.0,
            };
            AxisScale {
                metric: axis.metric,
                max,
                upper,
            }
        })
        .collect()
}

/// Round tick positions covering `0..=upper`, about `target` of them.
pub fn ticks(upper: f64, target: usize) -> Vec<f64> {
    if upper <= 0.0 || !upper.is_finite() || target == 0 {
        return vec![0.0];
    }

    let raw_step = upper / target as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let count = (upper / step + 1e-9).floor() as usize;
    (0..=count).map(|i| i as f64 * step).collect()
}

/// Compact tick label: 12500 -> "12.5k"
pub fn format_tick(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        trim_decimal(value / 1_000_000.0, "M")
    } else if abs >= 10_000.0 {
        trim_decimal(value / 1_000.0, "k")
    } else if abs >= 100.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else if abs >= 1.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn trim_decimal(value: f64, suffix: &str) -> String {
    let text = format!("{:.1}", value);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}
