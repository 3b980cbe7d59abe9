use thiserror::Error;

/// Errors raised while assembling a chart, before anything is drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// A color in the override list is neither a known name nor a hex value
    #[error("color '{value}' is not a valid color")]
    InvalidColor { value: String },

    /// A vertical line or span coordinate could not be parsed
    #[error("invalid {kind} coordinate '{value}'")]
    InvalidCoordinate { kind: &'static str, value: String },

    /// The legend and margins leave no room for the plot
    #[error("cannot lay out {series} series (bottom margin {bottom:.2} exceeds {limit:.2})")]
    LayoutInfeasible {
        series: usize,
        bottom: f64,
        limit: f64,
    },

    /// More metric families were requested than there are axes
    #[error("{requested} metric types requested, at most {max} can be plotted together")]
    TooManyAxes { requested: usize, max: usize },

    /// Nothing survived the filters
    #[error("no data matched the requested types, iodepths and numjobs")]
    NoData,
}

impl ChartError {
    /// Advice shown to the user next to the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ChartError::InvalidColor { .. } => {
                Some("Use a color name such as 'red' or 'tab:blue', or a hex value like '#1f77b4'.")
            }
            ChartError::InvalidCoordinate { .. } => {
                Some("Vertical lines are comma separated numbers, spans are start:end pairs.")
            }
            ChartError::LayoutInfeasible { .. } => Some(
                "Probably too many lines in the graph; request fewer iodepths, numjobs or types.",
            ),
            ChartError::TooManyAxes { .. } => {
                Some("Pick at most three of iops, lat, bw, clat, slat.")
            }
            ChartError::NoData => None,
        }
    }
}
