pub mod annotate;
pub mod axes;
pub mod chart;
pub mod color;
pub mod encoding;
pub mod error;
pub mod export;
pub mod figure;
pub mod import;
pub mod layout;
pub mod normalize;
pub mod record;
pub mod render;
pub mod scale;
pub mod series;
pub mod settings;

pub use chart::{build_figure, chart_2d};
pub use error::ChartError;
