use crate::normalize::SeriesKey;
use crate::record::{Direction, Metric};
use std::path::PathBuf;

/// How Y-axis upper bounds are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ScaleMode {
    /// Each axis scales to the series drawn on it
    #[default]
    PerAxis,
    /// Every axis shares the largest value of all series
    Global,
}

/// Explicit Y-axis maxima per metric family
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaxOverrides {
    pub iops: Option<f64>,
    pub lat: Option<f64>,
    pub bw: Option<f64>,
}

impl MaxOverrides {
    pub fn for_metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Iops => self.iops,
            Metric::Bw => self.bw,
            Metric::Lat | Metric::Clat | Metric::Slat => self.lat,
        }
    }
}

/// Bounds on how crowded a chart may get
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLimits {
    /// Hard cap on drawn series, on top of the geometric limit
    pub max_series: Option<usize>,
    /// Fraction of the usable height at which a warning is printed
    pub warn_ratio: f64,
}

impl Default for LayoutLimits {
    fn default() -> Self {
        Self {
            max_series: None,
            warn_ratio: 0.9,
        }
    }
}

/// Everything one chart render needs to know
#[derive(Debug, Clone)]
pub struct Settings {
    pub title: String,
    pub subtitle: Option<String>,
    /// Attribution printed under the legend
    pub source: Option<String>,
    /// Metric families to plot ("type")
    pub metrics: Vec<Metric>,
    /// Data directions to plot
    pub filter: Vec<Direction>,
    pub iodepth: Vec<u32>,
    pub numjobs: Vec<u32>,
    /// Only plot logs of this workload, e.g. `randread`
    pub rw: Option<String>,
    /// Only plot logs of these hosts
    pub hosts: Option<Vec<String>>,
    /// Color overrides, consumed in series order
    pub colors: Vec<String>,
    pub line_width: u32,
    pub enable_markers: bool,
    /// Comma separated x coordinates
    pub vlines: Option<String>,
    /// Comma separated `start:end` pairs
    pub vspans: Option<String>,
    pub disable_fio_version: bool,
    pub scale: ScaleMode,
    pub max: MaxOverrides,
    pub layout: LayoutLimits,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "fio benchmark".to_string(),
            subtitle: None,
            source: None,
            metrics: vec![Metric::Iops, Metric::Lat],
            filter: vec![Direction::Read, Direction::Write],
            iodepth: vec![1],
            numjobs: vec![1],
            rw: None,
            hosts: None,
            colors: Vec::new(),
            line_width: 1,
            enable_markers: true,
            vlines: None,
            vspans: None,
            disable_fio_version: false,
            scale: ScaleMode::PerAxis,
            max: MaxOverrides::default(),
            layout: LayoutLimits::default(),
            width: 1350,
            height: 750,
            output: PathBuf::from("fio-chart.svg"),
        }
    }
}

impl Settings {
    pub fn host_allowed(&self, hostname: Option<&str>) -> bool {
        match (&self.hosts, hostname) {
            (None, _) => true,
            (Some(hosts), Some(host)) => hosts.iter().any(|h| h == host),
            (Some(_), None) => false,
        }
    }

    /// Whether a series passes the direction and host filters
    pub fn wants(&self, key: &SeriesKey) -> bool {
        self.filter.contains(&key.direction)
            && self.metrics.contains(&key.metric)
            && self.host_allowed(key.hostname.as_deref())
    }
}
