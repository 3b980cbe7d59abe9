use crate::record::{Direction, LogRecord, Metric};
use crate::settings::Settings;
use std::collections::BTreeMap;

/// Display unit of a metric family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub label: &'static str,
    /// Raw log values are divided by this
    pub divisor: f64,
}

impl Unit {
    /// Pick the unit that keeps the largest raw value readable.
    /// fio logs latency in nanoseconds and bandwidth in KiB/s.
    pub fn for_metric(metric: Metric, raw_max: f64) -> Unit {
        match metric {
            Metric::Iops => Unit {
                label: "IOPS",
                divisor: 1.0,
            },
            Metric::Bw if raw_max >= 1024.0 => Unit {
                label: "MiB/s",
                divisor: 1024.0,
            },
            Metric::Bw => Unit {
                label: "KiB/s",
                divisor: 1.0,
            },
            _ if raw_max >= 1_000_000.0 => Unit {
                label: "ms",
                divisor: 1_000_000.0,
            },
            _ if raw_max >= 1_000.0 => Unit {
                label: "µs",
                divisor: 1_000.0,
            },
            _ => Unit {
                label: "ns",
                divisor: 1.0,
            },
        }
    }
}

/// Axis description for a metric in a given unit
pub fn axis_description(metric: Metric, unit: &Unit) -> String {
    match metric {
        Metric::Iops => "IOPS".to_string(),
        Metric::Lat => format!("Latency ({})", unit.label),
        Metric::Clat => format!("Completion latency ({})", unit.label),
        Metric::Slat => format!("Submission latency ({})", unit.label),
        Metric::Bw => format!("Bandwidth ({})", unit.label),
    }
}

/// Identity of one plotted series
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub workload: String,
    pub direction: Direction,
    pub iodepth: u32,
    pub numjobs: u32,
    pub metric: Metric,
    pub hostname: Option<String>,
}

impl SeriesKey {
    pub fn label(&self) -> String {
        let base = format!(
            "qd{}-nj{}-{}-{}",
            self.iodepth,
            self.numjobs,
            self.direction.name(),
            self.metric.name()
        );
        match &self.hostname {
            Some(host) => format!("{} {}", host, base),
            None => base,
        }
    }

    /// Label naming the workload too, for charts mixing workloads
    pub fn label_with_workload(&self) -> String {
        format!("{} {}", self.workload, self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub key: SeriesKey,
    pub label: String,
    /// (seconds, value in the metric's display unit)
    pub points: Vec<(f64, f64)>,
    pub max: f64,
}

impl NormalizedSeries {
    pub fn metric(&self) -> Metric {
        self.key.metric
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// In record order, then filter order
    pub series: Vec<NormalizedSeries>,
    /// Distinct metrics present, in axis order
    pub datatypes: Vec<Metric>,
    pub units: BTreeMap<Metric, Unit>,
}

impl Dataset {
    pub fn unit(&self, metric: Metric) -> Unit {
        self.units
            .get(&metric)
            .copied()
            .unwrap_or_else(|| Unit::for_metric(metric, 0.0))
    }
}

fn include_record(settings: &Settings, record: &LogRecord) -> bool {
    settings.metrics.contains(&record.metric)
        && settings.iodepth.contains(&record.iodepth)
        && settings.numjobs.contains(&record.numjobs)
        && settings.rw.as_ref().map_or(true, |rw| *rw == record.workload)
        && settings.host_allowed(record.hostname.as_deref())
}

/// Turn raw log records into unit-scaled series.
pub fn normalize(settings: &Settings, records: &[LogRecord]) -> Dataset {
    let included: Vec<&LogRecord> = records
        .iter()
        .filter(|r| include_record(settings, r))
        .collect();

    let mut raw_max: BTreeMap<Metric, f64> = BTreeMap::new();
    for record in &included {
        let max = record
            .samples
            .iter()
            .filter(|s| settings.filter.contains(&s.direction))
            .map(|s| s.value)
            .fold(0.0_f64, f64::max);
        let entry = raw_max.entry(record.metric).or_insert(0.0);
        *entry = entry.max(max);
    }

    let mixed_workloads = included.windows(2).any(|w| w[0].workload != w[1].workload);

    let units: BTreeMap<Metric, Unit> = raw_max
        .iter()
        .map(|(metric, max)| (*metric, Unit::for_metric(*metric, *max)))
        .collect();

    let mut series = Vec::new();
    for record in &included {
        let unit = units[&record.metric];
        for &direction in &settings.filter {
            let points: Vec<(f64, f64)> = record
                .samples_for(direction)
                .map(|s| (s.time_ms as f64 / 1000.0, s.value / unit.divisor))
                .collect();
            if points.is_empty() {
                continue;
            }

            let key = SeriesKey {
                workload: record.workload.clone(),
                direction,
                iodepth: record.iodepth,
                numjobs: record.numjobs,
                metric: record.metric,
                hostname: record.hostname.clone(),
            };
            let max = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
            let label = if mixed_workloads {
                key.label_with_workload()
            } else {
                key.label()
            };
            series.push(NormalizedSeries {
                label,
                key,
                points,
                max,
            });
        }
    }

    let mut datatypes: Vec<Metric> = series.iter().map(|s| s.metric()).collect();
    datatypes.sort();
    datatypes.dedup();

    Dataset {
        series,
        datatypes,
        units,
    }
}
