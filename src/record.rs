use anyhow::{bail, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Metric families fio logs, in axis order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Metric {
    Iops,
    Lat,
    Bw,
    Clat,
    Slat,
}

impl Metric {
    pub fn all() -> &'static [Metric] {
        &[Metric::Iops, Metric::Lat, Metric::Bw, Metric::Clat, Metric::Slat]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Iops => "iops",
            Metric::Lat => "lat",
            Metric::Bw => "bw",
            Metric::Clat => "clat",
            Metric::Slat => "slat",
        }
    }

    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::all().iter().copied().find(|m| m.name() == name)
    }

    /// Latency metrics are logged in nanoseconds
    pub fn is_latency(&self) -> bool {
        matches!(self, Metric::Lat | Metric::Clat | Metric::Slat)
    }
}

/// fio data direction (`ddir` column of a log)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Direction {
    Read,
    Write,
    Trim,
}

impl Direction {
    pub fn from_ddir(ddir: u8) -> Option<Direction> {
        match ddir {
            0 => Some(Direction::Read),
            1 => Some(Direction::Write),
            2 => Some(Direction::Trim),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Read => "read",
            Direction::Write => "write",
            Direction::Trim => "trim",
        }
    }
}

/// One line of a fio log
#[derive(Debug, Clone, PartialEq)]
pub struct LogSample {
    pub time_ms: u64,
    pub value: f64,
    pub direction: Direction,
    pub block_size: u64,
}

/// One fio log, after the per-job files of a run have been merged
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Job name prefix, e.g. `randread`
    pub workload: String,
    pub metric: Metric,
    pub iodepth: u32,
    pub numjobs: u32,
    pub hostname: Option<String>,
    pub samples: Vec<LogSample>,
}

impl LogRecord {
    pub fn samples_for(&self, direction: Direction) -> impl Iterator<Item = &LogSample> + '_ {
        self.samples.iter().filter(move |s| s.direction == direction)
    }
}

type BlockSizeStrategy = fn(&Map<String, Value>) -> Option<String>;

/// Schemas seen across fio and fio-plot versions, tried in order
const BLOCK_SIZE_STRATEGIES: &[BlockSizeStrategy] =
    &[job_option_bs, job_option_blocksize, flat_bs];

fn job_option(job: &Map<String, Value>, key: &str) -> Option<String> {
    job.get("job options")
        .and_then(Value::as_object)
        .and_then(|opts| opts.get(key))
        .and_then(value_to_string)
}

fn job_option_bs(job: &Map<String, Value>) -> Option<String> {
    job_option(job, "bs")
}

fn job_option_blocksize(job: &Map<String, Value>) -> Option<String> {
    job_option(job, "blocksize")
}

fn flat_bs(job: &Map<String, Value>) -> Option<String> {
    job.get("bs").and_then(value_to_string)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A JSON summary: a list of job result objects
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JsonDocument {
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
}

impl JsonDocument {
    /// Accepts fio-plot's `{"data": [...]}` and raw fio `{"jobs": [...]}` output.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            bail!("JSON summary is not an object");
        };

        if let Some(Value::Array(jobs)) = root.remove("jobs") {
            let version = root.get("fio version").cloned();
            let data = jobs
                .into_iter()
                .filter_map(|job| match job {
                    Value::Object(mut job) => {
                        if let Some(version) = &version {
                            job.entry("fio_version").or_insert_with(|| version.clone());
                        }
                        Some(job)
                    }
                    _ => None,
                })
                .collect();
            return Ok(Self { data });
        }

        Ok(serde_json::from_value(Value::Object(root))?)
    }

    /// Block size of the first job, if any schema variant carries it
    pub fn block_size(&self) -> Option<String> {
        let job = self.data.first()?;
        BLOCK_SIZE_STRATEGIES.iter().find_map(|strategy| strategy(job))
    }

    pub fn fio_version(&self) -> Option<String> {
        self.data
            .first()
            .and_then(|job| job.get("fio_version"))
            .and_then(value_to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> JsonDocument {
        JsonDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_block_size_nested() {
        let d = doc(json!({"data": [{"job options": {"bs": "4k"}, "bs": "8k"}]}));
        assert_eq!(d.block_size().as_deref(), Some("4k"));
    }

    #[test]
    fn test_block_size_flat() {
        let d = doc(json!({"data": [{"bs": "4k"}]}));
        assert_eq!(d.block_size().as_deref(), Some("4k"));
    }

    #[test]
    fn test_block_size_blocksize_alias_and_numeric() {
        let d = doc(json!({"data": [{"job options": {"blocksize": "128k"}}]}));
        assert_eq!(d.block_size().as_deref(), Some("128k"));

        let d = doc(json!({"data": [{"bs": 4096}]}));
        assert_eq!(d.block_size().as_deref(), Some("4096"));
    }

    #[test]
    fn test_block_size_missing() {
        let d = doc(json!({"data": [{"job options": {"rw": "randread"}}]}));
        assert_eq!(d.block_size(), None);

        let empty = doc(json!({"data": []}));
        assert_eq!(empty.block_size(), None);
        assert_eq!(empty.fio_version(), None);
    }

    #[test]
    fn test_raw_fio_output() {
        let d = doc(json!({
            "fio version": "fio-3.35",
            "jobs": [{"jobname": "randread", "job options": {"bs": "4k"}}]
        }));
        assert_eq!(d.data.len(), 1);
        assert_eq!(d.fio_version().as_deref(), Some("fio-3.35"));
        assert_eq!(d.block_size().as_deref(), Some("4k"));
    }

    #[test]
    fn test_not_an_object() {
        assert!(JsonDocument::from_value(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_metric_names() {
        for metric in Metric::all() {
            assert_eq!(Metric::from_name(metric.name()), Some(*metric));
        }
        assert_eq!(Metric::from_name("throughput"), None);
        assert!(Metric::Clat.is_latency());
        assert!(!Metric::Bw.is_latency());
    }

    #[test]
    fn test_direction_from_ddir() {
        assert_eq!(Direction::from_ddir(0), Some(Direction::Read));
        assert_eq!(Direction::from_ddir(1), Some(Direction::Write));
        assert_eq!(Direction::from_ddir(2), Some(Direction::Trim));
        assert_eq!(Direction::from_ddir(3), None);
    }
}
