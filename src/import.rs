use crate::record::{Direction, JsonDocument, LogRecord, LogSample, Metric};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Metadata encoded in a fio log file name:
/// `<workload>-iodepth-<N>-numjobs-<M>_<metric>.<job>.log[.<host>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileName {
    pub workload: String,
    pub iodepth: u32,
    pub numjobs: u32,
    pub metric: Metric,
    pub hostname: Option<String>,
}

impl LogFileName {
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, host) = file_name.split_once(".log")?;
        let hostname = match host {
            "" => None,
            rest => Some(rest.strip_prefix('.')?.to_string()).filter(|h| !h.is_empty()),
        };

        let (stem, job) = stem.rsplit_once('.')?;
        job.parse::<u32>().ok()?;
        let (stem, metric) = stem.rsplit_once('_')?;
        let metric = Metric::from_name(metric)?;

        let (workload, rest) = stem.split_once("-iodepth-")?;
        let (iodepth, numjobs) = rest.split_once("-numjobs-")?;

        Some(Self {
            workload: workload.to_string(),
            iodepth: iodepth.parse().ok()?,
            numjobs: numjobs.parse().ok()?,
            metric,
            hostname,
        })
    }

    fn run_key(&self) -> (String, Metric, u32, u32, Option<String>) {
        (
            self.workload.clone(),
            self.metric,
            self.iodepth,
            self.numjobs,
            self.hostname.clone(),
        )
    }
}

/// Parse the lines of a fio log: `time, value, ddir, bs[, offset]`
pub fn parse_log<R: BufRead>(reader: R) -> Result<Vec<LogSample>> {
    let mut samples = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let sample = parse_line(line)
            .with_context(|| format!("Malformed log line {}: '{}'", line_num + 1, line))?;
        samples.push(sample);
    }

    Ok(samples)
}

fn parse_line(line: &str) -> Result<LogSample> {
    let mut fields = line.split(',').map(str::trim);

    let time_ms = fields.next().unwrap_or_default().parse()?;
    let value = fields.next().unwrap_or_default().parse()?;
    let ddir: u8 = match fields.next() {
        Some(ddir) => ddir.parse()?,
        None => bail!("missing data direction"),
    };
    let Some(direction) = Direction::from_ddir(ddir) else {
        bail!("unknown data direction {}", ddir);
    };
    let block_size = match fields.next() {
        Some(bs) if !bs.is_empty() => bs.parse()?,
        _ => 0,
    };

    Ok(LogSample {
        time_ms,
        value,
        direction,
        block_size,
    })
}

/// Merge the per-job logs of one run, position by position per direction.
/// IOPS and bandwidth add up across jobs, latencies are averaged.
pub fn merge_job_logs(metric: Metric, jobs: Vec<Vec<LogSample>>) -> Vec<LogSample> {
    let mut jobs = jobs.into_iter();
    let Some(first) = jobs.next() else {
        return Vec::new();
    };
    let rest: Vec<Vec<LogSample>> = jobs.collect();
    if rest.is_empty() {
        return first;
    }

    let mut merged = Vec::with_capacity(first.len());
    for &direction in &[Direction::Read, Direction::Write, Direction::Trim] {
        let base: Vec<&LogSample> = first.iter().filter(|s| s.direction == direction).collect();
        let others: Vec<Vec<&LogSample>> = rest
            .iter()
            .map(|job| job.iter().filter(|s| s.direction == direction).collect())
            .collect();

        // Only positions every job reached are merged
        let len = others.iter().map(Vec::len).fold(base.len(), usize::min);

        for idx in 0..len {
            let total: f64 = base[idx].value + others.iter().map(|job| job[idx].value).sum::<f64>();
            let value = if metric.is_latency() {
                total / (others.len() + 1) as f64
            } else {
                total
            };
            merged.push(LogSample {
                value,
                ..base[idx].clone()
            });
        }
    }

    merged.sort_by_key(|s| s.time_ms);
    merged
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Load every fio log in `dir`, merging the job files of each run.
pub fn load_records(dir: &Path, verbose: bool) -> Result<Vec<LogRecord>> {
    let mut runs: Vec<(LogFileName, Vec<Vec<LogSample>>)> = Vec::new();
    let mut index: HashMap<(String, Metric, u32, u32, Option<String>), usize> = HashMap::new();

    for path in sorted_entries(dir)? {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(meta) = LogFileName::parse(file_name) else {
            if verbose && file_name.contains(".log") {
                eprintln!("  Skipping {} (unrecognized log file name)", path.display());
            }
            continue;
        };

        let file = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        let samples = parse_log(std::io::BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let slot = *index.entry(meta.run_key()).or_insert_with(|| {
            runs.push((meta.clone(), Vec::new()));
            runs.len() - 1
        });
        runs[slot].1.push(samples);
    }

    let mut records: Vec<LogRecord> = runs
        .into_iter()
        .map(|(meta, jobs)| LogRecord {
            samples: merge_job_logs(meta.metric, jobs),
            workload: meta.workload,
            metric: meta.metric,
            iodepth: meta.iodepth,
            numjobs: meta.numjobs,
            hostname: meta.hostname,
        })
        .collect();

    records.sort_by(|a, b| {
        (&a.workload, a.iodepth, a.numjobs, a.metric, &a.hostname).cmp(&(
            &b.workload,
            b.iodepth,
            b.numjobs,
            b.metric,
            &b.hostname,
        ))
    });

    Ok(records)
}

/// Parse a JSON summary. Text before the first `{` (fio warnings) and
/// after the first complete value is ignored.
pub fn parse_summary(text: &str) -> Result<JsonDocument> {
    let start = text.find('{').context("No JSON object found")?;
    let value: serde_json::Value = serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<serde_json::Value>()
        .next()
        .context("No JSON object found")??;
    JsonDocument::from_value(value)
}

fn read_summary(path: &Path) -> Result<JsonDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_summary(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// First JSON summary in `dir` (by file name) that holds job data.
/// The summary only adds metadata, so unreadable files are skipped.
pub fn load_summary(dir: &Path, verbose: bool) -> Result<Option<JsonDocument>> {
    for path in sorted_entries(dir)? {
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read_summary(&path) {
            Ok(document) if !document.data.is_empty() => return Ok(Some(document)),
            Ok(_) => {}
            Err(err) => {
                if verbose {
                    eprintln!("  Skipping {}: {:#}", path.display(), err);
                }
            }
        }
    }
    Ok(None)
}
