use crate::error::ChartError;
use crate::settings::Settings;

/// Shown in the subtitle when no JSON summary carried a block size
pub const UNKNOWN_BLOCK_SIZE: &str = "unknown";

fn join_numbers(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title and subtitle. The generated subtitle always names a block size.
pub fn titles(settings: &Settings, block_size: Option<&str>) -> (String, String) {
    let subtitle = match &settings.subtitle {
        Some(subtitle) => subtitle.clone(),
        None => {
            let workload = settings.rw.clone().unwrap_or_else(|| {
                settings
                    .filter
                    .iter()
                    .map(|d| d.name())
                    .collect::<Vec<_>>()
                    .join("/")
            });
            format!(
                "{} | iodepth {} | numjobs {} | bs {}",
                workload,
                join_numbers(&settings.iodepth),
                join_numbers(&settings.numjobs),
                block_size.unwrap_or(UNKNOWN_BLOCK_SIZE)
            )
        }
    };
    (settings.title.clone(), subtitle)
}

pub fn version_text(settings: &Settings, fio_version: Option<&str>) -> Option<String> {
    if settings.disable_fio_version {
        return None;
    }
    fio_version.map(|v| format!("fio version: {}", v.trim_start_matches("fio-")))
}

pub fn source_text(settings: &Settings) -> Option<String> {
    settings
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("Source: {}", s))
}

fn parse_coordinate(kind: &'static str, value: &str) -> Result<f64, ChartError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ChartError::InvalidCoordinate {
            kind,
            value: value.trim().to_string(),
        })
}

fn items(list: Option<&str>) -> impl Iterator<Item = &str> {
    list.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `"10, 20.5"` -> x positions of vertical reference lines
pub fn parse_vlines(list: Option<&str>) -> Result<Vec<f64>, ChartError> {
    items(list).map(|item| parse_coordinate("vline", item)).collect()
}

/// `"10:20, 30:40"` -> shaded x ranges, each ordered low to high
pub fn parse_vspans(list: Option<&str>) -> Result<Vec<(f64, f64)>, ChartError> {
    items(list)
        .map(|item| {
            let (start, end) = item.split_once(':').ok_or_else(|| ChartError::InvalidCoordinate {
                kind: "vspan",
                value: item.to_string(),
            })?;
            let start = parse_coordinate("vspan", start)?;
            let end = parse_coordinate("vspan", end)?;
            Ok((start.min(end), start.max(end)))
        })
        .collect()
}

/// Labels padded to a common width so the monospaced legend lines up
pub fn legend_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let labels: Vec<&str> = labels.into_iter().collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    labels.iter().map(|l| format!("{:<width$}", l, width = width)).collect()
}
