use anyhow::Result;
use clap::{Parser, Subcommand};
use fio_chart::chart::chart_2d;
use fio_chart::import::{load_records, load_summary};
use fio_chart::record::{Direction, Metric};
use fio_chart::settings::{LayoutLimits, MaxOverrides, ScaleMode, Settings};
use fio_chart::ChartError;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fio-chart")]
#[command(about = "Line charts of fio benchmark logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw one chart from the fio logs in a directory
    Chart {
        /// Directory containing fio log files and JSON summaries
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short = 'T', long, default_value = "fio benchmark")]
        title: String,

        /// Defaults to workload, iodepths, numjobs and block size
        #[arg(short = 'S', long)]
        subtitle: Option<String>,

        /// Attribution printed in the bottom-right corner
        #[arg(long)]
        source: Option<String>,

        /// Metric types to plot, at most three
        #[arg(
            short = 't',
            long = "type",
            value_enum,
            num_args = 1..,
            default_values = ["iops", "lat"]
        )]
        metrics: Vec<Metric>,

        /// Data directions to plot
        #[arg(
            short,
            long,
            value_enum,
            num_args = 1..,
            default_values = ["read", "write"]
        )]
        filter: Vec<Direction>,

        #[arg(short = 'd', long, num_args = 1.., default_values = ["1"])]
        iodepth: Vec<u32>,

        #[arg(short = 'n', long, num_args = 1.., default_values = ["1"])]
        numjobs: Vec<u32>,

        /// Only plot logs of this workload, e.g. randread
        #[arg(short, long)]
        rw: Option<String>,

        /// Only plot logs of these hosts
        #[arg(long, num_args = 1..)]
        hosts: Option<Vec<String>>,

        /// Colors used instead of the default palette, in series order
        #[arg(short, long, num_args = 1..)]
        colors: Vec<String>,

        #[arg(short = 'w', long, default_value = "1")]
        line_width: u32,

        /// Vertical lines at these x positions, e.g. "10,20"
        #[arg(long)]
        vlines: Option<String>,

        /// Shaded x ranges, e.g. "5:8,30:40"
        #[arg(long)]
        vspans: Option<String>,

        #[arg(long, default_value = "false")]
        disable_fio_version: bool,

        #[arg(long, value_enum, default_value = "per-axis")]
        scale: ScaleMode,

        #[arg(long)]
        max_iops: Option<f64>,

        /// Upper bound for latency axes, in their display unit
        #[arg(long)]
        max_lat: Option<f64>,

        #[arg(long)]
        max_bw: Option<f64>,

        /// Refuse charts with more series than this
        #[arg(long)]
        max_series: Option<usize>,

        #[arg(long, default_value = "false")]
        no_markers: bool,

        #[arg(long, default_value = "1350")]
        width: u32,

        #[arg(long, default_value = "750")]
        height: u32,

        #[arg(short, long, default_value = "fio-chart.svg")]
        output: PathBuf,

        /// Report log and JSON files that were skipped
        #[arg(short, long, default_value = "false")]
        verbose: bool,
    },

    /// List the fio log records found in a directory
    List {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {:#}", err);
        if let Some(hint) = err.downcast_ref::<ChartError>().and_then(ChartError::hint) {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chart {
            input,
            title,
            subtitle,
            source,
            metrics,
            filter,
            iodepth,
            numjobs,
            rw,
            hosts,
            colors,
            line_width,
            vlines,
            vspans,
            disable_fio_version,
            scale,
            max_iops,
            max_lat,
            max_bw,
            max_series,
            no_markers,
            width,
            height,
            output,
            verbose,
        } => {
            let settings = Settings {
                title,
                subtitle,
                source,
                metrics,
                filter,
                iodepth,
                numjobs,
                rw,
                hosts,
                colors,
                line_width,
                enable_markers: !no_markers,
                vlines,
                vspans,
                disable_fio_version,
                scale,
                max: MaxOverrides {
                    iops: max_iops,
                    lat: max_lat,
                    bw: max_bw,
                },
                layout: LayoutLimits {
                    max_series,
                    ..LayoutLimits::default()
                },
                width,
                height,
                output,
            };
            draw_chart(&input, &settings, verbose)?;
        }
        Commands::List { input } => {
            list_records(&input)?;
        }
    }

    Ok(())
}

fn draw_chart(input: &Path, settings: &Settings, verbose: bool) -> Result<()> {
    let records = load_records(input, verbose)?;
    let summary = load_summary(input, verbose)?;
    if verbose {
        println!("Loaded {} log records from {}", records.len(), input.display());
        if summary.is_none() {
            println!("  No JSON summary found, block size will be unknown");
        }
    }

    chart_2d(settings, &records, summary.as_ref())?;
    Ok(())
}

fn list_records(input: &Path) -> Result<()> {
    let records = load_records(input, false)?;

    println!(
        "{:<16} {:>6} {:>8} {:>8} {:<16} {:>8}",
        "Workload", "Type", "Iodepth", "Numjobs", "Host", "Samples"
    );
    println!("{}", "-".repeat(67));
    for record in &records {
        println!(
            "{:<16} {:>6} {:>8} {:>8} {:<16} {:>8}",
            record.workload,
            record.metric.name(),
            record.iodepth,
            record.numjobs,
            record.hostname.as_deref().unwrap_or("-"),
            record.samples.len()
        );
    }
    println!("\n{} records", records.len());

    Ok(())
}
