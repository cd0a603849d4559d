//! Command-line interface
//!
//! Argument parsing with clap and the `aggregate` workflow: read stacked
//! runs from CSV, aggregate the requested quantities, then write the
//! results as Arrow IPC and the plot data as CSV. Every output is prepared
//! in memory first; if any write fails, files already written are removed.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use trial_aggregate::{
    AggregateSeries, AggregationConfig, Aggregator, DegeneratePolicy, ExecutionStrategy,
    MovingWindow, PlotSeries, PlotSink, ShapeHint,
};
use trial_core::{simulation_schema, DEFAULT_STEPS_PER_DAY, STEP_COLUMN, TRACKED_QUANTITIES};
use trial_polars::{combined_frame, read_trial_csv, write_ipc, CsvPlotSink, TrialStatsExt};

/// Aggregate repeated stochastic simulation runs into per-step statistics
///
/// Examples:
///   trial-stats aggregate --input runs.csv --column Severe --column Deceased
///   trial-stats aggregate --input runs.csv --output stats.arrow --plot-data plots/
///   trial-stats aggregate --input runs.csv --config aggregation.json --confidence 0.99
#[derive(Parser, Debug, Clone)]
#[command(name = "trial-stats", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Aggregate tracked quantities across trials
    Aggregate(AggregateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AggregateArgs {
    /// CSV file holding every trial, stacked trial after trial
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Quantity to aggregate, repeatable
    ///
    /// Defaults to every tracked model quantity present in the input.
    #[arg(short, long = "column", value_name = "NAME")]
    pub columns: Vec<String>,

    /// Column holding each row's step index
    #[arg(long, default_value = STEP_COLUMN, value_name = "NAME")]
    pub step_column: String,

    /// Confidence level of the intervals, in (0, 1)
    #[arg(long, value_name = "LEVEL")]
    pub confidence: Option<f64>,

    /// Moving-average window, in units of --steps-per-unit steps
    #[arg(long, value_name = "UNITS")]
    pub window: Option<usize>,

    /// Steps per window unit (the model samples 96 steps per day)
    #[arg(long, value_name = "STEPS")]
    pub steps_per_unit: Option<usize>,

    /// Expected number of trials; checked against the input
    #[arg(long, value_name = "COUNT")]
    pub trials: Option<usize>,

    /// Expected number of steps per trial; checked against the input
    #[arg(long, value_name = "COUNT")]
    pub steps: Option<usize>,

    /// Report zero-width intervals instead of failing on a single trial
    #[arg(long)]
    pub allow_single_trial: bool,

    /// Spread accumulation over threads (requires the `parallel` feature)
    #[arg(long)]
    pub parallel: bool,

    /// Arrow IPC file for the aggregated columns
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for per-quantity plot data CSV files
    #[arg(long, value_name = "DIR")]
    pub plot_data: Option<PathBuf>,

    /// JSON aggregation settings; command-line values override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl AggregateArgs {
    fn hint(&self) -> ShapeHint {
        ShapeHint {
            trial_count: self.trials,
            step_count: self.steps,
        }
    }
}

/// Settings used when no config file is given: a seven-day window
pub fn default_config() -> AggregationConfig {
    AggregationConfig::default().with_window(MovingWindow::new(7, DEFAULT_STEPS_PER_DAY))
}

/// Load aggregation settings from a JSON file
pub fn load_config(path: &Path) -> Result<AggregationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Config file (or the defaults) with command-line overrides applied
pub fn resolve_config(args: &AggregateArgs) -> Result<AggregationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config(),
    };

    if let Some(level) = args.confidence {
        config.confidence_level = level;
    }
    if let Some(length) = args.window {
        config.window.length = length;
    }
    if let Some(steps_per_unit) = args.steps_per_unit {
        config.window.steps_per_unit = steps_per_unit;
    }
    if args.allow_single_trial {
        config.degenerate = DegeneratePolicy::ZeroWidth;
    }
    if args.parallel {
        config.execution = ExecutionStrategy::Parallel;
    }
    Ok(config)
}

fn select_columns(requested: &[String], df: &DataFrame) -> Result<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested.to_vec());
    }
    let present: Vec<String> = TRACKED_QUANTITIES
        .iter()
        .filter(|name| df.column(name).is_ok())
        .map(|name| name.to_string())
        .collect();
    if present.is_empty() {
        bail!("input holds none of the tracked quantities; name columns with --column");
    }
    Ok(present)
}

/// Final-step statistics of one aggregated quantity
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub trial_count: usize,
    pub step_count: usize,
    pub final_mean: f64,
    pub final_moving_average: f64,
    pub final_lower: f64,
    pub final_upper: f64,
}

impl ColumnSummary {
    fn new(name: &str, series: &AggregateSeries) -> Option<Self> {
        let last = series.steps().last()?;
        Some(Self {
            name: name.to_string(),
            trial_count: series.layout().trial_count(),
            step_count: series.len(),
            final_mean: last.mean,
            final_moving_average: last.moving_average,
            final_lower: last.lower_bound(),
            final_upper: last.upper_bound(),
        })
    }
}

/// What an `aggregate` run produced
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub confidence_level: f64,
    pub window_steps: usize,
    pub columns: Vec<ColumnSummary>,
    pub written: Vec<PathBuf>,
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:.0}% intervals, {}-step moving average",
            self.confidence_level * 100.0,
            self.window_steps
        )?;
        for c in &self.columns {
            writeln!(
                f,
                "{:<20} trials={:<4} steps={:<6} final mean={:.4} [{:.4}, {:.4}] avg={:.4}",
                c.name,
                c.trial_count,
                c.step_count,
                c.final_mean,
                c.final_lower,
                c.final_upper,
                c.final_moving_average
            )?;
        }
        for path in &self.written {
            writeln!(f, "wrote {}", path.display())?;
        }
        Ok(())
    }
}

/// Run the `aggregate` workflow
pub fn run_aggregate(args: &AggregateArgs) -> Result<AggregateReport> {
    let config = resolve_config(args)?;
    let aggregator = Aggregator::new(config.clone()).context("invalid aggregation settings")?;
    debug!(?config, window_steps = aggregator.window_steps(), "resolved configuration");

    let df = read_trial_csv(&args.input, &simulation_schema())
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let columns = select_columns(&args.columns, &df)?;
    let names: Vec<&str> = columns.iter().map(String::as_str).collect();

    let results = df
        .trial_aggregate_series(&aggregator, &args.step_column, &names, args.hint())
        .with_context(|| format!("failed to aggregate {}", args.input.display()))?;

    // Plot x axis in window units (days for the model)
    let x_scale = config.window.steps_per_unit as f64;
    let plots = results
        .iter()
        .map(|(name, series)| series.plot_series(name, x_scale))
        .collect::<trial_core::Result<Vec<_>>>()?;
    let mut frame = combined_frame(&results)?;

    let mut written = Vec::new();
    if let Err(e) = write_outputs(args, &plots, &mut frame, &mut written) {
        for path in &written {
            if let Err(remove) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %remove, "could not remove partial output");
            }
        }
        return Err(e);
    }

    info!(columns = results.len(), files = written.len(), "aggregation complete");
    Ok(AggregateReport {
        confidence_level: aggregator.config().confidence_level,
        window_steps: aggregator.window_steps(),
        columns: results
            .iter()
            .filter_map(|(name, series)| ColumnSummary::new(name, series))
            .collect(),
        written,
    })
}

fn write_outputs(
    args: &AggregateArgs,
    plots: &[PlotSeries],
    frame: &mut DataFrame,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    if let Some(dir) = &args.plot_data {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create plot directory {}", dir.display()))?;
        let mut sink = CsvPlotSink::new();
        for plot in plots {
            sink.render(plot, &dir.join(&plot.title))
                .with_context(|| format!("failed to write plot data for {}", plot.title))?;
            if let Some(path) = sink.written().last() {
                written.push(path.clone());
            }
        }
    }

    if let Some(path) = &args.output {
        write_ipc(path, frame).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path.clone());
    }
    Ok(())
}
