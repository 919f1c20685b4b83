use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::{Error, Result};
use crate::models::FleetConfig;
use crate::output::{Formatter, HumanFormatter, JsonFormatter, SummaryFormatter};

#[derive(Parser, Debug)]
#[command(name = "fleet-sim")]
#[command(about = "Seed EV fleet charging locations and CDRs from a deterministic simulation")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the simulation and print the dataset
    Run(RunArgs),
    /// Print the resolved configuration without running
    ShowConfig(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// TOML or JSON file with simulation parameters
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub vehicles: Option<usize>,
    #[arg(long)]
    pub stations: Option<usize>,
    /// Charging slots per station
    #[arg(long)]
    pub capacity: Option<u32>,
    #[arg(long)]
    pub horizon_hours: Option<u64>,
    /// RFC 3339 instant of virtual time zero; defaults to midnight UTC a week ago
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FormatArg {
    #[default]
    Human,
    Summary,
    Json,
}

impl FormatArg {
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            FormatArg::Human => Box::new(HumanFormatter),
            FormatArg::Summary => Box::new(SummaryFormatter),
            FormatArg::Json => Box::new(JsonFormatter),
        }
    }
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => Error::Cli(err.to_string().trim_end().to_string()),
    })
}

/// Reads fleet parameters from a `.toml` or `.json` file. Fields left out of
/// the file keep their defaults.
pub fn load_config(path: &Path) -> Result<FleetConfig> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "cannot read fleet config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let invalid = |format: &str, err: &dyn std::fmt::Display| {
        Error::ConfigParse(format!(
            "invalid {} fleet config '{}': {}",
            format,
            path.display(),
            err
        ))
    };

    match path.extension().and_then(|value| value.to_str()) {
        Some("toml") => toml::from_str(&contents).map_err(|err| invalid("TOML", &err)),
        Some("json") => serde_json::from_str(&contents).map_err(|err| invalid("JSON", &err)),
        Some(other) => Err(Error::UnsupportedConfigFormat(other.to_string())),
        None => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
    }
}

/// Layers file values, then flags, then the default start derived from `now`.
pub fn build_config(args: &RunArgs, now: DateTime<Utc>) -> Result<FleetConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => FleetConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(vehicles) = args.vehicles {
        config.vehicles = vehicles;
    }
    if let Some(stations) = args.stations {
        config.stations = stations;
    }
    if let Some(capacity) = args.capacity {
        config.capacity_per_station = capacity;
    }
    if let Some(horizon_hours) = args.horizon_hours {
        config.horizon_hours = horizon_hours;
    }
    if let Some(start) = &args.start {
        let parsed = DateTime::parse_from_rfc3339(start)
            .map_err(|_| Error::InvalidStart(start.clone()))?;
        config.start = Some(parsed.with_timezone(&Utc));
    }
    if config.start.is_none() {
        config.start = Some(default_start(now));
    }

    config.validate()?;
    Ok(config)
}

/// Midnight UTC seven days before `now`: a week of data ending today.
pub fn default_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now);
    midnight - Duration::days(7)
}
