use chrono::Utc;
use fleet_sim::config::{self, Command, RunArgs};
use fleet_sim::engine;
use fleet_sim::error::Result;
use fleet_sim::output::describe_config;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = config::parse_args()?;
    match cli.command {
        Some(Command::Run(args)) => simulate(&args),
        Some(Command::ShowConfig(args)) => {
            let config = config::build_config(&args, Utc::now())?;
            print!("{}", describe_config(&config));
            Ok(())
        }
        None => simulate(&cli.run),
    }
}

fn simulate(args: &RunArgs) -> Result<()> {
    let config = config::build_config(args, Utc::now())?;
    let dataset = engine::generate(&config)?;

    print!("{}", args.format.formatter().write(&dataset)?);
    Ok(())
}

