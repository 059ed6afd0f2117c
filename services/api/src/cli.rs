use crate::report::{run_area_report, run_rate, run_refresh, AreaArgs, DataArgs, RateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use school_ratings::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "School Ratings",
    about = "Serve, refresh and inspect school ratings and fair area rankings",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Recompute every missing or stale rating once and print the run report
    Refresh(DataArgs),
    /// Rate one school from the loaded datasets
    Rate(RateArgs),
    /// Rank the schools of a local authority or town and summarise the area
    Area(AreaArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the directory holding the CSV exports
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Refresh(args) => run_refresh(args),
        Command::Rate(args) => run_rate(args),
        Command::Area(args) => run_area_report(args),
    }
}
