use crate::demo::{run_doctor_matches, run_pathway_report, DoctorMatchArgs, PathwayReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fertility_planner::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Fertility Planner",
    about = "Run the fertility treatment planner or preview its scoring from the command line",
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
    /// Score treatment pathways for an ad-hoc profile without touching the database
    Pathways(PathwayReportArgs),
    /// Rank the doctor roster from a postal code and optional preferences
    Doctors(DoctorMatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the SQLite database path (`:memory:` for a throwaway store)
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Pathways(args) => run_pathway_report(args),
        Command::Doctors(args) => run_doctor_matches(args),
    }
}
