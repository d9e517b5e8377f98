use crate::commands::{run_score, run_weights, ScoreArgs, WeightsCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_qualifier::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Qualifier",
    about = "Score drone-services leads and manage the qualification weight table",
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
    /// Score one set of questionnaire answers against the current weights
    Score(ScoreArgs),
    /// Inspect or edit the persisted weight table
    Weights {
        #[command(subcommand)]
        command: WeightsCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Weights { command } => run_weights(command),
    }
}
