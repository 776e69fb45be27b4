use crate::commands::{run_credential_set, run_evaluate, CredentialSetArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use proposal_eval::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Proposal Evaluator",
    about = "Score and rank competing vendor proposals from the command line or over HTTP",
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
    /// Rank 2-3 proposal text files and export the results
    Evaluate(EvaluateArgs),
    /// Manage the remote scorer credential
    Credential {
        #[command(subcommand)]
        command: CredentialCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CredentialCommand {
    /// Store or replace the credential for a scoring service
    Set(CredentialSetArgs),
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
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Credential {
            command: CredentialCommand::Set(args),
        } => run_credential_set(args),
    }
}
