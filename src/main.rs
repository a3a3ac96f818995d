use archive_rag::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Ingest { path } => cli::ingest::run(&path).await,
        Command::Evaluate { file } => cli::evaluate::run(&file).await,
    }
}
