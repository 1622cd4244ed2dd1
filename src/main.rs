use clap::Parser;
use slicekeeper::cli::{check, run, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::execute_config(&arg.config),
        Commands::Check(CheckCommand::Chain(arg)) => check::execute_chain(&arg.config).await,
    };

    if let Err(e) = result {
        eprintln!("✗ Error: {e}");
        std::process::exit(1);
    }
}
