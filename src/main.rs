use clap::Parser;
use fundarb::cli::{self, output, CheckCommand, Cli, Commands};
use fundarb::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => cli::run::execute(&args).await,
        Commands::Check(CheckCommand::Config(arg)) => cli::check::execute_config(&arg.config),
        Commands::Rates(arg) => cli::rates::execute(&arg.config).await,
    }
}
