use anyhow::Result;
use archmap::cli::{Cli, Commands};
use archmap::commands::analyze::AnalyzeConfig;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            config,
            profile,
        } => archmap::commands::analyze::handle_analyze(AnalyzeConfig {
            path,
            format,
            output,
            config,
            profile,
        }),
        Commands::Init { force } => archmap::commands::init::init_config(force),
    }
}
