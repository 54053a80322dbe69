use clap::Parser;
use compliance_ctl::{
    cli::{Cli, Commands},
    config, run_command,
};
use std::path::Path;
use std::process;

fn main() {
    match run() {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> compliance_ctl::Result<bool> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Local config lives next to the scanned directory
    let project_path = match &cli.command {
        Commands::Check { args, .. } | Commands::Report { args, .. } => args.path.as_path(),
        Commands::Policies { .. } => Path::new("."),
    };
    let config = config::load_config(cli.config.as_deref(), Some(project_path))?;

    run_command(cli.command, cli.quiet, &config)
}
