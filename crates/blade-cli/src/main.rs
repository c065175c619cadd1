//! Turbine blade generator entry point

mod args;
mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use blade_cad::DocumentError;
use blade_core::{BladeError, DesignError, ExportError, ProjectError};
use clap::Parser;

use args::{Cli, Command};

/// Command line errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{} already exists (use --overwrite to replace it)", .0.display())]
    ProjectExists(PathBuf),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Design(#[from] DesignError),
    #[error(transparent)]
    Blade(#[from] BladeError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Init(init) => {
            let project = commands::init(&init)?;
            print!("{}", commands::design_report(&project)?);
        }
        Command::Design { project } => commands::design(&project)?,
        Command::Build(build) => {
            commands::build(&build)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blade_cli=info,blade_core=info,blade_cad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("turbine-blade: {err}");
            ExitCode::FAILURE
        }
    }
}
