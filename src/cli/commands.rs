//! Command dispatch

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, EditOutcome, LedgerSession};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DomainError, EditMode, EditRequest};
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `alloctree --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let local_dir = local_dir(cli)?;
    let mut settings = Settings::load(Some(local_dir.as_path()))?;
    if let Some(seed) = &cli.seed {
        settings.seed_file = Some(seed.clone());
    }
    output::configure(&settings.display);

    match command {
        Commands::Show { format } => {
            let container = ServiceContainer::new(settings);
            let session = container.open_session()?;
            print_ledger(&container, &session, *format)
        }
        Commands::Set { id, value, format } => {
            let edits = [EditRequest::new(id.as_str(), value.as_str(), EditMode::Value)];
            run_edits(settings, &edits, *format)
        }
        Commands::Percent { id, percent, format } => {
            let edits = [EditRequest::new(
                id.as_str(),
                percent.as_str(),
                EditMode::Percent,
            )];
            run_edits(settings, &edits, *format)
        }
        Commands::Apply { edits, format } => {
            let edits = parse_edits(edits)?;
            run_edits(settings, &edits, *format)
        }
        Commands::Config { command } => config_command(command, &settings, &local_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| {
            CliError::from(ApplicationError::OperationFailed {
                context: "determine current directory".to_string(),
                source: Box::new(e),
            })
        }),
    }
}

fn parse_edits(raw: &[String]) -> CliResult<Vec<EditRequest>> {
    raw.iter()
        .map(|s| {
            s.parse()
                .map_err(|e: DomainError| CliError::InvalidArgs(e.to_string()))
        })
        .collect()
}

#[instrument(skip(settings))]
fn run_edits(settings: Settings, edits: &[EditRequest], format: OutputFormat) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let mut session = container.open_session()?;

    let outcomes = session.apply_all(edits);
    for (edit, outcome) in edits.iter().zip(&outcomes) {
        debug!("{} -> {:?}", edit, outcome);
        match outcome {
            EditOutcome::Applied => output::success(&format!("applied {}", edit)),
            EditOutcome::UnknownNode => {
                output::warning(&format!("no node '{}', ledger unchanged", edit.node_id))
            }
            EditOutcome::InvalidInput => output::warning(&format!(
                "'{}' is not a number, edit on '{}' dropped",
                edit.raw_input, edit.node_id
            )),
        }
    }

    print_ledger(&container, &session, format)
}

fn print_ledger(
    container: &ServiceContainer,
    session: &LedgerSession,
    format: OutputFormat,
) -> CliResult<()> {
    let text = match format {
        OutputFormat::Tree => output::render_tree(session.forest(), &container.settings.display),
        OutputFormat::Toml => toml::to_string_pretty(&session.report()).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize report".to_string(),
                source: Box::new(e),
            }
        })?,
    };
    write_stdout(&text)
}

fn config_command(command: &ConfigCommands, settings: &Settings, local_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => write_stdout(&settings.to_toml()?),
        ConfigCommands::Template => write_stdout(&Settings::template()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(no config directory)".to_string());
            let local = local_config_path(local_dir);
            write_stdout(&format!("global: {}\nlocal:  {}\n", global, local.display()))
        }
    }
}

fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| InfraError::write("stdout", e))?;
    Ok(())
}
