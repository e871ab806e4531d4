use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use label_editor::autosave::{SaveError, TemplateStore};
use label_editor::config::{ConfigError, EditorConfig};
use label_editor::doc::Design;
use label_editor::mutation::Edit;
use label_editor::session::EditorSession;
use label_editor::template::{self, TemplateError};
use tracing::info;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("invalid edit list: {0}")]
    Edits(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

#[derive(Parser, Debug)]
#[command(name = "label-editor", about = "Validate label designs and replay edits against them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a stored design for structural consistency.
    Check {
        design: PathBuf,
    },
    /// Apply a JSON array of edits to a design and write the result.
    Replay {
        design: PathBuf,
        edits: PathBuf,
        /// Output path; prints to stdout when absent.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { design } => run_check(&design),
        Command::Replay { design, edits, out } => run_replay(&design, &edits, out.as_deref()),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn run_check(path: &Path) -> Result<(), CliError> {
    let design = template::design_from_json(&read(path)?)?;
    println!(
        "ok: {} sections, {} elements",
        design.sections.len(),
        design.elements.len()
    );
    Ok(())
}

fn run_replay(design_path: &Path, edits_path: &Path, out: Option<&Path>) -> Result<(), CliError> {
    let config = EditorConfig::from_env()?;
    let stored = template::design_from_json(&read(design_path)?)?;
    let edits: Vec<Edit> = serde_json::from_str(&read(edits_path)?)?;

    let mut session = EditorSession::from_template(&stored, config);
    for edit in &edits {
        session.apply(edit);
    }
    info!(
        edits = edits.len(),
        history = session.history().len(),
        "replay finished"
    );

    session.save(&mut OutputStore { out })?;
    Ok(())
}

/// Writes saved designs to a file, or stdout when no path is given.
struct OutputStore<'a> {
    out: Option<&'a Path>,
}

impl TemplateStore for OutputStore<'_> {
    fn save(&mut self, design: &Design) -> Result<(), SaveError> {
        let json = template::design_to_json(design).map_err(|e| SaveError::Rejected(e.to_string()))?;
        match self.out {
            Some(path) => fs::write(path, json).map_err(|e| SaveError::Unavailable(format!("{}: {e}", path.display()))),
            None => {
                println!("{json}");
                Ok(())
            }
        }
    }
}
