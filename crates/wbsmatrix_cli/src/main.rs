//! `wbsmatrix` command entry point.
//!
//! # Responsibility
//! - Parse flags, build the plan tree, and export every artifact.
//! - Map failures to one stderr line and a stable exit code.

use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wbsmatrix_core::{
    build_file, default_log_level, export, init_logging, BuildError, ExportConfig,
    GraphDirection,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_VALIDATION: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Direction {
    #[value(name = "TB", alias = "tb")]
    TopBottom,
    #[value(name = "LR", alias = "lr")]
    LeftRight,
}

impl From<Direction> for GraphDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::TopBottom => GraphDirection::TopBottom,
            Direction::LeftRight => GraphDirection::LeftRight,
        }
    }
}

/// Build WBS diagrams and a responsibility assignment matrix from a YAML plan.
#[derive(Debug, Parser)]
#[command(name = "wbsmatrix", version)]
struct Cli {
    /// Plan document to read.
    #[arg(default_value = "wbs.yaml")]
    input: PathBuf,

    /// Directory receiving the generated artifacts.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Artifact file stem; defaults to the project name.
    #[arg(long)]
    name: Option<String>,

    /// Layout direction of the tree diagram.
    #[arg(long, value_enum, default_value = "TB")]
    direction: Direction,

    /// Also render DOT files with graphviz, e.g. `pdf` or `svg`.
    #[arg(long, value_name = "FORMAT")]
    render: Option<String>,

    /// trace|debug|info|warn|error|off
    #[arg(long)]
    log_level: Option<String>,

    /// Write rotating log files here instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn export_config(&self) -> ExportConfig {
        ExportConfig {
            out_dir: self.out_dir.clone(),
            stem: self.name.clone(),
            direction: self.direction.into(),
            render_format: self.render.clone(),
        }
    }
}

#[derive(Debug)]
enum Failure {
    Validation(String),
    Other(String),
}

impl Failure {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Validation(_) => ExitCode::from(EXIT_VALIDATION),
            Self::Other(_) => ExitCode::from(EXIT_FAILURE),
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Validation(message) | Self::Other(message) => message,
        }
    }
}

impl From<BuildError> for Failure {
    fn from(err: BuildError) -> Self {
        match &err {
            BuildError::Validation(validation) => Self::Validation(validation.to_string()),
            _ => Self::Other(err.to_string()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(message) = setup_logging(&cli) {
        eprintln!("wbsmatrix: {message}");
        return ExitCode::from(EXIT_FAILURE);
    }
    info!(
        "event=app_start module=cli status=ok platform={} version={}",
        std::env::consts::OS,
        wbsmatrix_core::core_version()
    );

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!("event=app_failed module=cli status=error");
            eprintln!("wbsmatrix: {}", failure.message());
            failure.exit_code()
        }
    }
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let root = build_file(&cli.input)?;
    let report =
        export(&root, &cli.export_config()).map_err(|err| Failure::Other(err.to_string()))?;
    for path in report.written.iter().chain(&report.rendered) {
        println!("{}", path.display());
    }
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<(), String> {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = cli.log_dir.as_deref().map(absolute_dir).transpose()?;
    let log_dir = log_dir
        .as_deref()
        .map(|dir| {
            dir.to_str()
                .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", dir.display()))
        })
        .transpose()?;
    init_logging(level, log_dir)
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, String> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .map_err(|err| format!("failed to resolve current directory: {err}"))
}
