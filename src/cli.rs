//! The command line interface for the simulation.
use crate::configuration::Configuration;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir};
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the simulation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to write the state of every cohort to an additional CSV file
    #[arg(long)]
    pub debug_model: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run a scenario.
    Run {
        /// Path to the scenario directory.
        scenario_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage bundled example scenarios.
    Example {
        /// The available subcommands for managing example scenarios.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a scenario.
    Validate {
        /// The path to the scenario directory.
        scenario_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { scenario_dir, opts } => handle_run_command(&scenario_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { scenario_dir } => handle_validate_command(&scenario_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ bamboo-fund --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = load_settings(settings)?;

    // These settings can be overridden by command-line arguments
    if opts.debug_model {
        settings.debug_model = true;
    }
    if opts.overwrite {
        settings.overwrite = true;
    }

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(scenario_path)?;
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    // Load the scenario to run
    let config = Configuration::from_path(scenario_path).context("Failed to load scenario.")?;
    info!("Loaded scenario from {}", scenario_path.display());
    info!("Output folder: {}", output_path.display());

    write_metadata(output_path, scenario_path, &config)
        .context("Failed to save metadata.")?;

    // Run the simulation
    crate::simulation::run(&config, output_path, settings.debug_model)?;
    info!("Simulation complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(scenario_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the scenario
    Configuration::from_path(scenario_path).context("Failed to validate scenario.")?;
    info!("Scenario validation successful!");

    Ok(())
}
