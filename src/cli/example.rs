//! Code related to the bundled example scenarios and the CLI commands for interacting with them.
use super::{RunOpts, handle_run_command};
use crate::settings::Settings;
use anyhow::{Context, Result, bail, ensure};
use clap::Subcommand;
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the example scenarios.
static SCENARIOS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/scenarios");

/// The available subcommands for managing example scenarios.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List available examples.
    List,
    /// Provide information about the specified example.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Extract an example scenario to a new directory.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The destination folder for the example.
        new_path: Option<PathBuf>,
    },
    /// Run an example.
    Run {
        /// The name of the example to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_example_list_command(),
            Self::Info { name } => handle_example_info_command(&name)?,
            Self::Extract {
                name,
                new_path: dest,
            } => handle_example_extract_command(&name, dest.as_deref())?,
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// The names of the bundled example scenarios
pub fn example_names() -> impl Iterator<Item = &'static str> {
    SCENARIOS_DIR
        .dirs()
        .filter_map(|dir| dir.path().file_name())
        .filter_map(|name| name.to_str())
}

/// Handle the `example list` command.
fn handle_example_list_command() {
    for name in example_names() {
        println!("{name}");
    }
}

/// Get the README for the specified example
fn example_readme(name: &str) -> Result<&'static str> {
    let path: PathBuf = [name, "README.txt"].iter().collect();
    SCENARIOS_DIR
        .get_file(path)
        .context("Example not found.")?
        .contents_utf8()
        .context("README.txt is not UTF-8 encoded")
}

/// Handle the `example info` command.
fn handle_example_info_command(name: &str) -> Result<()> {
    println!("{}", example_readme(name)?);

    Ok(())
}

/// Handle the `example extract` command
fn handle_example_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let dest = dest.unwrap_or(Path::new(name));
    extract_example(name, dest)
}

/// Extract the specified example to a new directory
fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    // Find the subdirectory in SCENARIOS_DIR whose name matches `name`.
    let sub_dir = SCENARIOS_DIR.get_dir(name).context("Example not found.")?;

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    // Copy the contents of the subdirectory to the destination
    fs::create_dir(new_path)?;
    for entry in sub_dir.entries() {
        match entry {
            DirEntry::Dir(_) => bail!("Subdirectories in examples not supported"),
            DirEntry::File(f) => {
                let file_name = f.path().file_name().context("Invalid file in example")?;
                let file_path = new_path.join(file_name);
                fs::write(&file_path, f.contents())?;
            }
        }
    }

    Ok(())
}

/// Handle the `example run` command.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let scenario_path = temp_dir.path().join(name);
    extract_example(name, &scenario_path)?;
    handle_run_command(&scenario_path, opts, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Configuration;
    use tempfile::tempdir;

    #[test]
    fn test_example_names() {
        let names: Vec<_> = example_names().collect();
        assert!(names.contains(&"default"));
    }

    #[test]
    fn test_every_example_is_valid() {
        for name in example_names() {
            let dir = tempdir().unwrap();
            let path = dir.path().join(name);
            extract_example(name, &path).unwrap();
            assert!(example_readme(name).is_ok(), "{name} has no README");
            Configuration::from_path(&path)
                .unwrap_or_else(|err| panic!("Example {name} is invalid: {err:?}"));
        }
    }

    #[test]
    fn test_default_example_is_reference_scenario() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("default");
        extract_example("default", &path).unwrap();
        assert_eq!(
            Configuration::from_path(&path).unwrap(),
            Configuration::default()
        );
    }

    #[test]
    fn test_extract_example_existing_dest() {
        let dir = tempdir().unwrap();
        assert!(extract_example("default", dir.path()).is_err());
    }

    #[test]
    fn test_extract_example_unknown() {
        let dir = tempdir().unwrap();
        assert!(extract_example("no_such_example", &dir.path().join("x")).is_err());
    }
}
