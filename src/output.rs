//! The module responsible for writing output data to disk.
use crate::cohort::CohortPool;
use crate::simulation::YearRecord;
use crate::summary::Summary;
use crate::units::Money;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "bamboo_fund_results";

/// The output file name for the year-by-year records
const YEARS_FILE_NAME: &str = "years.csv";

/// The output file name for the summary metrics
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// The output file name for per-cohort state
const DEBUG_COHORTS_FILE_NAME: &str = "debug_cohorts.csv";

/// Get the default output directory for the specified scenario directory
pub fn get_output_dir(scenario_dir: &Path) -> Result<PathBuf> {
    // Get the scenario name from the dir path, checking for all possible errors
    let scenario_dir = scenario_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to scenario")?;

    let scenario_name = scenario_dir
        .file_name()
        .context("Scenario cannot be in root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory, if it doesn't already exist.
///
/// An existing directory is only reused if it is empty or `allow_overwrite` is set.
///
/// # Returns
///
/// Whether existing output files will be overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = output_dir.read_dir()?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to overwrite it."
        );

        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Represents a row in the debug cohorts CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CohortRow {
    year: u32,
    start_year: u32,
    age: u32,
    farmer_count: u64,
    loan_remaining: Money,
}

/// For writing extra debug information about the model
struct DebugDataWriter {
    cohorts_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let file_path = output_path.join(DEBUG_COHORTS_FILE_NAME);
        Ok(Self {
            cohorts_writer: csv::Writer::from_path(file_path)?,
        })
    }

    /// Write the state of every cohort at the end of `year`
    fn write_cohorts(&mut self, year: u32, cohorts: &CohortPool) -> Result<()> {
        for cohort in cohorts {
            let row = CohortRow {
                year,
                start_year: cohort.start_year,
                age: cohort.age(year),
                farmer_count: cohort.farmer_count,
                loan_remaining: cohort.loan_remaining(),
            };
            self.cohorts_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.cohorts_writer.flush()?;

        Ok(())
    }
}

/// An object for writing simulation results to file
pub struct DataWriter {
    years_writer: csv::Writer<File>,
    summary_writer: csv::Writer<File>,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let debug_writer = if save_debug_info {
            // Create debug CSV files
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            years_writer: new_writer(YEARS_FILE_NAME)?,
            summary_writer: new_writer(SUMMARY_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write the record for a single year
    pub fn write_year(&mut self, record: &YearRecord) -> Result<()> {
        self.years_writer.serialize(record)?;

        Ok(())
    }

    /// Write the summary metrics
    pub fn write_summary(&mut self, summary: &Summary) -> Result<()> {
        self.summary_writer.serialize(summary)?;

        Ok(())
    }

    /// Write per-cohort debug information, if enabled
    pub fn write_debug_cohorts(&mut self, year: u32, cohorts: &CohortPool) -> Result<()> {
        if let Some(ref mut wtr) = self.debug_writer {
            wtr.write_cohorts(year, cohorts)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.years_writer.flush()?;
        self.summary_writer.flush()?;
        if let Some(ref mut wtr) = self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}
