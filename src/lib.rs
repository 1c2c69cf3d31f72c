//! Common functionality for bamboo-fund.
//!
//! Simulates a revolving microfinance fund which lends to cohorts of bamboo farmers and is
//! replenished from their loan repayments and a share of their bamboo and carbon-credit revenue.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod cohort;
pub mod configuration;
pub mod error;
pub mod finance;
pub mod format;
pub mod input;
pub mod log;
pub mod output;
pub mod settings;
pub mod simulation;
pub mod summary;
pub mod units;

pub use simulation::simulate;

#[cfg(test)]
mod fixture;

/// Get the folder in which the program's configuration files are stored
pub fn get_bamboo_fund_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform: fall back to the current directory
        return PathBuf::new();
    };

    config_dir.push("bamboo-fund");
    config_dir
}
