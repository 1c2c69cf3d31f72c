//! Defines the [`Configuration`] struct, which represents the contents of `scenario.toml`.
use crate::error::SimulationError;
use crate::input::{input_err_msg, read_toml};
use crate::units::{Hectares, Money, MoneyPerHectare, MoneyPerTonne, Percent, TonnesPerHectare};
use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SCENARIO_FILE_NAME: &str = "scenario.toml";

/// The longest simulation horizon which will be accepted, in years
pub const MAX_SIMULATION_DURATION_YEARS: u32 = 1000;

/// The most farmers which may be financed in a single year.
///
/// Together with [`MAX_SIMULATION_DURATION_YEARS`] this keeps the total number of farmers well
/// within the range of a `u64`.
pub const MAX_FARMERS_PER_YEAR: u64 = 1_000_000_000_000;

/// Money units in one unit of `initial_capital`
const CAPITAL_UNIT: f64 = 1_000_000.0;

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_repayment_rate, Percent, 10.0);
define_param_default!(default_initial_capital, f64, 10.0);
define_unit_param_default!(default_investment_per_hectare, MoneyPerHectare, 5000.0);
define_unit_param_default!(default_farmer_surface, Hectares, 50.0);
define_unit_param_default!(default_bamboo_production_per_hectare, TonnesPerHectare, 30.0);
define_unit_param_default!(default_bamboo_price_per_tonne, MoneyPerTonne, 150.0);
define_param_default!(default_simulation_duration_years, u32, 15);
define_unit_param_default!(default_carbon_price_per_tonne, MoneyPerTonne, 40.0);
define_unit_param_default!(default_commission_rate, Percent, 5.0);
define_unit_param_default!(default_fund_recapitalization_rate, Percent, 20.0);

/// The parameters of a microfinance programme scenario.
///
/// Fields which are absent from `scenario.toml` take the values of the reference scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Share of each cohort's revenue applied to repaying its loan
    #[serde(default = "default_repayment_rate")]
    pub repayment_rate: Percent,
    /// Capital the fund starts with, in millions of money units
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    /// Cost of converting one hectare to bamboo
    #[serde(default = "default_investment_per_hectare")]
    pub investment_per_hectare: MoneyPerHectare,
    /// Land converted by each financed farmer
    #[serde(default = "default_farmer_surface")]
    pub farmer_surface: Hectares,
    /// Annual bamboo yield of one hectare
    #[serde(default = "default_bamboo_production_per_hectare")]
    pub bamboo_production_per_hectare: TonnesPerHectare,
    /// Sale price of a tonne of bamboo
    #[serde(default = "default_bamboo_price_per_tonne")]
    pub bamboo_price_per_tonne: MoneyPerTonne,
    /// Number of years to simulate
    #[serde(default = "default_simulation_duration_years")]
    pub simulation_duration_years: u32,
    /// Price of a carbon credit for one tonne of CO₂
    #[serde(default = "default_carbon_price_per_tonne")]
    pub carbon_price_per_tonne: MoneyPerTonne,
    /// The programme operator's cut of revenue
    #[serde(default = "default_commission_rate")]
    pub commission_rate: Percent,
    /// Share of revenue re-injected into the fund
    #[serde(default = "default_fund_recapitalization_rate")]
    pub fund_recapitalization_rate: Percent,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            repayment_rate: default_repayment_rate(),
            initial_capital: default_initial_capital(),
            investment_per_hectare: default_investment_per_hectare(),
            farmer_surface: default_farmer_surface(),
            bamboo_production_per_hectare: default_bamboo_production_per_hectare(),
            bamboo_price_per_tonne: default_bamboo_price_per_tonne(),
            simulation_duration_years: default_simulation_duration_years(),
            carbon_price_per_tonne: default_carbon_price_per_tonne(),
            commission_rate: default_commission_rate(),
            fund_recapitalization_rate: default_fund_recapitalization_rate(),
        }
    }
}

/// Check that a quantity is finite and not negative
fn check_non_negative(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfiguration {
            field,
            reason: "must be a finite number greater than or equal to zero",
        })
    }
}

/// Check that a quantity is finite and strictly positive
fn check_positive(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfiguration {
            field,
            reason: "must be a finite number greater than zero",
        })
    }
}

/// Check that the `simulation_duration_years` parameter is valid
fn check_simulation_duration(years: u32) -> Result<(), SimulationError> {
    if (1..=MAX_SIMULATION_DURATION_YEARS).contains(&years) {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfiguration {
            field: "simulation_duration_years",
            reason: "must be between 1 and 1000",
        })
    }
}

/// Warn if a rate claims more than the whole of the revenue it applies to
fn warn_if_rate_exceeds_revenue(field: &str, rate: Percent) {
    if rate.value() > 100.0 {
        warn!("`{field}` is {rate}%, which is more than the whole of the revenue it applies to");
    }
}

impl Configuration {
    /// Read a scenario file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing `scenario.toml`
    ///
    /// # Returns
    ///
    /// The validated scenario parameters or an error if the file is missing or invalid
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<Configuration> {
        let file_path = scenario_dir.as_ref().join(SCENARIO_FILE_NAME);
        let config: Configuration = read_toml(&file_path)?;

        config
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        // Permitted, but probably a typo
        warn_if_rate_exceeds_revenue("repayment_rate", config.repayment_rate);
        warn_if_rate_exceeds_revenue("commission_rate", config.commission_rate);
        warn_if_rate_exceeds_revenue(
            "fund_recapitalization_rate",
            config.fund_recapitalization_rate,
        );

        Ok(config)
    }

    /// Check that every parameter lies within its domain.
    ///
    /// Monetary, area and production values may be zero, except for the investment per hectare
    /// and the farmer surface, whose product is divided by when financing farmers.
    pub fn validate(&self) -> Result<(), SimulationError> {
        check_non_negative("repayment_rate", self.repayment_rate.value())?;
        check_non_negative("initial_capital", self.initial_capital)?;
        check_positive(
            "investment_per_hectare",
            self.investment_per_hectare.value(),
        )?;
        check_positive("farmer_surface", self.farmer_surface.value())?;
        check_non_negative(
            "bamboo_production_per_hectare",
            self.bamboo_production_per_hectare.value(),
        )?;
        check_non_negative(
            "bamboo_price_per_tonne",
            self.bamboo_price_per_tonne.value(),
        )?;
        check_simulation_duration(self.simulation_duration_years)?;
        check_non_negative(
            "carbon_price_per_tonne",
            self.carbon_price_per_tonne.value(),
        )?;
        check_non_negative("commission_rate", self.commission_rate.value())?;
        check_non_negative(
            "fund_recapitalization_rate",
            self.fund_recapitalization_rate.value(),
        )?;
        self.check_first_year_financing()?;

        Ok(())
    }

    /// Check that the first year's financing can be represented.
    ///
    /// Each field may be in range while their products are not: a huge `initial_capital` can
    /// overflow to an infinite fund, and a tiny cost per farmer can finance an unbounded number of
    /// farmers.
    fn check_first_year_financing(&self) -> Result<(), SimulationError> {
        if !self.initial_fund().is_finite() {
            return Err(SimulationError::InvalidConfiguration {
                field: "initial_capital",
                reason: "is too large to be represented in money units",
            });
        }

        let cost_per_farmer = self.cost_per_farmer();
        if !cost_per_farmer.is_finite() {
            return Err(SimulationError::InvalidConfiguration {
                field: "investment_per_hectare",
                reason: "multiplied by `farmer_surface` is too large to be represented",
            });
        }

        if (self.initial_fund() / cost_per_farmer).value() > MAX_FARMERS_PER_YEAR as f64 {
            return Err(SimulationError::InvalidConfiguration {
                field: "initial_capital",
                reason: "would finance more than 10^12 farmers in the first year",
            });
        }

        Ok(())
    }

    /// The amount of money in the fund before the first year
    pub fn initial_fund(&self) -> Money {
        Money(self.initial_capital * CAPITAL_UNIT)
    }

    /// The loan taken out by a single farmer to convert their land
    pub fn cost_per_farmer(&self) -> Money {
        self.investment_per_hectare * self.farmer_surface
    }
}
