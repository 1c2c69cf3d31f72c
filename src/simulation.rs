//! Functionality for running the fund simulation.
use crate::cohort::CohortPool;
use crate::configuration::{Configuration, MAX_FARMERS_PER_YEAR};
use crate::error::SimulationError;
use crate::format::format_number;
use crate::output::DataWriter;
use crate::summary::Summary;
use crate::units::{Hectares, Money};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod financing;
use financing::finance_new_cohort;
pub mod revenue;
use revenue::collect_revenue;

/// The state of the programme in a single simulated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// The simulation year, starting from 1
    pub year: u32,
    /// Cash in the fund before financing
    pub fund_balance_start: Money,
    /// Cash in the fund after repayments and recapitalisation
    pub fund_balance_end: Money,
    /// Farmers financed this year
    pub new_farmers: u64,
    /// Farmers financed so far
    pub total_farmers: u64,
    /// Loan repayments collected from all cohorts
    pub total_repayments: Money,
    /// Revenue from bamboo sales
    pub bamboo_revenue: Money,
    /// Revenue from carbon credits
    pub carbon_revenue: Money,
    /// Revenue re-injected into the fund on top of repayments
    pub recapitalization: Money,
    /// The operator's commission for the year
    pub operator_revenue: Money,
    /// Loans still owed by all cohorts at the end of the year
    pub outstanding_loans: Money,
}

/// The complete output of a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResults {
    /// One record per simulated year, in order
    pub years: Vec<YearRecord>,
    /// Impact metrics derived from the final state
    pub summary: Summary,
}

/// A simulation in progress, advanced one year at a time.
///
/// Each year depends on the outcome of the previous one, so years can only be simulated in order.
/// Iterating over a `Simulation` yields the record for each year. Once a year has failed, the
/// simulation is finished.
#[derive(Debug)]
pub struct Simulation<'a> {
    config: &'a Configuration,
    /// The last year simulated (0 before the first step)
    year: u32,
    fund_balance: Money,
    cohorts: CohortPool,
    total_farmers: u64,
    total_cultivated_surface: Hectares,
    operator_net_cash_flow: Money,
    failed: bool,
}

impl<'a> Simulation<'a> {
    /// Prepare a simulation of the given scenario.
    ///
    /// Fails if the configuration is invalid, before any year has been simulated.
    pub fn new(config: &'a Configuration) -> Result<Self, SimulationError> {
        config.validate()?;

        Ok(Self {
            config,
            year: 0,
            fund_balance: config.initial_fund(),
            cohorts: CohortPool::new(),
            total_farmers: 0,
            total_cultivated_surface: Hectares(0.0),
            operator_net_cash_flow: Money(0.0),
            failed: false,
        })
    }

    /// Whether every year of the scenario has been simulated
    pub fn is_finished(&self) -> bool {
        self.failed || self.year >= self.config.simulation_duration_years
    }

    /// The cohorts financed so far
    pub fn cohorts(&self) -> &CohortPool {
        &self.cohorts
    }

    /// Simulate the next year, or return `None` if the simulation is over.
    ///
    /// Fails if the fund has grown so large that the year cannot be represented, which only
    /// happens with extreme recapitalisation or repayment rates.
    pub fn step(&mut self) -> Result<Option<YearRecord>, SimulationError> {
        if self.is_finished() {
            return Ok(None);
        }

        let result = self.advance();
        self.failed = result.is_err();
        result.map(Some)
    }

    /// Simulate the year after the last one
    fn advance(&mut self) -> Result<YearRecord, SimulationError> {
        self.year += 1;
        let year = self.year;
        let config = self.config;
        let fund_balance_start = self.fund_balance;

        // Lend out as much of the fund as possible
        let cohort = finance_new_cohort(year, &mut self.fund_balance, config.cost_per_farmer());
        let new_farmers = cohort.farmer_count;
        ensure_within_range(
            year,
            new_farmers <= MAX_FARMERS_PER_YEAR,
            "more than 10^12 farmers financed in one year",
        )?;
        self.total_farmers += new_farmers;
        self.total_cultivated_surface += cohort.cultivated_surface(config.farmer_surface);
        self.cohorts.push(cohort);

        // Every cohort, including the new one, earns revenue according to its age
        let revenue = collect_revenue(year, &mut self.cohorts, config);
        let total_revenue = revenue.total();

        // Repayments and part of the revenue go back into the fund
        let recapitalization = total_revenue * config.fund_recapitalization_rate.to_fraction();
        self.fund_balance += revenue.repayments + recapitalization;

        let operator_revenue = total_revenue * config.commission_rate.to_fraction();
        self.operator_net_cash_flow += operator_revenue;
        ensure_within_range(
            year,
            self.fund_balance.is_finite() && self.operator_net_cash_flow.is_finite(),
            "fund balance is no longer a finite amount",
        )?;

        info!(
            "Year {year}: financed {new_farmers} farmers, fund balance {} -> {}",
            format_number(fund_balance_start.value(), false),
            format_number(self.fund_balance.value(), false)
        );

        Ok(YearRecord {
            year,
            fund_balance_start,
            fund_balance_end: self.fund_balance,
            new_farmers,
            total_farmers: self.total_farmers,
            total_repayments: revenue.repayments,
            bamboo_revenue: revenue.bamboo,
            carbon_revenue: revenue.carbon,
            recapitalization,
            operator_revenue,
            outstanding_loans: self.cohorts.total_loan_remaining(),
        })
    }

    /// Derive the summary metrics from the current state
    pub fn summary(&self) -> Summary {
        Summary::from_final_state(
            self.config,
            self.total_cultivated_surface,
            self.fund_balance,
            self.cohorts.total_loan_remaining(),
            self.operator_net_cash_flow,
        )
    }
}

/// Fail with [`SimulationError::Diverged`] unless `condition` holds
fn ensure_within_range(
    year: u32,
    condition: bool,
    reason: &'static str,
) -> Result<(), SimulationError> {
    if condition {
        Ok(())
    } else {
        Err(SimulationError::Diverged { year, reason })
    }
}

impl Iterator for Simulation<'_> {
    type Item = Result<YearRecord, SimulationError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}

/// Simulate the whole of a scenario.
///
/// This is a pure function of `config`: the same configuration always gives the same results.
///
/// # Returns
///
/// The year-by-year records and summary metrics, or an error if the configuration is invalid or
/// the simulation diverges, in which case no partial results are returned.
pub fn simulate(config: &Configuration) -> Result<SimulationResults, SimulationError> {
    let mut simulation = Simulation::new(config)?;
    let years = simulation.by_ref().collect::<Result<Vec<_>, _>>()?;

    Ok(SimulationResults {
        years,
        summary: simulation.summary(),
    })
}

/// Run the simulation, writing results to `output_path`.
///
/// # Arguments:
///
/// * `config` - The scenario to simulate
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write per-cohort state to an additional file
pub fn run(config: &Configuration, output_path: &Path, debug_model: bool) -> Result<()> {
    let mut writer = DataWriter::create(output_path, debug_model)?;
    let mut simulation = Simulation::new(config)?;

    info!(
        "Simulating {} years with an initial fund of {}",
        config.simulation_duration_years,
        format_number(config.initial_fund().value(), false)
    );
    while let Some(record) = simulation.step()? {
        writer.write_year(&record)?;
        writer.write_debug_cohorts(record.year, simulation.cohorts())?;
    }

    let summary = simulation.summary();
    writer.write_summary(&summary)?;
    writer.flush()?;

    for (name, value, is_percentage) in summary.iter_metrics() {
        info!("{name}: {}", format_number(value, is_percentage));
    }

    Ok(())
}
