//! Aggregate impact metrics, derived once from the final state of a simulation.
use crate::configuration::Configuration;
use crate::finance::CARBON_FACTOR;
use crate::units::{Dimensionless, Hectares, Money, MoneyPerTonne, Percent, Tonnes};
use serde::{Deserialize, Serialize};

/// Hectares of forest spared per hectare converted to bamboo
const FOREST_SPARED_PER_HECTARE: Dimensionless = Dimensionless::new(5.0);

/// Reference deforested area of the region
const REGIONAL_DEFORESTED_AREA: Hectares = Hectares::new(4_000_000.0);

/// Reference annual CO₂ emissions of the region
const REGIONAL_EMISSIONS: Tonnes = Tonnes::new(16_000_000.0);

/// Reference irrigable area of the region
const REGIONAL_IRRIGABLE_AREA: Hectares = Hectares::new(9_000_000.0);

/// Jobs created per cultivated hectare
const JOBS_PER_HECTARE: Dimensionless = Dimensionless::new(0.13);

/// Express a ratio as a percentage
fn as_percent(ratio: Dimensionless) -> Percent {
    Percent(ratio.value() * 100.0)
}

/// The impact of the programme at the end of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Share of the region's deforestation avoided
    pub deforestation_reduction: Percent,
    /// Share of the region's CO₂ emissions offset each year
    pub carbon_emission_reduction: Percent,
    /// Share of the region's irrigable land under bamboo
    pub irrigated_surface_percentage: Percent,
    /// Number of jobs created
    pub jobs_created: u64,
    /// Land converted to bamboo over the whole simulation
    pub total_cultivated_surface: Hectares,
    /// CO₂ sequestered per year once all land is productive
    pub annual_carbon_sequestration: Tonnes,
    /// Value of bamboo and carbon credits produced per year once all land is productive
    pub annual_global_gdp: Money,
    /// Cash in the fund plus all outstanding loans
    pub final_fund_value: Money,
    /// The operator's commission and recapitalisation income per year at full production
    pub operator_annual_revenue: Money,
    /// The operator's cumulative commission plus the final fund value
    pub operator_final_balance: Money,
}

impl Summary {
    /// Derive the summary metrics from the accumulators left at the end of the simulation.
    ///
    /// # Arguments
    ///
    /// * `config` - The scenario which was simulated
    /// * `total_cultivated_surface` - Land converted by all cohorts
    /// * `fund_balance` - Cash left in the fund
    /// * `outstanding_loans` - Sum of every cohort's unpaid loan
    /// * `operator_net_cash_flow` - The operator's commission, summed over all years
    pub fn from_final_state(
        config: &Configuration,
        total_cultivated_surface: Hectares,
        fund_balance: Money,
        outstanding_loans: Money,
        operator_net_cash_flow: Money,
    ) -> Self {
        let surface = total_cultivated_surface;
        let annual_production = surface * config.bamboo_production_per_hectare;
        let annual_carbon_sequestration = annual_production * CARBON_FACTOR;
        let value_per_tonne: MoneyPerTonne =
            config.bamboo_price_per_tonne + CARBON_FACTOR * config.carbon_price_per_tonne;
        let operator_share =
            config.commission_rate.to_fraction() + config.fund_recapitalization_rate.to_fraction();
        let final_fund_value = fund_balance + outstanding_loans;

        Self {
            deforestation_reduction: as_percent(
                surface * FOREST_SPARED_PER_HECTARE / REGIONAL_DEFORESTED_AREA,
            ),
            carbon_emission_reduction: as_percent(
                annual_carbon_sequestration / REGIONAL_EMISSIONS,
            ),
            irrigated_surface_percentage: as_percent(surface / REGIONAL_IRRIGABLE_AREA),
            jobs_created: Dimensionless::new((surface * JOBS_PER_HECTARE).value()).floor_count(),
            total_cultivated_surface: surface,
            annual_carbon_sequestration,
            annual_global_gdp: annual_production * value_per_tonne,
            final_fund_value,
            operator_annual_revenue: annual_production * operator_share * value_per_tonne,
            operator_final_balance: operator_net_cash_flow + final_fund_value,
        }
    }

    /// Iterate over the metrics for display, as `(name, value, is_percentage)`
    pub fn iter_metrics(&self) -> impl Iterator<Item = (&'static str, f64, bool)> {
        [
            (
                "deforestation_reduction",
                self.deforestation_reduction.value(),
                true,
            ),
            (
                "carbon_emission_reduction",
                self.carbon_emission_reduction.value(),
                true,
            ),
            (
                "irrigated_surface_percentage",
                self.irrigated_surface_percentage.value(),
                true,
            ),
            ("jobs_created", self.jobs_created as f64, false),
            (
                "total_cultivated_surface",
                self.total_cultivated_surface.value(),
                false,
            ),
            (
                "annual_carbon_sequestration",
                self.annual_carbon_sequestration.value(),
                false,
            ),
            ("annual_global_gdp", self.annual_global_gdp.value(), false),
            ("final_fund_value", self.final_fund_value.value(), false),
            (
                "operator_annual_revenue",
                self.operator_annual_revenue.value(),
                false,
            ),
            (
                "operator_final_balance",
                self.operator_final_balance.value(),
                false,
            ),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::configuration;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_summary_from_final_state(configuration: Configuration) {
        // Final state of the reference scenario after 15 years
        let summary = Summary::from_final_state(
            &configuration,
            Hectares(16_650.0),
            Money(14_135_780.0),
            Money(54_568_340.0),
            Money(14_676_030.0),
        );

        assert_approx_eq!(
            Percent,
            summary.deforestation_reduction,
            Percent(2.08125),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Percent,
            summary.carbon_emission_reduction,
            Percent(5.4320625),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            Percent,
            summary.irrigated_surface_percentage,
            Percent(0.185),
            epsilon = 1e-9
        );
        assert_eq!(summary.jobs_created, 2164);
        assert_eq!(summary.total_cultivated_surface, Hectares(16_650.0));
        assert_approx_eq!(
            Tonnes,
            summary.annual_carbon_sequestration,
            Tonnes(869_130.0),
            epsilon = 1e-6
        );
        assert_approx_eq!(
            Money,
            summary.annual_global_gdp,
            Money(109_690_200.0),
            epsilon = 1e-6
        );
        assert_eq!(summary.final_fund_value, Money(68_704_120.0));
        assert_approx_eq!(
            Money,
            summary.operator_annual_revenue,
            Money(27_422_550.0),
            epsilon = 1e-6
        );
        assert_eq!(summary.operator_final_balance, Money(83_380_150.0));
    }

    #[rstest]
    fn test_summary_nothing_cultivated(configuration: Configuration) {
        let summary = Summary::from_final_state(
            &configuration,
            Hectares(0.0),
            Money(100.0),
            Money(0.0),
            Money(0.0),
        );

        assert_eq!(summary.deforestation_reduction, Percent(0.0));
        assert_eq!(summary.jobs_created, 0);
        assert_eq!(summary.annual_global_gdp, Money(0.0));
        assert_eq!(summary.final_fund_value, Money(100.0));
        assert_eq!(summary.operator_final_balance, Money(100.0));
    }

    #[rstest]
    fn test_iter_metrics(configuration: Configuration) {
        let summary = Summary::from_final_state(
            &configuration,
            Hectares(1000.0),
            Money(0.0),
            Money(0.0),
            Money(0.0),
        );

        let metrics: Vec<_> = summary.iter_metrics().collect();
        assert_eq!(metrics.len(), 10);
        assert_eq!(metrics[3], ("jobs_created", 130.0, false));
        assert!(metrics.iter().take(3).all(|(_, _, is_percentage)| *is_percentage));
        assert!(metrics.iter().skip(3).all(|(_, _, is_percentage)| !is_percentage));
    }
}
