//! The revenue step: pay out carbon credits and harvests, and collect loan repayments from them.
use crate::cohort::CohortPool;
use crate::configuration::Configuration;
use crate::finance::{
    CARBON_CREDIT_AGE, FIRST_HARVEST_AGE, bamboo_harvest_revenue, carbon_credit_revenue,
    repayment_due,
};
use crate::units::Money;
use log::debug;

/// The revenue earned by all cohorts in a single year
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct YearRevenue {
    /// Loan repayments returned to the fund
    pub repayments: Money,
    /// Revenue from bamboo sales
    pub bamboo: Money,
    /// Revenue from carbon credits
    pub carbon: Money,
}

impl YearRevenue {
    /// Bamboo and carbon revenue combined
    pub fn total(&self) -> Money {
        self.bamboo + self.carbon
    }
}

/// Credit every cohort with its revenue for `year` and take repayments out of it.
///
/// A cohort earns its carbon credits once, [`CARBON_CREDIT_AGE`] years after being financed, and
/// sells a harvest every year from [`FIRST_HARVEST_AGE`] onwards. Each payment is subject to the
/// repayment rule separately.
pub fn collect_revenue(year: u32, cohorts: &mut CohortPool, config: &Configuration) -> YearRevenue {
    let repayment_rate = config.repayment_rate.to_fraction();
    let mut revenue = YearRevenue::default();

    for cohort in cohorts.iter_mut() {
        let age = cohort.age(year);
        let surface = cohort.cultivated_surface(config.farmer_surface);

        if age == CARBON_CREDIT_AGE {
            let carbon = carbon_credit_revenue(
                surface,
                config.bamboo_production_per_hectare,
                config.carbon_price_per_tonne,
            );
            let repaid =
                cohort.repay(repayment_due(carbon, repayment_rate, cohort.loan_remaining()));
            debug!(
                "Cohort of year {}: carbon credits {carbon}, repaid {repaid}",
                cohort.start_year
            );
            revenue.carbon += carbon;
            revenue.repayments += repaid;
        }

        if age >= FIRST_HARVEST_AGE {
            let bamboo = bamboo_harvest_revenue(
                surface,
                config.bamboo_production_per_hectare,
                config.bamboo_price_per_tonne,
            );
            let repaid =
                cohort.repay(repayment_due(bamboo, repayment_rate, cohort.loan_remaining()));
            debug!(
                "Cohort of year {}: bamboo sales {bamboo}, repaid {repaid}",
                cohort.start_year
            );
            revenue.bamboo += bamboo;
            revenue.repayments += repaid;
        }
    }

    revenue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::FarmerCohort;
    use crate::fixture::configuration;
    use rstest::rstest;

    /// A pool with a single cohort of 40 farmers financed in year 1
    fn single_cohort_pool(config: &Configuration) -> CohortPool {
        let mut cohorts = CohortPool::new();
        cohorts.push(FarmerCohort::new(1, 40, config.cost_per_farmer()));
        cohorts
    }

    #[rstest]
    fn test_collect_revenue_new_cohort_earns_nothing(configuration: Configuration) {
        let mut cohorts = single_cohort_pool(&configuration);
        let revenue = collect_revenue(1, &mut cohorts, &configuration);
        assert_eq!(revenue, YearRevenue::default());
    }

    #[rstest]
    fn test_collect_revenue_carbon_credits(configuration: Configuration) {
        let mut cohorts = single_cohort_pool(&configuration);
        let revenue = collect_revenue(2, &mut cohorts, &configuration);

        assert_eq!(revenue.carbon, Money(16_704_000.0));
        assert_eq!(revenue.bamboo, Money(0.0));
        assert_eq!(revenue.repayments, Money(1_670_400.0));
        assert_eq!(revenue.total(), Money(16_704_000.0));
        assert_eq!(cohorts.total_loan_remaining(), Money(8_329_600.0));
    }

    #[rstest]
    #[case(3)]
    #[case(4)]
    #[case(5)]
    fn test_collect_revenue_between_credit_and_harvest(
        configuration: Configuration,
        #[case] year: u32,
    ) {
        let mut cohorts = single_cohort_pool(&configuration);
        let revenue = collect_revenue(year, &mut cohorts, &configuration);
        assert_eq!(revenue, YearRevenue::default());
    }

    #[rstest]
    #[case(6)]
    #[case(7)]
    #[case(50)]
    fn test_collect_revenue_harvests(configuration: Configuration, #[case] year: u32) {
        let mut cohorts = single_cohort_pool(&configuration);
        let revenue = collect_revenue(year, &mut cohorts, &configuration);

        assert_eq!(revenue.carbon, Money(0.0));
        assert_eq!(revenue.bamboo, Money(9_000_000.0));
        assert_eq!(revenue.repayments, Money(900_000.0));
    }

    #[rstest]
    fn test_collect_revenue_continues_after_loan_repaid(configuration: Configuration) {
        let mut cohorts = single_cohort_pool(&configuration);
        for cohort in cohorts.iter_mut() {
            cohort.repay(Money(10_000_000.0));
        }

        let revenue = collect_revenue(20, &mut cohorts, &configuration);
        assert_eq!(revenue.bamboo, Money(9_000_000.0));
        assert_eq!(revenue.repayments, Money(0.0));
        assert_eq!(cohorts.total_loan_remaining(), Money(0.0));
    }

    #[rstest]
    fn test_collect_revenue_several_cohorts(configuration: Configuration) {
        // Matches year 6 of the reference scenario: the first cohort harvests while the cohort
        // from year 5 receives its carbon credits
        let cost = configuration.cost_per_farmer();
        let mut cohorts = CohortPool::new();
        cohorts.push(FarmerCohort::new(1, 40, cost));
        cohorts.push(FarmerCohort::new(3, 20, cost));
        cohorts.push(FarmerCohort::new(5, 10, cost));
        cohorts.push(FarmerCohort::new(6, 0, cost));

        let revenue = collect_revenue(6, &mut cohorts, &configuration);
        assert_eq!(revenue.bamboo, Money(9_000_000.0));
        assert_eq!(revenue.carbon, Money(4_176_000.0));
        assert_eq!(revenue.repayments, Money(1_317_600.0));
    }
}
