//! General functions related to cohort revenue and loan repayment.
use crate::units::{Dimensionless, Hectares, Money, MoneyPerTonne, TonnesPerHectare};

/// Tonnes of CO₂ sequestered per tonne of bamboo produced
pub const CARBON_FACTOR: Dimensionless = Dimensionless::new(1.74);

/// Years of sequestration which are credited in the single carbon-credit payment
pub const CARBON_ACCRUAL_YEARS: Dimensionless = Dimensionless::new(4.0);

/// Cohort age at which the carbon-credit payment is received
pub const CARBON_CREDIT_AGE: u32 = 1;

/// Cohort age of the first bamboo harvest. Harvests recur every year from then on.
pub const FIRST_HARVEST_AGE: u32 = 5;

/// The one-off carbon-credit revenue of a converted area.
///
/// This covers [`CARBON_ACCRUAL_YEARS`] years of sequestration, paid as a lump sum.
pub fn carbon_credit_revenue(
    surface: Hectares,
    production: TonnesPerHectare,
    carbon_price: MoneyPerTonne,
) -> Money {
    surface * production * CARBON_FACTOR * carbon_price * CARBON_ACCRUAL_YEARS
}

/// The revenue of one year's bamboo harvest from a converted area
pub fn bamboo_harvest_revenue(
    surface: Hectares,
    production: TonnesPerHectare,
    bamboo_price: MoneyPerTonne,
) -> Money {
    surface * production * bamboo_price
}

/// The amount a cohort owes out of `revenue`: a fixed share, but never more than its loan.
pub fn repayment_due(
    revenue: Money,
    repayment_rate: Dimensionless,
    loan_remaining: Money,
) -> Money {
    (revenue * repayment_rate).min(loan_remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(2000.0, 30.0, 40.0, 16_704_000.0)]
    #[case(500.0, 30.0, 40.0, 4_176_000.0)]
    #[case(0.0, 30.0, 40.0, 0.0)] // No land
    #[case(2000.0, 30.0, 0.0, 0.0)] // Worthless credits
    fn test_carbon_credit_revenue(
        #[case] surface: f64,
        #[case] production: f64,
        #[case] carbon_price: f64,
        #[case] expected: f64,
    ) {
        let result = carbon_credit_revenue(
            Hectares(surface),
            TonnesPerHectare(production),
            MoneyPerTonne(carbon_price),
        );
        assert_approx_eq!(Money, result, Money(expected), epsilon = 1e-6);
    }

    #[rstest]
    #[case(2000.0, 30.0, 150.0, 9_000_000.0)]
    #[case(1000.0, 80.0, 500.0, 40_000_000.0)]
    #[case(2000.0, 0.0, 150.0, 0.0)] // Nothing grows
    fn test_bamboo_harvest_revenue(
        #[case] surface: f64,
        #[case] production: f64,
        #[case] bamboo_price: f64,
        #[case] expected: f64,
    ) {
        let result = bamboo_harvest_revenue(
            Hectares(surface),
            TonnesPerHectare(production),
            MoneyPerTonne(bamboo_price),
        );
        assert_approx_eq!(Money, result, Money(expected), epsilon = 1e-6);
    }

    #[rstest]
    #[case(16_704_000.0, 0.1, 10_000_000.0, 1_670_400.0)] // Share of revenue
    #[case(16_704_000.0, 0.1, 1_000_000.0, 1_000_000.0)] // Capped at the loan
    #[case(16_704_000.0, 0.1, 0.0, 0.0)] // Loan already repaid
    #[case(0.0, 0.1, 10_000_000.0, 0.0)] // No revenue
    #[case(9_000_000.0, 1.5, 20_000_000.0, 13_500_000.0)] // Rate above 100%
    fn test_repayment_due(
        #[case] revenue: f64,
        #[case] rate: f64,
        #[case] loan: f64,
        #[case] expected: f64,
    ) {
        let result = repayment_due(Money(revenue), Dimensionless(rate), Money(loan));
        assert_approx_eq!(Money, result, Money(expected), epsilon = 1e-6);
    }
}
