//! The financing step: lend the fund's cash to as many new farmers as it can fully cover.
use crate::cohort::FarmerCohort;
use crate::units::{Dimensionless, Money};

/// The number of farmers whose full loan the fund can currently cover.
///
/// Partial loans are never made, so the result is rounded down, and the total lent never exceeds
/// `fund_balance`.
pub fn affordable_farmers(fund_balance: Money, cost_per_farmer: Money) -> u64 {
    let mut count = (fund_balance / cost_per_farmer).floor_count();

    // The quotient may have been rounded up onto a whole number
    if count > 0 && Dimensionless::from(count) * cost_per_farmer > fund_balance {
        count -= 1;
    }

    count
}

/// Finance a new cohort in `year`, deducting its loans from the fund
pub fn finance_new_cohort(
    year: u32,
    fund_balance: &mut Money,
    cost_per_farmer: Money,
) -> FarmerCohort {
    let farmer_count = affordable_farmers(*fund_balance, cost_per_farmer);
    let cohort = FarmerCohort::new(year, farmer_count, cost_per_farmer);
    *fund_balance -= cohort.loan_remaining();

    cohort
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10_000_000.0, 250_000.0, 40)]
    #[case(5_011_200.0, 250_000.0, 20)]
    #[case(249_999.99, 250_000.0, 0)]
    #[case(0.0, 250_000.0, 0)]
    #[case(0.3, 0.1, 2)] // 0.3 / 0.1 is not quite 3 in floating point
    fn test_affordable_farmers(
        #[case] fund_balance: f64,
        #[case] cost_per_farmer: f64,
        #[case] expected: u64,
    ) {
        let count = affordable_farmers(Money(fund_balance), Money(cost_per_farmer));
        assert_eq!(count, expected);
        assert!(Dimensionless::from(count) * Money(cost_per_farmer) <= Money(fund_balance));
    }

    #[test]
    fn test_finance_new_cohort() {
        let mut fund_balance = Money(5_011_200.0);
        let cohort = finance_new_cohort(3, &mut fund_balance, Money(250_000.0));

        assert_eq!(cohort.start_year, 3);
        assert_eq!(cohort.farmer_count, 20);
        assert_eq!(cohort.loan_remaining(), Money(5_000_000.0));
        assert_eq!(fund_balance, Money(11_200.0));
    }

    #[test]
    fn test_finance_new_cohort_empty_fund() {
        let mut fund_balance = Money(0.0);
        let cohort = finance_new_cohort(2, &mut fund_balance, Money(250_000.0));

        assert_eq!(cohort.farmer_count, 0);
        assert_eq!(cohort.loan_remaining(), Money(0.0));
        assert_eq!(fund_balance, Money(0.0));
    }
}
