//! Farmer cohorts: all of the farmers financed in a single simulated year.
use crate::units::{Dimensionless, Hectares, Money};
use serde::Serialize;
use std::slice;

/// The farmers financed in one year, tracked jointly.
///
/// A cohort is only ever changed by repayments, which reduce its outstanding loan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmerCohort {
    /// The simulation year in which the cohort was financed
    pub start_year: u32,
    /// Number of farmers in the cohort
    pub farmer_count: u64,
    /// The part of the cohort's loan which has not yet been repaid
    loan_remaining: Money,
}

impl FarmerCohort {
    /// Create a cohort which has just borrowed `cost_per_farmer` for each of its farmers
    pub fn new(start_year: u32, farmer_count: u64, cost_per_farmer: Money) -> Self {
        Self {
            start_year,
            farmer_count,
            loan_remaining: Dimensionless::from(farmer_count) * cost_per_farmer,
        }
    }

    /// Number of years since the cohort was financed.
    ///
    /// # Panics
    ///
    /// If `year` is before the cohort's start year.
    pub fn age(&self, year: u32) -> u32 {
        year.checked_sub(self.start_year)
            .expect("Cohort age requested for a year before it was financed")
    }

    /// The land converted to bamboo by this cohort
    pub fn cultivated_surface(&self, farmer_surface: Hectares) -> Hectares {
        Dimensionless::from(self.farmer_count) * farmer_surface
    }

    /// The outstanding loan
    pub fn loan_remaining(&self) -> Money {
        self.loan_remaining
    }

    /// Repay up to `amount` of the loan, returning what was actually repaid.
    ///
    /// The repayment is capped at the outstanding loan, which therefore never becomes negative.
    pub fn repay(&mut self, amount: Money) -> Money {
        let repaid = amount.min(self.loan_remaining).max(Money(0.0));
        self.loan_remaining -= repaid;
        repaid
    }
}

/// The cohorts of a simulation, in the order in which they were financed.
///
/// Cohorts are never removed, because bamboo revenue keeps accruing after loans are repaid.
#[derive(Debug, Default, Clone)]
pub struct CohortPool(Vec<FarmerCohort>);

impl CohortPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly financed cohort.
    ///
    /// # Panics
    ///
    /// If the cohort is older than the most recently added one.
    pub fn push(&mut self, cohort: FarmerCohort) {
        if let Some(last) = self.0.last() {
            assert!(
                cohort.start_year >= last.start_year,
                "Cohorts must be added in financing order"
            );
        }
        self.0.push(cohort);
    }

    /// Iterate over the cohorts
    pub fn iter(&self) -> slice::Iter<'_, FarmerCohort> {
        self.0.iter()
    }

    /// Iterate mutably over the cohorts
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, FarmerCohort> {
        self.0.iter_mut()
    }

    /// Number of cohorts in the pool
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sum of all cohorts' outstanding loans
    pub fn total_loan_remaining(&self) -> Money {
        self.iter().map(FarmerCohort::loan_remaining).sum()
    }
}

impl<'a> IntoIterator for &'a CohortPool {
    type Item = &'a FarmerCohort;
    type IntoIter = slice::Iter<'a, FarmerCohort>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
