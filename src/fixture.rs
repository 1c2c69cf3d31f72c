//! Fixtures for tests

use crate::cohort::FarmerCohort;
use crate::configuration::Configuration;
use crate::units::Money;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The reference scenario
#[fixture]
pub fn configuration() -> Configuration {
    Configuration::default()
}

/// Forty farmers financed in the first year at the reference cost per farmer
#[fixture]
pub fn cohort() -> FarmerCohort {
    FarmerCohort::new(1, 40, Money(250_000.0))
}
