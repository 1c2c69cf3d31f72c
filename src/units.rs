//! This module defines the unit types used by the simulation and the arithmetic rules between them.
//!
//! Every quantity the engine works with is wrapped in a newtype so that formulas such as
//! `surface * production * price` only compile when the units line up.
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// Represents a dimensionless quantity.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
    derive_more::SubAssign,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Dimensionless(pub f64);

impl Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl Dimensionless {
    /// Create a new dimensionless quantity
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the underlying value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Round down to the nearest whole number of items.
    ///
    /// Values that are negative or not finite count as zero items; values too large for a `u64`
    /// saturate.
    pub fn floor_count(self) -> u64 {
        if self.0.is_finite() && self.0 > 0.0 {
            self.0.floor() as u64
        } else {
            0
        }
    }
}

impl From<u64> for Dimensionless {
    fn from(count: u64) -> Self {
        Self(count as f64)
    }
}

impl ApproxEq for Dimensionless {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        self.0.approx_eq(other.0, margin)
    }
}

/// A rate expressed as a percentage, as it appears in scenario files (e.g. `10` for 10%).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    /// Create a new percentage
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the percentage as entered
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to a proportion, i.e. divide by 100
    pub fn to_fraction(self) -> Dimensionless {
        Dimensionless(self.0 / 100.0)
    }
}

impl ApproxEq for Percent {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        self.0.approx_eq(other.0, margin)
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::SubAssign,
            derive_more::Sum,
            derive_more::Display,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Create a new instance of the unit type from an `f64` value.
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Returns the value of the unit type as an `f64`.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is finite
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// The smaller of two quantities
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// The larger of two quantities
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl Mul<Dimensionless> for $name {
            type Output = $name;

            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl Mul<$name> for Dimensionless {
            type Output = $name;

            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl Div<Dimensionless> for $name {
            type Output = $name;

            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl Div for $name {
            type Output = Dimensionless;

            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl Mul<$Rhs> for $Lhs {
            type Output = $Out;

            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }

        impl Mul<$Lhs> for $Rhs {
            type Output = $Out;

            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl Div<$Rhs> for $Lhs {
            type Output = $Out;

            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Money);
unit_struct!(Hectares);
unit_struct!(Tonnes);

// Derived quantities
unit_struct!(MoneyPerHectare);
unit_struct!(TonnesPerHectare);
unit_struct!(MoneyPerTonne);

// Multiplication rules
impl_mul!(Hectares, MoneyPerHectare, Money);
impl_mul!(Hectares, TonnesPerHectare, Tonnes);
impl_mul!(Tonnes, MoneyPerTonne, Money);

// Division rules
impl_div!(Money, MoneyPerHectare, Hectares);
impl_div!(Money, Hectares, MoneyPerHectare);
impl_div!(Tonnes, Hectares, TonnesPerHectare);
