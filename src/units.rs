//! This module defines various unit types and their conversions.
//!
//! Quantities follow the conventions of the monthly generation and fuel data: electrical energy in
//! MWh, fuel energy in MMBTU, nameplate capacity in MW.
use serde::{Deserialize, Serialize};

macro_rules! unit_struct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is finite (i.e. not infinite or NaN)
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl From<f64> for $name {
            fn from(val: f64) -> Self {
                Self(val)
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |acc, x| acc + x)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

unit_struct!(
    /// A dimensionless quantity (e.g. a capacity factor or a fraction of months)
    Dimensionless
);
unit_struct!(
    /// Electrical energy in MWh
    Energy
);
unit_struct!(
    /// Fuel energy content in MMBTU
    FuelEnergy
);
unit_struct!(
    /// Electrical capacity in MW
    Capacity
);
unit_struct!(
    /// A duration in hours
    Hours
);
unit_struct!(
    /// Fuel input per unit of electrical output in MMBTU/MWh
    HeatRate
);

// Division rules
impl_div!(FuelEnergy, Energy, HeatRate);
impl_div!(Energy, Energy, Dimensionless);

// Multiplication rules
impl_mul!(Capacity, Hours, Energy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_rate_from_fuel_and_energy() {
        assert_eq!(FuelEnergy(300.0) / Energy(-20.0), HeatRate(-15.0));
    }

    #[test]
    fn test_capacity_times_hours() {
        assert_eq!(Capacity(2.0) * Hours(744.0), Energy(1488.0));
        assert_eq!(Hours(744.0) * Capacity(2.0), Energy(1488.0));
    }

    #[test]
    fn test_sum() {
        let total: Energy = [Energy(1.0), Energy(-3.0), Energy(0.5)].into_iter().sum();
        assert_eq!(total, Energy(-1.5));
    }
}
