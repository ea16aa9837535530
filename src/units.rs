//! This module defines the physical and financial quantities used in the burden calculation.
//!
//! Each quantity is a newtype around an `f64` so that, for example, a cost per MMBTU cannot be
//! accidentally added to a cost per household.
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};

/// A quantity with an underlying `f64` value
pub trait UnitType: Copy {
    /// Create a new quantity from a raw value
    fn new(value: f64) -> Self;

    /// The raw value of the quantity
    fn value(&self) -> f64;

    /// Whether the underlying value is finite
    fn is_finite(&self) -> bool {
        self.value().is_finite()
    }
}

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
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl UnitType for $name {
            fn new(value: f64) -> Self {
                Self(value)
            }

            fn value(&self) -> f64 {
                self.0
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
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
    /// A dimensionless quantity (e.g. an efficiency or a usage share)
    Dimensionless
);

// Base quantities
unit_struct!(
    /// An amount of money (e.g. annual cost)
    Money
);
unit_struct!(
    /// An amount of heat energy in MMBTU
    Energy
);
unit_struct!(
    /// A number of occupied housing units
    Households
);

// Derived quantities
unit_struct!(
    /// The price of one native unit of a fuel (e.g. per gallon, per cord, per kWh)
    MoneyPerUnit
);
unit_struct!(
    /// The heat content of one native unit of a fuel, in BTU
    BtuPerUnit
);
unit_struct!(
    /// A cost per MMBTU of energy
    MoneyPerEnergy
);
unit_struct!(
    /// A cost per household (also used for household income)
    MoneyPerHousehold
);
unit_struct!(
    /// An amount of energy per household
    EnergyPerHousehold
);

// Division rules
impl_div!(Money, Energy, MoneyPerEnergy);
impl_div!(Money, Households, MoneyPerHousehold);
impl_div!(Energy, Households, EnergyPerHousehold);
impl_div!(MoneyPerHousehold, MoneyPerHousehold, Dimensionless);
impl_div!(Dimensionless, Dimensionless, Dimensionless);

// Multiplication rules
impl_mul!(Energy, MoneyPerEnergy, Money);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_cost_from_energy_and_rate() {
        let cost = Energy(10.0) * MoneyPerEnergy(73.5);
        assert_approx_eq!(Money, cost, Money(735.0));
        assert_eq!(MoneyPerEnergy(2.0) * Energy(3.0), Money(6.0));
    }

    #[test]
    fn test_per_household() {
        assert_eq!(Money(100.0) / Households(4.0), MoneyPerHousehold(25.0));
        assert_eq!(Energy(20.0) / Households(5.0), EnergyPerHousehold(4.0));
        assert_eq!(
            MoneyPerHousehold(500.0) / MoneyPerHousehold(50_000.0),
            Dimensionless(0.01)
        );
    }

    #[test]
    fn test_serialise_transparent() {
        assert_eq!(serde_json::to_string(&Money(1.5)).unwrap(), "1.5");
    }
}
