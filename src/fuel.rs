//! Fuels, their prices and the cost model which turns prices into a cost per MMBTU of heat.
use crate::units::{BtuPerUnit, Dimensionless, MoneyPerEnergy, MoneyPerUnit, UnitType};
use anyhow::{Result, ensure};
use float_cmp::approx_eq;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The number of BTU in one MMBTU
pub const BTU_PER_MMBTU: f64 = 1_000_000.0;

/// The heat content of one kWh of electricity, in BTU
pub const BTU_PER_KWH: f64 = 3412.0;

/// Tolerance for checking that the heating fuel shares sum to one
const SHARE_SUM_TOLERANCE: f64 = 1e-9;

/// A fuel for which the user can set a price
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Fuel {
    /// Grid electricity, priced per kWh
    Electricity,
    /// Heating fuel oil, priced per gallon
    HeatingOil,
    /// Cordwood, priced per cord
    Cordwood,
    /// Natural gas, priced per hundred cubic feet
    NaturalGas,
    /// Wood pellets, priced per ton
    Pellet,
    /// Coal, priced per ton
    Coal,
    /// District heat, priced per unit delivered
    DistrictHeat,
}

impl Fuel {
    /// Iterate over the fuels used for space heating (i.e. all except electricity)
    pub fn heating() -> impl Iterator<Item = Fuel> {
        Fuel::iter().filter(|fuel| *fuel != Fuel::Electricity)
    }

    /// The native unit in which the fuel is priced
    pub fn unit(self) -> &'static str {
        match self {
            Fuel::Electricity => "kWh",
            Fuel::HeatingOil => "gallon",
            Fuel::Cordwood => "cord",
            Fuel::NaturalGas => "ccf",
            Fuel::Pellet | Fuel::Coal => "ton",
            Fuel::DistrictHeat => "unit",
        }
    }

    /// The compiled-in physical constants for this fuel
    pub fn constants(self) -> FuelConstants {
        let (btu_per_unit, efficiency, share) = match self {
            Fuel::Electricity => (BTU_PER_KWH, 1.0, 0.0),
            Fuel::HeatingOil => (137_400.0, 0.85, 0.729),
            Fuel::Cordwood => (17_750_000.0, 0.7, 0.235),
            Fuel::NaturalGas => (101_000.0, 0.85, 0.006),
            Fuel::Pellet => (16_000_000.0, 0.85, 0.009),
            Fuel::Coal => (15_200_000.0, 0.55, 0.005),
            Fuel::DistrictHeat => (1_066_000.0, 1.0, 0.016),
        };

        FuelConstants {
            heat_content: BtuPerUnit(btu_per_unit),
            efficiency: Dimensionless(efficiency),
            share: Dimensionless(share),
        }
    }

    /// The valid range and default for the price input control of this fuel
    pub fn price_range(self) -> PriceRange {
        let (min, max, step, default) = match self {
            Fuel::Electricity => (0.0, 1.0, 0.01, 0.25),
            Fuel::HeatingOil => (0.0, 10.0, 0.01, 4.40),
            Fuel::Cordwood => (0.0, 800.0, 1.0, 425.0),
            Fuel::NaturalGas => (0.0, 10.0, 0.01, 2.29),
            Fuel::Pellet => (0.0, 700.0, 1.0, 350.0),
            Fuel::Coal => (0.0, 400.0, 1.0, 143.0),
            Fuel::DistrictHeat => (0.0, 50.0, 0.01, 19.59),
        };

        PriceRange {
            min: MoneyPerUnit(min),
            max: MoneyPerUnit(max),
            step: MoneyPerUnit(step),
            default: MoneyPerUnit(default),
        }
    }
}

/// Physical calibration constants for a fuel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelConstants {
    /// Heat content of one native unit of the fuel
    pub heat_content: BtuPerUnit,
    /// Fraction of the heat content delivered as useful heat
    pub efficiency: Dimensionless,
    /// Fraction of regional space heating demand met by this fuel (zero for electricity)
    pub share: Dimensionless,
}

/// The range, step and default value for a price input control
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    /// Lowest selectable price
    pub min: MoneyPerUnit,
    /// Highest selectable price
    pub max: MoneyPerUnit,
    /// Increment between selectable prices
    pub step: MoneyPerUnit,
    /// Price used when the program starts or is reset
    pub default: MoneyPerUnit,
}

/// Check that the compiled-in physical constants are usable.
///
/// This catches calibration mistakes rather than bad user input, so any error here is fatal.
pub fn check_physical_constants() -> Result<()> {
    for fuel in Fuel::iter() {
        let constants = fuel.constants();
        ensure!(
            constants.heat_content.is_finite() && constants.heat_content > BtuPerUnit(0.0),
            "Heat content for {fuel} must be a finite number greater than zero"
        );
        ensure!(
            constants.efficiency > Dimensionless(0.0)
                && constants.efficiency <= Dimensionless(1.0),
            "Efficiency for {fuel} must be greater than zero and no more than one"
        );
    }

    let share_sum: f64 = Fuel::heating().map(|fuel| fuel.constants().share.0).sum();
    ensure!(
        approx_eq!(f64, share_sum, 1.0, epsilon = SHARE_SUM_TOLERANCE),
        "Heating fuel shares must sum to one (sum is {share_sum})"
    );

    Ok(())
}

/// Cost of delivering one MMBTU of useful heat from a fuel at the given price
pub fn cost_per_useful_mmbtu(
    price: MoneyPerUnit,
    heat_content: BtuPerUnit,
    efficiency: Dimensionless,
) -> MoneyPerEnergy {
    let units_per_mmbtu = BTU_PER_MMBTU / (heat_content.value() * efficiency.value());
    MoneyPerEnergy(units_per_mmbtu * price.value())
}

/// Cost of one MMBTU of site-delivered electricity at the given price per kWh
pub fn electricity_cost_per_mmbtu(price: MoneyPerUnit) -> MoneyPerEnergy {
    MoneyPerEnergy(BTU_PER_MMBTU / BTU_PER_KWH * price.value())
}

/// Regional average cost of one MMBTU of useful space heat, assuming the fixed fuel mix
pub fn blended_heating_cost_per_mmbtu(prices: &FuelPrices) -> MoneyPerEnergy {
    Fuel::heating()
        .map(|fuel| {
            let constants = fuel.constants();
            cost_per_useful_mmbtu(
                prices.get(fuel),
                constants.heat_content,
                constants.efficiency,
            ) * constants.share
        })
        .fold(MoneyPerEnergy(0.0), |acc, cost| acc + cost)
}

/// A price for every fuel.
///
/// The map always contains every fuel. Changing a price produces a new `FuelPrices`, so a set of
/// prices which has been handed to the pipeline is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelPrices(IndexMap<Fuel, MoneyPerUnit>);

impl Default for FuelPrices {
    /// The compiled-in default prices
    fn default() -> Self {
        Self(
            Fuel::iter()
                .map(|fuel| (fuel, fuel.price_range().default))
                .collect(),
        )
    }
}

impl FuelPrices {
    /// Get the price of a fuel
    pub fn get(&self, fuel: Fuel) -> MoneyPerUnit {
        *self
            .0
            .get(&fuel)
            .expect("Price map should contain every fuel")
    }

    /// A copy of these prices with the price of one fuel replaced.
    ///
    /// Fails if the price is negative or not finite.
    pub fn with_price(&self, fuel: Fuel, price: MoneyPerUnit) -> Result<Self> {
        check_price(fuel, price)?;
        let mut map = self.0.clone();
        map.insert(fuel, price);

        Ok(Self(map))
    }

    /// Defaults, overridden by the given prices
    pub fn from_overrides(overrides: &IndexMap<Fuel, MoneyPerUnit>) -> Result<Self> {
        overrides
            .iter()
            .try_fold(Self::default(), |prices, (fuel, price)| {
                prices.with_price(*fuel, *price)
            })
    }

    /// Iterate over fuels and their prices
    pub fn iter(&self) -> impl Iterator<Item = (Fuel, MoneyPerUnit)> + '_ {
        self.0.iter().map(|(fuel, price)| (*fuel, *price))
    }
}

/// Check that a price is valid for use in the cost model
pub(crate) fn check_price(fuel: Fuel, price: MoneyPerUnit) -> Result<()> {
    ensure!(
        price.is_finite() && price >= MoneyPerUnit(0.0),
        "Price for {fuel} must be a finite number no less than zero (got {price})"
    );

    Ok(())
}

/// The costs per MMBTU derived from a set of fuel prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelRates {
    /// Cost of one MMBTU of electricity
    pub electricity: MoneyPerEnergy,
    /// Blended cost of one MMBTU of useful space heat
    pub space_heating: MoneyPerEnergy,
}

impl FuelRates {
    /// Calculate both rates from a set of prices
    pub fn from_prices(prices: &FuelPrices) -> Self {
        Self {
            electricity: electricity_cost_per_mmbtu(prices.get(Fuel::Electricity)),
            space_heating: blended_heating_cost_per_mmbtu(prices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, default_prices};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_check_physical_constants() {
        check_physical_constants().unwrap();
    }

    #[test]
    fn test_heating_shares_sum_to_one() {
        let sum: f64 = Fuel::heating().map(|fuel| fuel.constants().share.0).sum();
        assert_approx_eq!(f64, sum, 1.0, epsilon = 1e-9);
        assert_eq!(Fuel::heating().count(), 6);
    }

    #[rstest]
    #[case(Fuel::HeatingOil, 4.40, 37.674_458_429_660_08)]
    #[case(Fuel::Cordwood, 425.0, 34.205_231_388_329_98)]
    #[case(Fuel::NaturalGas, 2.29, 26.674_432_149_097_264)]
    #[case(Fuel::Pellet, 350.0, 25.735_294_117_647_058)]
    #[case(Fuel::Coal, 143.0, 17.105_263_157_894_736)]
    #[case(Fuel::DistrictHeat, 19.59, 18.377_110_694_183_866)]
    fn test_cost_per_useful_mmbtu(#[case] fuel: Fuel, #[case] price: f64, #[case] expected: f64) {
        let constants = fuel.constants();
        let cost = cost_per_useful_mmbtu(
            MoneyPerUnit(price),
            constants.heat_content,
            constants.efficiency,
        );
        assert_approx_eq!(MoneyPerEnergy, cost, MoneyPerEnergy(expected), epsilon = 1e-9);
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(3.5)]
    #[case(250.0)]
    fn test_cost_per_useful_mmbtu_scales_with_price(#[case] price: f64) {
        for fuel in Fuel::iter() {
            let constants = fuel.constants();
            let cost = |price| {
                cost_per_useful_mmbtu(
                    MoneyPerUnit(price),
                    constants.heat_content,
                    constants.efficiency,
                )
            };
            assert!(cost(price) >= MoneyPerEnergy(0.0));
            assert!(cost(price + 1.0) >= cost(price));
            assert_approx_eq!(
                MoneyPerEnergy,
                cost(2.0 * price),
                cost(price) * Dimensionless(2.0),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_electricity_cost_per_mmbtu() {
        let cost = electricity_cost_per_mmbtu(MoneyPerUnit(0.25));
        assert_approx_eq!(f64, cost.0, 73.27, epsilon = 0.005);
        assert_eq!(
            electricity_cost_per_mmbtu(MoneyPerUnit(0.0)),
            MoneyPerEnergy(0.0)
        );
    }

    #[rstest]
    fn test_blended_heating_cost(default_prices: FuelPrices) {
        // Hand-computed: sum of cost per useful MMBTU times share for the six heating fuels
        let expected = 37.674_458_429_660_08 * 0.729
            + 34.205_231_388_329_98 * 0.235
            + 26.674_432_149_097_264 * 0.006
            + 25.735_294_117_647_058 * 0.009
            + 17.105_263_157_894_736 * 0.005
            + 18.377_110_694_183_866 * 0.016;
        let cost = blended_heating_cost_per_mmbtu(&default_prices);
        assert_approx_eq!(MoneyPerEnergy, cost, MoneyPerEnergy(expected), epsilon = 1e-9);
        assert_approx_eq!(f64, cost.0, 36.274_133_898, epsilon = 1e-6);
    }

    #[rstest]
    fn test_blended_heating_cost_ignores_electricity(default_prices: FuelPrices) {
        let prices = default_prices
            .with_price(Fuel::Electricity, MoneyPerUnit(0.9))
            .unwrap();
        assert_eq!(
            blended_heating_cost_per_mmbtu(&prices),
            blended_heating_cost_per_mmbtu(&default_prices)
        );
    }

    #[test]
    fn test_blended_heating_cost_zero_prices() {
        let prices = Fuel::iter().fold(FuelPrices::default(), |prices, fuel| {
            prices.with_price(fuel, MoneyPerUnit(0.0)).unwrap()
        });
        assert_eq!(blended_heating_cost_per_mmbtu(&prices), MoneyPerEnergy(0.0));
    }

    #[test]
    fn test_default_prices() {
        let prices = FuelPrices::default();
        assert_eq!(prices.iter().count(), 7);
        assert_eq!(prices.get(Fuel::Electricity), MoneyPerUnit(0.25));
        assert_eq!(prices.get(Fuel::HeatingOil), MoneyPerUnit(4.40));
        assert_eq!(prices.get(Fuel::Cordwood), MoneyPerUnit(425.0));
        assert_eq!(prices.get(Fuel::NaturalGas), MoneyPerUnit(2.29));
        assert_eq!(prices.get(Fuel::Pellet), MoneyPerUnit(350.0));
        assert_eq!(prices.get(Fuel::Coal), MoneyPerUnit(143.0));
        assert_eq!(prices.get(Fuel::DistrictHeat), MoneyPerUnit(19.59));
    }

    #[rstest]
    fn test_with_price_leaves_original_untouched(default_prices: FuelPrices) {
        let updated = default_prices
            .with_price(Fuel::Coal, MoneyPerUnit(200.0))
            .unwrap();
        assert_eq!(updated.get(Fuel::Coal), MoneyPerUnit(200.0));
        assert_eq!(default_prices.get(Fuel::Coal), MoneyPerUnit(143.0));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_with_price_invalid(default_prices: FuelPrices, #[case] price: f64) {
        assert!(default_prices.with_price(Fuel::Pellet, MoneyPerUnit(price)).is_err());
    }

    #[test]
    fn test_with_price_error_message() {
        assert_error!(
            FuelPrices::default().with_price(Fuel::Coal, MoneyPerUnit(-2.0)),
            "Price for coal must be a finite number no less than zero (got -2)"
        );
    }

    #[test]
    fn test_from_overrides() {
        let overrides = [(Fuel::Pellet, MoneyPerUnit(300.0))].into_iter().collect();
        let prices = FuelPrices::from_overrides(&overrides).unwrap();
        assert_eq!(prices.get(Fuel::Pellet), MoneyPerUnit(300.0));
        assert_eq!(prices.get(Fuel::Coal), MoneyPerUnit(143.0));
    }

    #[test]
    fn test_fuel_names() {
        assert_eq!(Fuel::DistrictHeat.to_string(), "district_heat");
        assert_eq!(Fuel::from_str("heating_oil").unwrap(), Fuel::HeatingOil);
        assert!(Fuel::from_str("HeatingOil").is_err());
    }

    #[test]
    fn test_price_range_defaults_within_range() {
        for fuel in Fuel::iter() {
            let range = fuel.price_range();
            assert!(range.min <= range.default && range.default <= range.max);
            assert!(range.step > MoneyPerUnit(0.0));
        }
    }
}
