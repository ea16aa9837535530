//! Converts a tract's energy use into costs, for the whole tract and per household.
use crate::fuel::FuelRates;
use crate::metric::{divide, multiply};
use crate::tract::{TractMetrics, TractRecord};

/// Calculate costs and per-household figures for a tract.
///
/// This never fails: any figure which cannot be calculated is left as `None` without affecting
/// the others. Burden figures are left empty (see [`super::burden::with_burden`]).
pub fn normalise_record(record: &TractRecord, rates: &FuelRates) -> TractMetrics {
    let electricity_cost = multiply(record.electricity, Some(rates.electricity));
    let space_heating_cost = multiply(record.space_heating, Some(rates.space_heating));

    TractMetrics {
        electricity_cost,
        space_heating_cost,
        electricity_hh: divide(record.electricity, record.occupied_units),
        electricity_cost_hh: divide(electricity_cost, record.occupied_units),
        space_heating_hh: divide(record.space_heating, record.occupied_units),
        space_heating_cost_hh: divide(space_heating_cost, record.occupied_units),
        ..TractMetrics::default()
    }
}
