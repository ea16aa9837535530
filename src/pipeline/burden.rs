//! Energy burden for each tract and dataset-wide average costs for the summary panel.
use crate::fuel::FuelRates;
use crate::metric::{add, divide, multiply};
use crate::tract::{EnrichedTract, TractMetrics, TractRecord};
use crate::units::{Dimensionless, Energy, Money, MoneyPerEnergy};
use serde::Serialize;

/// Add the total household cost and energy burden to a tract's figures.
///
/// The burden is unavailable unless both household costs are available and the median income is
/// greater than zero.
pub fn with_burden(record: &TractRecord, metrics: TractMetrics) -> TractMetrics {
    let total_cost_hh = add(metrics.electricity_cost_hh, metrics.space_heating_cost_hh);
    let burden = divide(total_cost_hh, record.median_income);

    TractMetrics {
        total_cost_hh,
        burden_pct: multiply(burden, Some(Dimensionless(100.0))),
        ..metrics
    }
}

/// Accumulates a consumption-weighted average cost per MMBTU.
///
/// Each tract is weighted by its consumption, so this is the total cost divided by the total
/// energy rather than the mean of per-tract rates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedAverage {
    total_cost: Money,
    total_energy: Energy,
}

impl WeightedAverage {
    /// Add a tract's cost and energy use.
    ///
    /// The pair is skipped if either value is unavailable. Zero consumption is included.
    pub fn add(&mut self, cost: Option<Money>, energy: Option<Energy>) {
        if let (Some(cost), Some(energy)) = (cost, energy) {
            self.total_cost = self.total_cost + cost;
            self.total_energy = self.total_energy + energy;
        }
    }

    /// The weighted average, unavailable if the total energy is zero
    pub fn value(&self) -> Option<MoneyPerEnergy> {
        divide(Some(self.total_cost), Some(self.total_energy))
    }
}

/// Dataset-wide figures for the summary panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Cost of one MMBTU of electricity at current prices
    pub electricity_cost_per_mmbtu: MoneyPerEnergy,
    /// Blended cost of one MMBTU of useful space heat at current prices
    pub space_heating_cost_per_mmbtu: MoneyPerEnergy,
    /// Electricity cost per MMBTU, weighted by consumption across all tracts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_electricity_cost: Option<MoneyPerEnergy>,
    /// Space heating cost per MMBTU, weighted by consumption across all tracts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_space_heating_cost: Option<MoneyPerEnergy>,
    /// Number of tracts in the dataset
    pub tract_count: usize,
    /// Number of tracts which can be drawn on the map
    pub mapped_tract_count: usize,
}

impl Summary {
    /// Summarise the figures for all tracts
    pub fn new(rates: &FuelRates, tracts: &[EnrichedTract]) -> Self {
        let mut electricity = WeightedAverage::default();
        let mut space_heating = WeightedAverage::default();
        for tract in tracts {
            electricity.add(tract.metrics.electricity_cost, tract.record.electricity);
            space_heating.add(tract.metrics.space_heating_cost, tract.record.space_heating);
        }

        Self {
            electricity_cost_per_mmbtu: rates.electricity,
            space_heating_cost_per_mmbtu: rates.space_heating,
            weighted_electricity_cost: electricity.value(),
            weighted_space_heating_cost: space_heating.value(),
            tract_count: tracts.len(),
            mapped_tract_count: tracts.iter().filter(|t| t.has_geometry()).count(),
        }
    }
}
