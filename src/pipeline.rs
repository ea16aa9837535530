//! The recalculation pipeline: from tract records and fuel prices to a complete set of results.
//!
//! Every run is a full pass over the dataset. Results are built as new values and never share
//! mutable state with earlier runs, so a caller only ever sees results for a single set of prices.
use crate::fuel::{FuelPrices, FuelRates};
use crate::tract::{EnrichedTract, TractRecord};
use log::debug;
use std::rc::Rc;

pub mod burden;
use burden::{Summary, with_burden};
pub mod geometry;
use geometry::{GeometryMap, join_geometry};
pub mod normalise;
use normalise::normalise_record;

/// The complete results of a recompute
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The prices the results were calculated with
    pub prices: FuelPrices,
    /// Costs per MMBTU derived from the prices
    pub rates: FuelRates,
    /// Every tract with its derived figures, in input order
    pub tracts: Vec<EnrichedTract>,
    /// Dataset-wide figures for the summary panel
    pub summary: Summary,
}

/// Run the full pipeline over every tract.
///
/// # Arguments
///
/// * `records` - All tracts in the dataset
/// * `geometry` - Tract shapes, keyed by tract key
/// * `prices` - The fuel prices to use
pub fn recompute(
    records: &[Rc<TractRecord>],
    geometry: &GeometryMap,
    prices: &FuelPrices,
) -> PipelineOutput {
    let rates = FuelRates::from_prices(prices);
    debug!(
        "Recomputing {} tracts (electricity: {:.2}/MMBTU, space heating: {:.2}/MMBTU)",
        records.len(),
        rates.electricity.0,
        rates.space_heating.0
    );

    let metrics = records
        .iter()
        .map(|record| (record, with_burden(record, normalise_record(record, &rates))));
    let tracts = join_geometry(metrics, geometry);
    let summary = Summary::new(&rates, &tracts);

    PipelineOutput {
        prices: prices.clone(),
        rates,
        tracts,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{default_prices, geometry_map, tract_record};
    use crate::fuel::Fuel;
    use crate::units::{Dimensionless, MoneyPerUnit};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_recompute_end_to_end(
        tract_record: TractRecord,
        geometry_map: GeometryMap,
        default_prices: FuelPrices,
    ) {
        let records = [Rc::new(tract_record)];
        let output = recompute(&records, &geometry_map, &default_prices);

        assert_approx_eq!(f64, output.rates.electricity.0, 73.27, epsilon = 0.005);
        let metrics = &output.tracts[0].metrics;
        assert_approx_eq!(f64, metrics.electricity_cost.unwrap().0, 732.7, epsilon = 0.01);
        assert_approx_eq!(
            f64,
            metrics.electricity_cost_hh.unwrap().0,
            146.54,
            epsilon = 0.005
        );

        // Blended heating cost is 36.2741 per MMBTU, so 20 MMBTU over 5 households is 145.10
        assert_approx_eq!(
            f64,
            metrics.space_heating_cost_hh.unwrap().0,
            145.10,
            epsilon = 0.005
        );
        assert_approx_eq!(
            f64,
            metrics.total_cost_hh.unwrap().0,
            291.64,
            epsilon = 0.005
        );
        let expected_burden = (metrics.electricity_cost_hh.unwrap().0
            + metrics.space_heating_cost_hh.unwrap().0)
            / 50_000.0
            * 100.0;
        assert_approx_eq!(
            Dimensionless,
            metrics.burden_pct.unwrap(),
            Dimensionless(expected_burden),
            epsilon = 1e-12
        );
        assert_eq!(format!("{:.2}", metrics.burden_pct.unwrap().0), "0.58");

        assert_eq!(output.summary.tract_count, 1);
        assert_eq!(output.summary.mapped_tract_count, 1);
        assert_eq!(output.prices, default_prices);
    }

    #[rstest]
    fn test_recompute_is_idempotent(
        tract_record: TractRecord,
        geometry_map: GeometryMap,
        default_prices: FuelPrices,
    ) {
        let records = [Rc::new(tract_record)];
        let first = recompute(&records, &geometry_map, &default_prices);
        let second = recompute(&records, &geometry_map, &default_prices);
        for (a, b) in first.tracts.iter().zip(&second.tracts) {
            let bits = |metrics: &crate::tract::TractMetrics| {
                [
                    metrics.electricity_cost.map(|x| x.0.to_bits()),
                    metrics.space_heating_cost.map(|x| x.0.to_bits()),
                    metrics.electricity_cost_hh.map(|x| x.0.to_bits()),
                    metrics.space_heating_cost_hh.map(|x| x.0.to_bits()),
                    metrics.total_cost_hh.map(|x| x.0.to_bits()),
                    metrics.burden_pct.map(|x| x.0.to_bits()),
                ]
            };
            assert_eq!(bits(&a.metrics), bits(&b.metrics));
        }
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_recompute_reflects_latest_prices(
        tract_record: TractRecord,
        geometry_map: GeometryMap,
        default_prices: FuelPrices,
    ) {
        let records = [Rc::new(tract_record)];
        let before = recompute(&records, &geometry_map, &default_prices);
        let prices = default_prices
            .with_price(Fuel::Electricity, MoneyPerUnit(0.5))
            .unwrap();
        let after = recompute(&records, &geometry_map, &prices);

        let cost = |output: &PipelineOutput| output.tracts[0].metrics.electricity_cost.unwrap().0;
        assert_approx_eq!(f64, cost(&after), 2.0 * cost(&before), epsilon = 1e-9);
        assert_eq!(
            before.tracts[0].metrics.space_heating_cost,
            after.tracts[0].metrics.space_heating_cost
        );
    }

    #[rstest]
    fn test_recompute_unmatched_geometry(tract_record: TractRecord, default_prices: FuelPrices) {
        let records = [Rc::new(tract_record)];
        let output = recompute(&records, &GeometryMap::new(), &default_prices);

        assert!(!output.tracts[0].has_geometry());
        assert!(output.tracts[0].metrics.burden_pct.is_some());
        assert_eq!(output.summary.tract_count, 1);
        assert_eq!(output.summary.mapped_tract_count, 0);
        let collection = geometry::feature_collection(&output.tracts);
        assert!(collection["features"].as_array().unwrap().is_empty());
    }

    #[rstest]
    fn test_recompute_empty(default_prices: FuelPrices) {
        let output = recompute(&[], &GeometryMap::new(), &default_prices);
        assert!(output.tracts.is_empty());
        assert_eq!(output.summary.weighted_electricity_cost, None);
        assert_eq!(output.summary.weighted_space_heating_cost, None);
    }
}
