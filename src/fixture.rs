//! Fixtures for tests

use crate::fuel::{FuelPrices, FuelRates};
use crate::input::Dataset;
use crate::pipeline::geometry::GeometryMap;
use crate::tract::TractRecord;
use crate::units::{Energy, Households, MoneyPerHousehold};
use indexmap::indexmap;
use rstest::fixture;
use serde_json::json;
use std::rc::Rc;

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

#[fixture]
pub fn tract_record() -> TractRecord {
    TractRecord {
        key: "02090000100".into(),
        description: "Census Tract 1, Fairbanks North Star Borough".into(),
        electricity: Some(Energy(10.0)),
        space_heating: Some(Energy(20.0)),
        occupied_units: Some(Households(5.0)),
        median_income: Some(MoneyPerHousehold(50_000.0)),
    }
}

#[fixture]
pub fn default_prices() -> FuelPrices {
    FuelPrices::default()
}

#[fixture]
pub fn default_rates(default_prices: FuelPrices) -> FuelRates {
    FuelRates::from_prices(&default_prices)
}

#[fixture]
pub fn geometry_map() -> GeometryMap {
    let polygon = json!({
        "type": "Polygon",
        "coordinates": [[
            [-147.72, 64.84],
            [-147.70, 64.84],
            [-147.70, 64.86],
            [-147.72, 64.86],
            [-147.72, 64.84]
        ]]
    });

    indexmap! { "02090000100".into() => Rc::new(polygon) }
}

#[fixture]
pub fn dataset(tract_record: TractRecord, geometry_map: GeometryMap) -> Dataset {
    Dataset {
        records: vec![Rc::new(tract_record)],
        geometry: geometry_map,
    }
}
