//! Code for reading fuel price overrides from a TOML file.
use super::*;
use crate::fuel::{Fuel, FuelPrices};
use crate::units::MoneyPerUnit;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::str::FromStr;
use strum::IntoEnumIterator;

const PRICES_FILE_NAME: &str = "prices.toml";

#[derive(Debug, Default, Deserialize, PartialEq)]
struct PricesFile {
    #[serde(default)]
    prices: IndexMap<String, f64>,
}

/// Read fuel prices for a dataset.
///
/// The prices file is optional. Fuels which it does not mention keep their default prices.
///
/// # Arguments
///
/// * `dataset_dir` - Folder containing the dataset files
pub fn read_prices(dataset_dir: &Path) -> Result<FuelPrices> {
    let file_path = dataset_dir.join(PRICES_FILE_NAME);
    if !file_path.is_file() {
        debug!("{} not found; using default prices", file_path.display());
        return Ok(FuelPrices::default());
    }

    let prices_file: PricesFile = read_toml(&file_path)?;
    read_prices_from_file(&prices_file).with_context(|| input_err_msg(&file_path))
}

fn read_prices_from_file(prices_file: &PricesFile) -> Result<FuelPrices> {
    let overrides = prices_file
        .prices
        .iter()
        .map(|(name, price)| -> Result<_> {
            let fuel = Fuel::from_str(name).ok().with_context(|| {
                format!(
                    "Unknown fuel: {name} (expected one of: {})",
                    Fuel::iter().join(", ")
                )
            })?;

            Ok((fuel, MoneyPerUnit(*price)))
        })
        .collect::<Result<IndexMap<_, _>>>()?;

    FuelPrices::from_overrides(&overrides)
}
