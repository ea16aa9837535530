//! Code for reading tract records from a CSV file.
use super::*;
use crate::id::find_duplicate_id;
use crate::metric::parse_quantity;
use crate::tract::TractKey;
use anyhow::bail;
use serde::Deserialize;

const TRACTS_FILE_NAME: &str = "tracts.csv";

/// A row of the tracts file, before numeric fields have been checked.
///
/// Numeric fields are read as text so that a blank or malformed value only makes that one figure
/// unavailable, rather than failing the whole load.
#[derive(Debug, Deserialize, PartialEq)]
struct TractRaw {
    #[serde(rename = "TractLong")]
    key: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(
        rename = "AnnualElectricity_mmbtu",
        alias = "AnnualElectricityMmbtu",
        default
    )]
    electricity: String,
    #[serde(
        rename = "AnnualSpaceHeating_mmbtu",
        alias = "AnnualSpaceHeatingMmbtu",
        default
    )]
    space_heating: String,
    #[serde(rename = "OccupiedUnits", default)]
    occupied_units: String,
    #[serde(rename = "MedianHouseholdIncome", default)]
    median_income: String,
}

/// Read tract records from the dataset directory.
///
/// # Arguments
///
/// * `dataset_dir` - Folder containing the dataset files
///
/// # Returns
///
/// The tracts in file order, or an error if the file is missing, empty or has invalid keys
pub fn read_tracts(dataset_dir: &Path) -> Result<Vec<Rc<TractRecord>>> {
    let file_path = dataset_dir.join(TRACTS_FILE_NAME);
    let tracts_csv = read_csv(&file_path)?;
    read_tracts_from_iter(tracts_csv.into_iter()).with_context(|| input_err_msg(&file_path))
}

fn read_tracts_from_iter<I>(iter: I) -> Result<Vec<Rc<TractRecord>>>
where
    I: Iterator<Item = TractRaw>,
{
    let records = iter
        .enumerate()
        .map(|(row, raw)| -> Result<_> {
            // Row 1 is the header
            ensure!(!raw.key.is_empty(), "Blank TractLong on row {}", row + 2);

            Ok(TractRecord {
                key: raw.key.as_str().into(),
                description: raw.description,
                electricity: parse_quantity(&raw.electricity),
                space_heating: parse_quantity(&raw.space_heating),
                occupied_units: parse_quantity(&raw.occupied_units),
                median_income: parse_quantity(&raw.median_income),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(key) = find_duplicate_id::<TractKey, _, _>(&records) {
        bail!("Duplicate tract key: {key}");
    }

    Ok(records.into_iter().map(Rc::new).collect())
}
