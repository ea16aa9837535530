//! The module responsible for writing results to disk.
use crate::controller::Renderer;
use crate::fuel::{Fuel, FuelPrices};
use crate::legend::{LegendEntry, legend_entries};
use crate::pipeline::PipelineOutput;
use crate::pipeline::burden::Summary;
use crate::pipeline::geometry::feature_collection;
use crate::tract::{EnrichedTract, TractKey};
use crate::units::{
    Dimensionless, Energy, EnergyPerHousehold, Households, Money, MoneyPerHousehold, MoneyPerUnit,
};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub mod metadata;

/// The root folder in which dataset-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "energy_burden_results";

/// The output file name for per-tract figures
const TRACTS_FILE_NAME: &str = "tracts.csv";

/// The output file name for the map layer
const GEOJSON_FILE_NAME: &str = "tracts.geojson";

/// The output file name for dataset-wide figures
const SUMMARY_FILE_NAME: &str = "summary.toml";

/// Get the default output directory for the dataset at the specified path
pub fn get_output_dir(dataset_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let dataset_dir = dataset_dir
        .canonicalize()
        .context("Could not resolve path to dataset")?;

    let dataset_name = dataset_dir
        .file_name()
        .context("Dataset cannot be in root folder")?
        .to_str()
        .context("Invalid chars in dataset dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, dataset_name].iter().collect())
}

/// Create a new output directory, deleting an existing one first if `allow_overwrite` is set.
///
/// # Returns
///
/// `true` if an existing folder with results in it was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
            --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// A row of the exported tracts file.
///
/// Unavailable figures are written as empty cells.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct TractRow {
    #[serde(rename = "TractLong")]
    key: TractKey,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "AnnualElectricity_mmbtu")]
    electricity: Option<Energy>,
    #[serde(rename = "AnnualSpaceHeating_mmbtu")]
    space_heating: Option<Energy>,
    #[serde(rename = "OccupiedUnits")]
    occupied_units: Option<Households>,
    #[serde(rename = "MedianHouseholdIncome")]
    median_income: Option<MoneyPerHousehold>,
    #[serde(rename = "AnnualElectricity_cost")]
    electricity_cost: Option<Money>,
    #[serde(rename = "AnnualSpaceHeating_cost")]
    space_heating_cost: Option<Money>,
    #[serde(rename = "AnnualElectricity_mmbtu_hh")]
    electricity_hh: Option<EnergyPerHousehold>,
    #[serde(rename = "AnnualElectricity_cost_hh")]
    electricity_cost_hh: Option<MoneyPerHousehold>,
    #[serde(rename = "AnnualSpaceHeating_mmbtu_hh")]
    space_heating_hh: Option<EnergyPerHousehold>,
    #[serde(rename = "AnnualSpaceHeating_cost_hh")]
    space_heating_cost_hh: Option<MoneyPerHousehold>,
    #[serde(rename = "AnnualEnergyUse_cost_hh")]
    total_cost_hh: Option<MoneyPerHousehold>,
    #[serde(rename = "EnergyBurden_pct")]
    burden_pct: Option<Dimensionless>,
    has_geometry: bool,
}

impl TractRow {
    fn new(tract: &EnrichedTract) -> Self {
        let record = &tract.record;
        let metrics = &tract.metrics;
        Self {
            key: record.key.clone(),
            description: record.description.clone(),
            electricity: record.electricity,
            space_heating: record.space_heating,
            occupied_units: record.occupied_units,
            median_income: record.median_income,
            electricity_cost: metrics.electricity_cost,
            space_heating_cost: metrics.space_heating_cost,
            electricity_hh: metrics.electricity_hh,
            electricity_cost_hh: metrics.electricity_cost_hh,
            space_heating_hh: metrics.space_heating_hh,
            space_heating_cost_hh: metrics.space_heating_cost_hh,
            total_cost_hh: metrics.total_cost_hh,
            burden_pct: metrics.burden_pct,
            has_geometry: tract.has_geometry(),
        }
    }
}

/// The prices used for a run, written alongside each row of the exported tracts file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PriceRow {
    price_electricity: MoneyPerUnit,
    price_heating_oil: MoneyPerUnit,
    price_cordwood: MoneyPerUnit,
    price_natural_gas: MoneyPerUnit,
    price_pellet: MoneyPerUnit,
    price_coal: MoneyPerUnit,
    price_district_heat: MoneyPerUnit,
}

impl PriceRow {
    fn new(prices: &FuelPrices) -> Self {
        Self {
            price_electricity: prices.get(Fuel::Electricity),
            price_heating_oil: prices.get(Fuel::HeatingOil),
            price_cordwood: prices.get(Fuel::Cordwood),
            price_natural_gas: prices.get(Fuel::NaturalGas),
            price_pellet: prices.get(Fuel::Pellet),
            price_coal: prices.get(Fuel::Coal),
            price_district_heat: prices.get(Fuel::DistrictHeat),
        }
    }
}

/// The contents of the summary file
#[derive(Serialize)]
struct SummaryFile<'a> {
    summary: &'a Summary,
    /// Fuel prices keyed by fuel name
    prices: IndexMap<String, MoneyPerUnit>,
    /// Burden classes used to colour the map
    legend: Vec<LegendEntry>,
}

impl<'a> SummaryFile<'a> {
    fn new(output: &'a PipelineOutput) -> Self {
        Self {
            summary: &output.summary,
            prices: output
                .prices
                .iter()
                .map(|(fuel, price)| (fuel.to_string(), price))
                .collect(),
            legend: legend_entries(),
        }
    }
}

/// Writes the results of each recompute to an output folder.
///
/// Every write replaces the files from the previous one, so the folder always holds the results
/// for a single set of prices.
#[derive(Debug)]
pub struct DataWriter {
    output_path: PathBuf,
    writes: usize,
}

impl DataWriter {
    /// Create a writer for the given folder, which must already exist
    pub fn new(output_path: &Path) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            writes: 0,
        }
    }

    /// The folder results are written to
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// How many sets of results have been written
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Write all results to file.
    ///
    /// Each file is first written to a temporary file in the output folder. The previous results
    /// are only replaced once all of them have been written, so a failure leaves the folder holding
    /// the results for a single set of prices.
    pub fn write(&mut self, output: &PipelineOutput) -> Result<()> {
        let staged = [
            (TRACTS_FILE_NAME, self.stage_tracts(output)?),
            (GEOJSON_FILE_NAME, self.stage_geojson(output)?),
            (SUMMARY_FILE_NAME, self.stage_summary(output)?),
        ];

        // A file can't be renamed over a directory
        for (file_name, _) in &staged {
            let file_path = self.output_path.join(file_name);
            ensure!(
                !file_path.is_dir(),
                "Cannot write results to {}: a directory is in the way",
                file_path.display()
            );
        }

        for (file_name, file) in staged {
            let file_path = self.output_path.join(file_name);
            file.persist(&file_path)
                .with_context(|| format!("Failed to write {}", file_path.display()))?;
        }
        self.writes += 1;

        Ok(())
    }

    fn new_temp_file(&self) -> Result<NamedTempFile> {
        NamedTempFile::new_in(&self.output_path).with_context(|| {
            format!(
                "Failed to create temporary file in {}",
                self.output_path.display()
            )
        })
    }

    /// Write per-tract figures in CSV format
    fn stage_tracts(&self, output: &PipelineOutput) -> Result<NamedTempFile> {
        let mut file = self.new_temp_file()?;
        {
            let mut writer = csv::Writer::from_writer(file.as_file_mut());
            for tract in &output.tracts {
                writer.serialize((TractRow::new(tract), PriceRow::new(&output.prices)))?;
            }
            writer.flush()?;
        }

        Ok(file)
    }

    /// Write the map layer in GeoJSON format
    fn stage_geojson(&self, output: &PipelineOutput) -> Result<NamedTempFile> {
        let mut file = self.new_temp_file()?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &feature_collection(&output.tracts))?;
            writer.flush()?;
        }

        Ok(file)
    }

    /// Write dataset-wide figures and the prices used in TOML format
    fn stage_summary(&self, output: &PipelineOutput) -> Result<NamedTempFile> {
        let mut file = self.new_temp_file()?;
        file.write_all(toml::to_string(&SummaryFile::new(output))?.as_bytes())?;

        Ok(file)
    }
}

impl Renderer for DataWriter {
    fn render(&mut self, output: &PipelineOutput) -> Result<()> {
        self.write(output)?;
        info!(
            "Results for {} tracts written to {}",
            output.tracts.len(),
            self.output_path.display()
        );

        Ok(())
    }
}
