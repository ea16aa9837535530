//! The command line interface for the program.
use crate::controller::RecomputeController;
use crate::fuel::{
    Fuel, FuelPrices, FuelRates, check_price, cost_per_useful_mmbtu, electricity_cost_per_mmbtu,
};
use crate::input::{Dataset, load_dataset, read_prices};
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{DataWriter, create_output_directory, get_output_dir};
use crate::settings::Settings;
use crate::units::MoneyPerUnit;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use strum::IntoEnumIterator;

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Set the price of a fuel, e.g. `--price heating_oil=5.25`. May be repeated.
    #[arg(long = "price", value_name = "FUEL=PRICE", value_parser = parse_price_edit)]
    pub prices: Vec<(Fuel, MoneyPerUnit)>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Calculate energy burden for a dataset and write the results to disk.
    Run {
        /// Path to the dataset directory.
        dataset_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example datasets.
    Example {
        /// The available subcommands for managing example datasets.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Check that a dataset can be loaded.
    Validate {
        /// The path to the dataset directory.
        dataset_dir: PathBuf,
    },
    /// Show fuel prices and the resulting cost per MMBTU of heat.
    Prices {
        /// Dataset whose price overrides should be shown (defaults are shown if omitted).
        dataset_dir: Option<PathBuf>,
    },
    /// Manage the program settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { dataset_dir, opts } => handle_run_command(&dataset_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { dataset_dir } => handle_validate_command(&dataset_dir, None),
            Self::Prices { dataset_dir } => handle_prices_command(dataset_dir.as_deref()),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ energy-burden --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Parse a price edit given on the command line (e.g. `coal=150`)
fn parse_price_edit(s: &str) -> Result<(Fuel, MoneyPerUnit)> {
    let (fuel, price) = s
        .split_once('=')
        .context("Price must be given as FUEL=PRICE")?;
    let fuel = Fuel::from_str(fuel.trim())
        .ok()
        .with_context(|| format!("Unknown fuel: {}", fuel.trim()))?;
    let price = price
        .trim()
        .parse()
        .map(MoneyPerUnit)
        .with_context(|| format!("Invalid price for {fuel}: {}", price.trim()))?;
    check_price(fuel, price)?;

    Ok((fuel, price))
}

/// Handle the `run` command.
pub fn handle_run_command(
    dataset_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(dataset_path)?;
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, opts.overwrite || settings.overwrite)
            .with_context(|| {
                format!(
                    "Failed to create output directory: {}",
                    output_path.display()
                )
            })?;

    log::init(Some(&settings.log_level), Some(output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let (dataset, prices) = load(dataset_path).context("Failed to load dataset.")?;
    info!("Output folder: {}", output_path.display());
    write_metadata(output_path, dataset_path, dataset.records.len())
        .context("Failed to save metadata.")?;

    let mut controller = RecomputeController::new(
        dataset,
        prices,
        settings.debounce_interval(),
        DataWriter::new(output_path),
    )?;

    // Price edits from the command line are applied as one batch
    let now = Instant::now();
    for (fuel, price) in &opts.prices {
        controller.on_price_input(*fuel, *price, now)?;
    }
    controller.flush()?;

    let output = controller
        .output()
        .expect("Controller should have produced results");
    info!(
        "Energy burden calculated for {} tracts ({} mapped)",
        output.summary.tract_count, output.summary.mapped_tract_count
    );

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(dataset_path: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    load(dataset_path).context("Failed to validate dataset.")?;
    info!("Dataset validation successful!");

    Ok(())
}

/// Handle the `prices` command.
fn handle_prices_command(dataset_path: Option<&Path>) -> Result<()> {
    let prices = match dataset_path {
        Some(dataset_path) => read_prices(dataset_path)?,
        None => FuelPrices::default(),
    };

    print!("{}", format_price_table(&prices));

    Ok(())
}

/// Describe each fuel's price control and what the current price means per MMBTU of heat
pub fn format_price_table(prices: &FuelPrices) -> String {
    let mut out = format!(
        "{:<14} {:>8} {:>8} {:>8} {:>6} {:>8} {:>14}\n",
        "fuel", "price", "min", "max", "step", "unit", "cost/MMBTU"
    );
    for fuel in Fuel::iter() {
        let range = fuel.price_range();
        let price = prices.get(fuel);
        let cost = if fuel == Fuel::Electricity {
            electricity_cost_per_mmbtu(price)
        } else {
            let constants = fuel.constants();
            cost_per_useful_mmbtu(price, constants.heat_content, constants.efficiency)
        };

        writeln!(
            &mut out,
            "{:<14} {:>8.2} {:>8.2} {:>8.2} {:>6.2} {:>8} {:>14.2}",
            fuel.to_string(),
            price.0,
            range.min.0,
            range.max.0,
            range.step.0,
            fuel.unit(),
            cost.0
        )
        .unwrap();
    }

    let rates = FuelRates::from_prices(prices);
    write!(
        &mut out,
        "\nElectricity: {:.2} per MMBTU\nSpace heating (blended): {:.2} per MMBTU\n",
        rates.electricity.0, rates.space_heating.0
    )
    .unwrap();

    out
}

/// Load a dataset and its prices
fn load(dataset_path: &Path) -> Result<(Dataset, FuelPrices)> {
    let dataset = load_dataset(dataset_path)?;
    let prices = read_prices(dataset_path)?;

    Ok((dataset, prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    #[rstest]
    #[case("coal=150", Fuel::Coal, 150.0)]
    #[case(" heating_oil = 5.25 ", Fuel::HeatingOil, 5.25)]
    #[case("electricity=0", Fuel::Electricity, 0.0)]
    fn test_parse_price_edit(#[case] s: &str, #[case] fuel: Fuel, #[case] price: f64) {
        assert_eq!(parse_price_edit(s).unwrap(), (fuel, MoneyPerUnit(price)));
    }

    #[rstest]
    #[case("coal", "Price must be given as FUEL=PRICE")]
    #[case("peat=1", "Unknown fuel: peat")]
    #[case("coal=cheap", "Invalid price for coal: cheap")]
    #[case(
        "coal=-1",
        "Price for coal must be a finite number no less than zero (got -1)"
    )]
    #[case(
        "coal=inf",
        "Price for coal must be a finite number no less than zero (got inf)"
    )]
    fn test_parse_price_edit_invalid(#[case] s: &str, #[case] msg: &str) {
        assert_error!(parse_price_edit(s), msg);
    }

    #[test]
    fn test_format_price_table() {
        let table = format_price_table(&FuelPrices::default());
        let lines: Vec<_> = table.lines().collect();

        // Header, one line per fuel, a blank line and two summary lines
        assert_eq!(lines.len(), 1 + Fuel::iter().count() + 3);
        assert!(lines[1].starts_with("electricity"));
        assert!(lines[1].ends_with("73.27"));
        assert!(table.contains("Space heating (blended): 36.27 per MMBTU"));
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
