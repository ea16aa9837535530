//! Calculate household energy burden for census tracts from regional fuel prices.
//!
//! Fuel prices are turned into a cost per MMBTU of electricity and of space heat, which is applied
//! to each tract's energy use to give household energy costs and the energy burden (costs as a
//! percentage of median household income). Results are joined to tract geometry for mapping.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod controller;
pub mod fuel;
pub mod id;
pub mod input;
pub mod legend;
pub mod log;
pub mod metric;
pub mod output;
pub mod pipeline;
pub mod settings;
pub mod tract;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the folder where the program's configuration files are stored
pub fn get_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir is defined on this platform, so fall back to the current directory
        return PathBuf::default();
    };

    config_dir.push("energy-burden");
    config_dir
}
