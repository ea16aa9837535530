//! Reading tract data, tract geometry and price overrides from a dataset directory.
use crate::pipeline::geometry::{GeometryMap, find_unmatched_keys};
use crate::tract::TractRecord;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::rc::Rc;

pub mod geometry;
use geometry::read_geometry;
pub mod prices;
pub use prices::read_prices;
pub mod tract;
use tract::read_tracts;

/// The maximum number of unmatched tract keys to list in a warning
const MAX_UNMATCHED_KEYS_SHOWN: usize = 10;

/// The base data for the pipeline: tracts and the shapes used to draw them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Every tract, in file order
    pub records: Vec<Rc<TractRecord>>,
    /// Tract shapes, keyed by tract key
    pub geometry: GeometryMap,
}

/// Read every row of a CSV file.
///
/// Leading and trailing whitespace is trimmed from each field. The file must contain at least one
/// row of data.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?;

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| input_err_msg(file_path))?;
    ensure!(!rows.is_empty(), "{} cannot be empty", file_path.display());

    Ok(rows)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;

    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Load the tracts and their geometry from a dataset directory.
///
/// Tracts without geometry are kept, but a warning is issued listing them.
///
/// # Arguments
///
/// * `dataset_dir` - Folder containing `tracts.csv` and `tracts.geojson`
pub fn load_dataset(dataset_dir: &Path) -> Result<Dataset> {
    let records = read_tracts(dataset_dir)?;
    let geometry = read_geometry(dataset_dir)?;
    info!(
        "Loaded {} tracts and {} tract shapes from {}",
        records.len(),
        geometry.len(),
        dataset_dir.display()
    );
    warn_unmatched(&records, &geometry);

    Ok(Dataset { records, geometry })
}

/// Issue a single warning listing tracts which cannot be drawn on the map
fn warn_unmatched(records: &[Rc<TractRecord>], geometry: &GeometryMap) {
    let unmatched = find_unmatched_keys(records, geometry);
    if unmatched.is_empty() {
        return;
    }

    let mut shown = unmatched.iter().take(MAX_UNMATCHED_KEYS_SHOWN).join(", ");
    if unmatched.len() > MAX_UNMATCHED_KEYS_SHOWN {
        shown.push_str(", ...");
    }
    warn!(
        "{} of {} tracts have no matching geometry and will not be shown on the map: {shown}",
        unmatched.len(),
        records.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: String,
        value: u32,
    }

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id,value\nhello, 1\nworld ,2").unwrap();
        }

        let records: Vec<Record> = read_csv(&file_path).unwrap();
        assert_eq!(
            records,
            [
                Record {
                    id: "hello".to_string(),
                    value: 1,
                },
                Record {
                    id: "world".to_string(),
                    value: 2,
                }
            ]
        );
    }

    #[test]
    fn test_read_csv_empty() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id,value").unwrap();
        }

        assert!(read_csv::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_read_toml() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Value {
            value: u32,
        }

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "value = 1").unwrap();
        }
        assert_eq!(read_toml::<Value>(&file_path).unwrap(), Value { value: 1 });

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "bad toml syntax").unwrap();
        }
        assert!(read_toml::<Value>(&file_path).is_err());
    }

    #[test]
    fn test_input_err_msg() {
        assert_eq!(
            input_err_msg(Path::new("dir").join("tracts.csv")),
            format!("Error reading {}", Path::new("dir").join("tracts.csv").display())
        );
    }
}
