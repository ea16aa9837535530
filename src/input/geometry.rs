//! Code for reading tract shapes from a GeoJSON file.
use super::*;
use crate::pipeline::geometry::TRACT_KEY_PROPERTY;
use crate::tract::{Geometry, TractKey};
use anyhow::bail;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;

const GEOMETRY_FILE_NAME: &str = "tracts.geojson";

#[derive(Debug, Deserialize)]
struct FeatureCollectionRaw {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<FeatureRaw>,
}

#[derive(Debug, Deserialize)]
struct FeatureRaw {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

/// Read tract shapes from the dataset directory.
///
/// # Arguments
///
/// * `dataset_dir` - Folder containing the dataset files
///
/// # Returns
///
/// Each tract's geometry keyed by tract key, in file order
pub fn read_geometry(dataset_dir: &Path) -> Result<GeometryMap> {
    let file_path = dataset_dir.join(GEOMETRY_FILE_NAME);
    let file = File::open(&file_path).with_context(|| input_err_msg(&file_path))?;
    let collection: FeatureCollectionRaw = serde_json::from_reader(BufReader::new(file))
        .with_context(|| input_err_msg(&file_path))?;

    read_geometry_from_collection(collection).with_context(|| input_err_msg(&file_path))
}

fn read_geometry_from_collection(collection: FeatureCollectionRaw) -> Result<GeometryMap> {
    ensure!(
        collection.kind == "FeatureCollection",
        "Expected a FeatureCollection, found {}",
        collection.kind
    );

    let mut geometry = GeometryMap::new();
    for (index, feature) in collection.features.into_iter().enumerate() {
        let Some(key) = feature_key(feature.properties.as_ref()) else {
            warn!("Feature {index} has no {TRACT_KEY_PROPERTY} property and will be skipped");
            continue;
        };
        let Some(shape) = feature.geometry else {
            warn!("Feature {index} ({key}) has no geometry and will be skipped");
            continue;
        };

        if geometry.insert(key.clone(), Rc::new(shape)).is_some() {
            bail!("Duplicate {TRACT_KEY_PROPERTY} in geometry: {key}");
        }
    }

    Ok(geometry)
}

/// Get the tract key of a feature.
///
/// Keys stored as JSON numbers are converted to their textual form.
fn feature_key(properties: Option<&Map<String, Value>>) -> Option<TractKey> {
    let key = match properties?.get(TRACT_KEY_PROPERTY)? {
        Value::String(key) => key.clone(),
        Value::Number(key) => key.to_string(),
        _ => return None,
    };

    (!key.is_empty()).then(|| key.into())
}
