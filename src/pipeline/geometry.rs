//! Joining tracts to their map geometry and building the map layer.
use crate::legend::{burden_colour, burden_label};
use crate::tract::{EnrichedTract, Geometry, TractKey, TractMetrics, TractRecord};
use crate::units::UnitType;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::rc::Rc;

/// Tract geometry, keyed by tract key
pub type GeometryMap = IndexMap<TractKey, Rc<Geometry>>;

/// The name of the feature property which holds the tract key
pub const TRACT_KEY_PROPERTY: &str = "TractLong";

/// Attach geometry to each tract by exact key equality.
///
/// Tracts without a matching shape keep their figures but have no geometry.
pub fn join_geometry<'a, I>(tracts: I, geometry: &GeometryMap) -> Vec<EnrichedTract>
where
    I: IntoIterator<Item = (&'a Rc<TractRecord>, TractMetrics)>,
{
    tracts
        .into_iter()
        .map(|(record, metrics)| EnrichedTract {
            record: Rc::clone(record),
            metrics,
            geometry: geometry.get(&record.key).cloned(),
        })
        .collect()
}

/// Keys of tracts which have no matching geometry
pub fn find_unmatched_keys<'a, I>(records: I, geometry: &GeometryMap) -> Vec<&'a TractKey>
where
    I: IntoIterator<Item = &'a Rc<TractRecord>>,
{
    records
        .into_iter()
        .map(|record| &record.key)
        .filter(|key| !geometry.contains_key(*key))
        .collect()
}

/// Build a GeoJSON `FeatureCollection` containing every tract which has geometry.
///
/// Tracts without geometry are left out.
pub fn feature_collection(tracts: &[EnrichedTract]) -> Value {
    let features: Vec<_> = tracts
        .iter()
        .filter_map(|tract| {
            let geometry = tract.geometry.as_ref()?;
            Some(json!({
                "type": "Feature",
                "properties": feature_properties(tract),
                "geometry": &**geometry,
            }))
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// The properties shown for a tract on the map
fn feature_properties(tract: &EnrichedTract) -> Map<String, Value> {
    let metrics = &tract.metrics;
    let mut properties = Map::new();
    properties.insert(TRACT_KEY_PROPERTY.into(), tract.record.key.to_string().into());
    properties.insert(
        "Description".into(),
        tract.record.description.clone().into(),
    );

    let figures = [
        ("AnnualElectricity_cost", metrics.electricity_cost.map(|x| x.value())),
        ("AnnualSpaceHeating_cost", metrics.space_heating_cost.map(|x| x.value())),
        ("AnnualElectricity_mmbtu_hh", metrics.electricity_hh.map(|x| x.value())),
        ("AnnualElectricity_cost_hh", metrics.electricity_cost_hh.map(|x| x.value())),
        ("AnnualSpaceHeating_mmbtu_hh", metrics.space_heating_hh.map(|x| x.value())),
        ("AnnualSpaceHeating_cost_hh", metrics.space_heating_cost_hh.map(|x| x.value())),
        ("AnnualEnergyUse_cost_hh", metrics.total_cost_hh.map(|x| x.value())),
        ("EnergyBurden_pct", metrics.burden_pct.map(|x| x.value())),
        // Burden as a fraction, for map styles which expect one
        ("EnergyBurden", metrics.burden_pct.map(|x| x.value() / 100.0)),
    ];
    for (name, value) in figures {
        properties.insert(name.into(), json!(value));
    }

    properties.insert("burden_label".into(), burden_label(metrics.burden_pct).into());
    properties.insert("fill_colour".into(), burden_colour(metrics.burden_pct).into());

    properties
}
