//! Census tracts and the per-tract figures derived for them.
use crate::id::{define_id_getter, define_id_type};
use crate::units::{
    Dimensionless, Energy, EnergyPerHousehold, Households, Money, MoneyPerHousehold,
};
use serde::Serialize;
use std::rc::Rc;

define_id_type! {TractKey}

/// A census tract with its energy and demographic figures.
///
/// Numeric fields are `None` if the input value was missing or could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct TractRecord {
    /// Identifier which joins the record to its geometry (e.g. "02090000100")
    pub key: TractKey,
    /// Human-readable description of the tract
    pub description: String,
    /// Annual site-delivered electricity use
    pub electricity: Option<Energy>,
    /// Annual space heating use
    pub space_heating: Option<Energy>,
    /// Number of occupied housing units
    pub occupied_units: Option<Households>,
    /// Median annual household income
    pub median_income: Option<MoneyPerHousehold>,
}
define_id_getter! {TractRecord, TractKey}

/// Figures derived for a tract from a given set of fuel prices.
///
/// Every field is either a finite, non-negative number or `None` if it could not be calculated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TractMetrics {
    /// Annual electricity cost for the whole tract
    pub electricity_cost: Option<Money>,
    /// Annual space heating cost for the whole tract
    pub space_heating_cost: Option<Money>,
    /// Annual electricity use per household
    pub electricity_hh: Option<EnergyPerHousehold>,
    /// Annual electricity cost per household
    pub electricity_cost_hh: Option<MoneyPerHousehold>,
    /// Annual space heating use per household
    pub space_heating_hh: Option<EnergyPerHousehold>,
    /// Annual space heating cost per household
    pub space_heating_cost_hh: Option<MoneyPerHousehold>,
    /// Annual electricity plus space heating cost per household
    pub total_cost_hh: Option<MoneyPerHousehold>,
    /// Total household energy cost as a percentage of median household income
    pub burden_pct: Option<Dimensionless>,
}

/// A tract with its derived figures and, if available, its map geometry
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTract {
    /// The tract's input data
    pub record: Rc<TractRecord>,
    /// Figures derived from the current fuel prices
    pub metrics: TractMetrics,
    /// The tract's shape as a GeoJSON geometry object, if one was found
    pub geometry: Option<Rc<Geometry>>,
}

impl EnrichedTract {
    /// Whether the tract can be drawn on the map
    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}

/// A GeoJSON geometry object.
///
/// Geometry is never inspected by the pipeline, only passed through to the map.
pub type Geometry = serde_json::Value;
