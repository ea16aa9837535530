//! Colour classes for drawing energy burden on the map.
use crate::units::Dimensionless;
use serde::Serialize;

/// Fill colour for tracts whose burden could not be calculated
pub const UNAVAILABLE_COLOUR: &str = "#cccccc";

/// Lower bounds of the burden classes (percent) and their fill colours, highest first
const BURDEN_CLASSES: [(f64, &str); 8] = [
    (15.0, "#800026"),
    (12.0, "#BD0026"),
    (10.0, "#E31A1C"),
    (8.0, "#FC4E2A"),
    (6.0, "#FD8D3C"),
    (4.0, "#FEB24C"),
    (2.0, "#FED976"),
    (0.0, "#FFEDA0"),
];

/// The fill colour for a burden percentage.
///
/// A tract falls into a class if its burden is strictly greater than the class's lower bound.
pub fn burden_colour(burden_pct: Option<Dimensionless>) -> &'static str {
    let Some(burden_pct) = burden_pct else {
        return UNAVAILABLE_COLOUR;
    };

    BURDEN_CLASSES
        .iter()
        .find(|(lower, _)| burden_pct.0 > *lower)
        .map_or(BURDEN_CLASSES[BURDEN_CLASSES.len() - 1].1, |(_, colour)| *colour)
}

/// Format a burden for display (e.g. "5.83%" or "N/A")
pub fn burden_label(burden_pct: Option<Dimensionless>) -> String {
    match burden_pct {
        Some(burden_pct) => format!("{:.2}%", burden_pct.0),
        None => "N/A".to_string(),
    }
}

/// An entry in the map legend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    /// Text describing the range of the class (e.g. "2%–4%")
    pub label: String,
    /// Fill colour for the class
    pub colour: &'static str,
}

/// Legend entries in ascending order of burden
pub fn legend_entries() -> Vec<LegendEntry> {
    let mut entries: Vec<_> = BURDEN_CLASSES
        .iter()
        .rev()
        .zip(BURDEN_CLASSES.iter().rev().skip(1).map(Some).chain([None]))
        .map(|((from, colour), to)| LegendEntry {
            label: match to {
                Some((to, _)) => format!("{from}%–{to}%"),
                None => format!("{from}%+"),
            },
            colour: *colour,
        })
        .collect();
    entries.push(LegendEntry {
        label: "N/A".to_string(),
        colour: UNAVAILABLE_COLOUR,
    });

    entries
}
