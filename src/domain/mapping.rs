//! Translation tables from motostat enumerations to spritmonitor codes.

use crate::utils::error::{EtlError, Result};

/// Spritmonitor fueling type for the first fueling of a vehicle.
pub const FIRST_FUELING: u8 = 3;

/// Fallback cost code ("miscellaneous").
pub const MISC_COST: u8 = 11;

/// `None` when the type is unknown.
pub fn fueling_type_code(fueling_type: &str, trip_is_zero: bool) -> Option<u8> {
    if trip_is_zero {
        return Some(FIRST_FUELING);
    }
    match fueling_type {
        "full" => Some(1),
        "partial" => Some(2),
        _ => None,
    }
}

pub fn tires_code(tires: &str) -> Option<u8> {
    match tires {
        "summer" => Some(1),
        "winter" => Some(2),
        "full_year" => Some(3),
        _ => None,
    }
}

/// Unlike the other tables an unknown driving style is an error.
pub fn driving_style_code(style: &str) -> Result<u8> {
    match style {
        "economical" => Ok(1),
        "normal" => Ok(2),
        "speedy" => Ok(3),
        other => Err(EtlError::UnmappedDrivingStyle {
            value: other.to_string(),
        }),
    }
}

/// Bitmask of roads used: city 4, motorway 2, country 8.
pub fn roads_mask(route_city: &str, route_motorway: &str, route_country: &str) -> u8 {
    let used = |share: &str| share.trim().parse::<f64>().map(|v| v > 0.0).unwrap_or(false);

    let mut mask = 0;
    if used(route_city) {
        mask += 4;
    }
    if used(route_motorway) {
        mask += 2;
    }
    if used(route_country) {
        mask += 8;
    }
    mask
}

const FUEL_CODES: &[(&str, u8)] = &[
    ("Eurosuper 95", 6),
    ("\"Eurosuper 95\"", 6),
    ("95 miles", 6),
    ("\"95 miles\"", 6),
    ("inna benzyna", 6),
    ("\"inna benzyna\"", 6),
    ("Super Plus 98", 8),
    ("\"Super Plus 98\"", 8),
    ("LPG", 12),
    ("\"LPG\"", 12),
    ("inny gaz LPG", 12),
    ("\"inny gaz LPG\"", 12),
    ("CNG", 14),
    ("\"CNG\"", 14),
    ("Shell V-Power", 18),
    ("\"Shell V-Power\"", 18),
    ("Statoil SupraGaz", 18),
    ("\"Statoil SupraGaz\"", 18),
];

pub fn fuel_code(fuel_name: &str) -> Option<u8> {
    FUEL_CODES
        .iter()
        .find(|(name, _)| *name == fuel_name)
        .map(|(_, code)| *code)
}

const COST_CODES: &[(&str, u8)] = &[
    ("maintenance", 1),
    ("repair", 2),
    ("tires_change", 3),
    ("oil_change", 4),
    ("insurance", 5),
    ("tax", 6),
    ("tuning", 8),
    ("accessories", 9),
    ("car_audio", 9),
    ("purchase_price", 10),
    ("miscellaneous", 11),
    ("tech_inspection", 11),
    ("inspection", 11),
    ("care", 12),
    ("registration", 14),
    ("fine", 17),
    ("parking_tax", 18),
    ("toll", 19),
    ("spare_parts", 20),
];

/// Unknown categories fall back to [`MISC_COST`].
pub fn cost_code(cost_type: &str) -> u8 {
    COST_CODES
        .iter()
        .find(|(name, _)| *name == cost_type)
        .map(|(_, code)| *code)
        .unwrap_or(MISC_COST)
}
