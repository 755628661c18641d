//! Spritmonitor side of the conversion and the classifier producing it.

use crate::domain::mapping;
use crate::domain::model::SourceRecord;
use crate::utils::error::Result;
use serde::Serialize;

/// Column names of the cost file, in field order of [`CostRecord`].
pub const COST_HEADER: [&str; 6] = [
    "Date",
    "Odometer",
    "Cost type",
    "Note",
    "Total price",
    "Currency",
];

/// Column names of the fueling file, in field order of [`FuelingRecord`].
pub const FUELING_HEADER: [&str; 20] = [
    "Date",
    "Odometer",
    "Trip",
    "Quantity",
    "Total price",
    "Currency",
    "Type",
    "Tires",
    "Roads",
    "Driving style",
    "Fuel",
    "Note",
    "Consumption",
    "BC-Consumption",
    "BC-Quantity",
    "BC-Speed",
    "Company",
    "Country",
    "Area",
    "Location",
];

const EMPTY_QUOTED: &str = "\"\"";
const ZERO_AMOUNT: &str = "0,00";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostRecord {
    pub date: String,
    pub odometer: String,
    pub cost_type: String,
    pub note: String,
    pub total_price: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuelingRecord {
    pub date: String,
    pub odometer: String,
    pub trip: String,
    pub quantity: String,
    pub total_price: String,
    pub currency: String,
    pub fueling_type: String,
    pub tires: String,
    pub roads: String,
    pub driving_style: String,
    pub fuel: String,
    pub note: String,
    pub consumption: String,
    pub bc_consumption: String,
    pub bc_quantity: String,
    pub bc_speed: String,
    pub company: String,
    pub country: String,
    pub area: String,
    pub location: String,
}

/// One output row in either destination schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRecord {
    Cost(CostRecord),
    Fueling(FuelingRecord),
}

/// Produces every destination row the record qualifies for.
///
/// A record can be a cost, a fueling, both or neither. A fueling row with
/// an unknown driving style comes back as an error; the cost row of the
/// same record is unaffected.
pub fn transform(rec: &SourceRecord) -> Vec<Result<TargetRecord>> {
    let mut out = Vec::new();
    if let Some(cost) = to_cost(rec) {
        out.push(Ok(TargetRecord::Cost(cost)));
    }
    if let Some(fueling) = to_fueling(rec).transpose() {
        out.push(fueling.map(TargetRecord::Fueling));
    }
    out
}

/// `None` unless the record has a cost id.
pub fn to_cost(rec: &SourceRecord) -> Option<CostRecord> {
    if !rec.is_cost() {
        return None;
    }

    let odometer = parse_number(&rec.odometer()).unwrap_or(0.0).trunc() as i64;
    let odometer = if odometer == 0 {
        ZERO_AMOUNT.to_string()
    } else {
        format!("{},00", odometer)
    };

    let total_price = if parse_number(rec.cost()).unwrap_or(0.0) == 0.0 {
        ZERO_AMOUNT.to_string()
    } else {
        decimal_comma(rec.cost())
    };

    let note = if rec.notes().is_empty() {
        EMPTY_QUOTED.to_string()
    } else {
        rec.notes().to_string()
    };

    Some(CostRecord {
        date: spritmonitor_date(rec),
        odometer,
        cost_type: mapping::cost_code(rec.cost_type()).to_string(),
        note,
        total_price,
        currency: quoted(rec.currency()),
    })
}

/// `Ok(None)` unless the record has a fuel id.
pub fn to_fueling(rec: &SourceRecord) -> Result<Option<FuelingRecord>> {
    if !rec.is_fueling() {
        return Ok(None);
    }

    let driving_style = mapping::driving_style_code(rec.driving_style())?;

    let trip = rec.trip_odometer();
    let trip_value = parse_number(&trip);
    let trip_is_zero = trip_value.map(|t| t == 0.0).unwrap_or(trip.trim().is_empty());

    let consumption = match (trip_value, parse_number(rec.quantity())) {
        (Some(t), Some(q)) if t > 0.0 => decimal_comma(&format!("{:.2}", q * 100.0 / t)),
        _ => String::new(),
    };

    let code = |c: Option<u8>| c.map(|v| v.to_string()).unwrap_or_default();

    Ok(Some(FuelingRecord {
        date: spritmonitor_date(rec),
        odometer: decimal_comma(&rec.odometer()),
        trip: decimal_comma(&trip),
        quantity: decimal_comma(rec.quantity()),
        total_price: decimal_comma(rec.cost()),
        currency: quoted(rec.currency()),
        fueling_type: code(mapping::fueling_type_code(rec.fueling_type(), trip_is_zero)),
        tires: code(mapping::tires_code(rec.tires())),
        roads: mapping::roads_mask(rec.route_city(), rec.route_motorway(), rec.route_country())
            .to_string(),
        driving_style: driving_style.to_string(),
        fuel: code(mapping::fuel_code(rec.fuel_name())),
        note: quoted(rec.notes()),
        consumption,
        bc_consumption: decimal_comma(rec.bc_consumption()),
        bc_quantity: String::new(),
        bc_speed: decimal_comma(rec.bc_avg_speed()),
        company: quoted(rec.gas_station_name()),
        country: if rec.currency() == "PLN" {
            "PL".to_string()
        } else {
            String::new()
        },
        area: EMPTY_QUOTED.to_string(),
        location: EMPTY_QUOTED.to_string(),
    }))
}

fn spritmonitor_date(rec: &SourceRecord) -> String {
    rec.day().format("%d.%m.%Y").to_string()
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

fn decimal_comma(value: &str) -> String {
    value.replace('.', ",")
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value)
}
