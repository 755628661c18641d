//! Source side of the conversion: one motostat export line as a typed record.

use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Column names of the motostat export, in file order.
pub const SOURCE_COLUMNS: [&str; 23] = [
    "cost_id",
    "fueling_id",
    "cost_type",
    "date",
    "fuel_id",
    "gas_station_id",
    "odometer",
    "trip_odometer",
    "quantity",
    "cost",
    "notes",
    "fueling_type",
    "tires",
    "driving_style",
    "route_motorway",
    "route_country",
    "route_city",
    "bc_consumption",
    "bc_avg_speed",
    "ac",
    "currency",
    "fuel_name",
    "gas_station_name",
];

/// Older exports lack `fuel_name` and `gas_station_name`.
const LEGACY_COLUMN_COUNT: usize = 21;

const KM_TO_MILES: f64 = 0.621371192;

/// Divisor placing the record id in the fractional part of the order key.
const ID_SLOT: f64 = 10_000.0;

/// Splits on `;` unless the semicolon sits inside a quoted span.
///
/// A semicolon separates fields only when the rest of the line after it
/// consists of plain characters and complete `'...'` or `"..."` groups.
/// Single quotes matter only in that they may hide double quotes.
pub fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let n = bytes.len();

    // next_single[i] / next_double[i]: first index >= i holding that quote
    let mut next_single = vec![n; n + 1];
    let mut next_double = vec![n; n + 1];
    for i in (0..n).rev() {
        next_single[i] = if bytes[i] == b'\'' { i } else { next_single[i + 1] };
        next_double[i] = if bytes[i] == b'"' { i } else { next_double[i + 1] };
    }

    // balanced[i]: the suffix starting at i has no unpaired double quote
    let mut balanced = vec![false; n + 1];
    balanced[n] = true;
    for i in (0..n).rev() {
        balanced[i] = match bytes[i] {
            b'"' => {
                let close = next_double[i + 1];
                close < n && balanced[close + 1]
            }
            b'\'' => {
                let close = next_single[i + 1];
                balanced[i + 1] || (close < n && balanced[close + 1])
            }
            _ => balanced[i + 1],
        };
    }

    let mut fields = Vec::new();
    let mut start = 0;
    for i in 0..n {
        if bytes[i] == b';' && balanced[i + 1] {
            fields.push(&line[start..i]);
            start = i + 1;
        }
    }
    fields.push(&line[start..]);
    fields
}

/// All 23 export columns of one line, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub cost_id: String,
    pub fueling_id: String,
    pub cost_type: String,
    pub date: String,
    pub fuel_id: String,
    pub gas_station_id: String,
    pub odometer: String,
    pub trip_odometer: String,
    pub quantity: String,
    pub cost: String,
    pub notes: String,
    pub fueling_type: String,
    pub tires: String,
    pub driving_style: String,
    pub route_motorway: String,
    pub route_country: String,
    pub route_city: String,
    pub bc_consumption: String,
    pub bc_avg_speed: String,
    pub ac: String,
    pub currency: String,
    pub fuel_name: String,
    pub gas_station_name: String,
}

impl RawFields {
    /// Builds the fields of one line.
    ///
    /// Returns `None` for the header row and for any line that does not
    /// carry exactly 23 columns (21 legacy columns are padded first).
    pub fn from_line(line: &str) -> Option<Self> {
        let mut values: Vec<String> = split_fields(line).into_iter().map(String::from).collect();
        if values.len() == LEGACY_COLUMN_COUNT {
            values.resize(SOURCE_COLUMNS.len(), String::new());
        }
        if values.len() != SOURCE_COLUMNS.len() || values[0] == SOURCE_COLUMNS[0] {
            return None;
        }

        let mut it = values.into_iter();
        let mut next = || it.next().unwrap_or_default();
        Some(Self {
            cost_id: next(),
            fueling_id: next(),
            cost_type: next(),
            date: next(),
            fuel_id: next(),
            gas_station_id: next(),
            odometer: next(),
            trip_odometer: next(),
            quantity: next(),
            cost: next(),
            notes: next(),
            fueling_type: next(),
            tires: next(),
            driving_style: next(),
            route_motorway: next(),
            route_country: next(),
            route_city: next(),
            bc_consumption: next(),
            bc_avg_speed: next(),
            ac: next(),
            currency: next(),
            fuel_name: next(),
            gas_station_name: next(),
        })
    }
}

/// One parsed export line plus its position in time.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    fields: RawFields,
    date: NaiveDate,
    order_key: f64,
    use_miles: bool,
}

impl SourceRecord {
    /// Parses one input line.
    ///
    /// `Ok(None)` means "skip this line" (header or wrong column count).
    /// A bad date or a non-numeric id is reported as an error.
    pub fn parse(line: &str, use_miles: bool) -> Result<Option<Self>> {
        match RawFields::from_line(line) {
            Some(fields) => Self::from_fields(fields, use_miles).map(Some),
            None => Ok(None),
        }
    }

    pub fn from_fields(fields: RawFields, use_miles: bool) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&fields.date, "%Y-%m-%d").map_err(|_| {
            EtlError::DateParse {
                value: fields.date.clone(),
            }
        })?;
        let ts = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .ok_or_else(|| EtlError::DateParse {
                value: fields.date.clone(),
            })?;

        let id = if fields.cost_id.is_empty() {
            &fields.fueling_id
        } else {
            &fields.cost_id
        };
        let id_value = id
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| EtlError::NonNumericId { value: id.clone() })?;

        Ok(Self {
            order_key: ts as f64 + id_value / ID_SLOT,
            fields,
            date,
            use_miles,
        })
    }

    pub fn order_key(&self) -> f64 {
        self.order_key
    }

    pub fn raw(&self) -> &RawFields {
        &self.fields
    }

    /// Calendar day the order key was derived from.
    pub fn day(&self) -> NaiveDate {
        self.date
    }

    pub fn is_cost(&self) -> bool {
        !self.fields.cost_id.is_empty()
    }

    pub fn is_fueling(&self) -> bool {
        !self.fields.fuel_id.is_empty()
    }

    /// Id used for logging: cost id when present, fueling id otherwise.
    pub fn id(&self) -> &str {
        if self.is_cost() {
            &self.fields.cost_id
        } else {
            &self.fields.fueling_id
        }
    }

    pub fn cost_id(&self) -> &str {
        &self.fields.cost_id
    }

    pub fn fueling_id(&self) -> &str {
        &self.fields.fueling_id
    }

    pub fn cost_type(&self) -> &str {
        &self.fields.cost_type
    }

    pub fn date(&self) -> &str {
        &self.fields.date
    }

    pub fn fuel_id(&self) -> &str {
        &self.fields.fuel_id
    }

    pub fn gas_station_id(&self) -> &str {
        &self.fields.gas_station_id
    }

    /// Odometer reading, converted to whole miles when requested.
    pub fn odometer(&self) -> String {
        self.distance(&self.fields.odometer, 0)
    }

    /// Trip distance, converted to miles (2 decimals) when requested.
    pub fn trip_odometer(&self) -> String {
        self.distance(&self.fields.trip_odometer, 2)
    }

    fn distance(&self, raw: &str, precision: usize) -> String {
        if !self.use_miles {
            return raw.to_string();
        }
        match raw.trim().parse::<f64>() {
            Ok(km) => format!("{:.*}", precision, km * KM_TO_MILES),
            Err(_) => raw.to_string(),
        }
    }

    pub fn quantity(&self) -> &str {
        &self.fields.quantity
    }

    pub fn cost(&self) -> &str {
        &self.fields.cost
    }

    pub fn notes(&self) -> &str {
        &self.fields.notes
    }

    pub fn fueling_type(&self) -> &str {
        &self.fields.fueling_type
    }

    pub fn tires(&self) -> &str {
        &self.fields.tires
    }

    pub fn driving_style(&self) -> &str {
        &self.fields.driving_style
    }

    pub fn route_motorway(&self) -> &str {
        &self.fields.route_motorway
    }

    pub fn route_country(&self) -> &str {
        &self.fields.route_country
    }

    pub fn route_city(&self) -> &str {
        &self.fields.route_city
    }

    pub fn bc_consumption(&self) -> &str {
        &self.fields.bc_consumption
    }

    pub fn bc_avg_speed(&self) -> &str {
        &self.fields.bc_avg_speed
    }

    pub fn ac(&self) -> &str {
        &self.fields.ac
    }

    pub fn currency(&self) -> &str {
        &self.fields.currency
    }

    /// Fuel name without one layer of surrounding double quotes.
    pub fn fuel_name(&self) -> &str {
        let name = self.fields.fuel_name.as_str();
        name.strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(name)
    }

    pub fn gas_station_name(&self) -> &str {
        &self.fields.gas_station_name
    }

    /// True for LPG and CNG fuelings.
    pub fn gas(&self) -> bool {
        let name = self.fuel_name();
        name.contains("LPG") || name.contains("CNG")
    }

    /// Orders by `order_key`, most recent first.
    pub fn cmp_descending(a: &Self, b: &Self) -> Ordering {
        b.order_key.total_cmp(&a.order_key)
    }
}

impl PartialEq for SourceRecord {
    fn eq(&self, other: &Self) -> bool {
        self.order_key == other.order_key
    }
}

impl PartialOrd for SourceRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.order_key.partial_cmp(&other.order_key)
    }
}
