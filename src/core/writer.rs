use crate::utils::error::{EtlError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

pub const COSTS_FILE: &str = "spritmonitor_costs.csv";
pub const FUELINGS_FILE: &str = "spritmonitor_fuelings.csv";

/// Serialises rows as `;`-separated text below `header`.
///
/// Values are written as they are; the rows already carry whatever quotes
/// spritmonitor expects. No rows, no output.
pub fn to_csv_bytes<T: Serialize>(header: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::target::{CostRecord, FuelingRecord, COST_HEADER, FUELING_HEADER};

    fn cost() -> CostRecord {
        CostRecord {
            date: "05.03.2021".to_string(),
            odometer: "0,00".to_string(),
            cost_type: "19".to_string(),
            note: "\"\"".to_string(),
            total_price: "12,50".to_string(),
            currency: "\"EUR\"".to_string(),
        }
    }

    #[test]
    fn test_cost_file_layout() {
        let bytes = to_csv_bytes(&COST_HEADER, &[cost()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], COST_HEADER.join(";"));
        assert_eq!(lines[1], "05.03.2021;0,00;19;\"\";12,50;\"EUR\"");
        assert!(text.ends_with('\n') && !text.contains('\r'));
    }

    #[test]
    fn test_fueling_header_matches_schema() {
        let row = FuelingRecord {
            date: "14.07.2022".to_string(),
            odometer: "120000".to_string(),
            trip: "500".to_string(),
            quantity: "35,5".to_string(),
            total_price: "210,45".to_string(),
            currency: "\"PLN\"".to_string(),
            fueling_type: "1".to_string(),
            tires: String::new(),
            roads: "12".to_string(),
            driving_style: "2".to_string(),
            fuel: "12".to_string(),
            note: "\"\"".to_string(),
            consumption: "7,10".to_string(),
            bc_consumption: String::new(),
            bc_quantity: String::new(),
            bc_speed: String::new(),
            company: "\"Orlen\"".to_string(),
            country: "PL".to_string(),
            area: "\"\"".to_string(),
            location: "\"\"".to_string(),
        };
        let text = String::from_utf8(to_csv_bytes(&FUELING_HEADER, &[row]).unwrap()).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), FUELING_HEADER.join(";"));
        assert_eq!(lines.next().unwrap().split(';').count(), FUELING_HEADER.len());
    }

    #[test]
    fn test_no_rows_no_output() {
        let bytes = to_csv_bytes::<CostRecord>(&COST_HEADER, &[]).unwrap();
        assert!(bytes.is_empty());
    }
}
