use crate::domain::model::SourceRecord;
use crate::domain::target::{self, CostRecord, FuelingRecord, TargetRecord};
use crate::utils::error::Result;

/// Both destination tables, most recent row first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSet {
    pub costs: Vec<CostRecord>,
    pub fuelings: Vec<FuelingRecord>,
    /// Fueling rows left out because they could not be translated.
    pub dropped_fuelings: usize,
}

impl OutputSet {
    /// Sorts the records (descending by order key) and routes every row they
    /// translate into to its table.
    ///
    /// A record carrying both a cost id and a fuel id lands in both tables.
    /// Recoverable translation errors drop the row; any other error fails.
    pub fn from_records(records: &[SourceRecord]) -> Result<Self> {
        let mut sorted: Vec<&SourceRecord> = records.iter().collect();
        sorted.sort_by(|a, b| SourceRecord::cmp_descending(a, b));

        let mut set = Self::default();
        for rec in sorted {
            for row in target::transform(rec) {
                match row {
                    Ok(TargetRecord::Cost(cost)) => set.costs.push(cost),
                    Ok(TargetRecord::Fueling(fueling)) => set.fuelings.push(fueling),
                    Err(e) if e.is_recoverable() => {
                        tracing::warn!(
                            "Skipping fueling of record {} ({}): {}",
                            rec.id(),
                            rec.date(),
                            e
                        );
                        set.dropped_fuelings += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty() && self.fuelings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub files: Vec<WrittenFile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::tests::line_with;

    fn record(values: &[(&str, &str)]) -> SourceRecord {
        SourceRecord::parse(&line_with(values), false).unwrap().unwrap()
    }

    #[test]
    fn test_rows_are_sorted_most_recent_first() {
        let records = vec![
            record(&[("cost_id", "1"), ("date", "2021-01-01"), ("cost", "1")]),
            record(&[("cost_id", "3"), ("date", "2021-06-01"), ("cost", "3")]),
            record(&[("cost_id", "2"), ("date", "2021-06-01"), ("cost", "2")]),
        ];
        let set = OutputSet::from_records(&records).unwrap();

        let prices: Vec<&str> = set.costs.iter().map(|c| c.total_price.as_str()).collect();
        assert_eq!(prices, vec!["3", "2", "1"]);
        assert!(set.fuelings.is_empty());
    }

    #[test]
    fn test_record_in_both_tables() {
        let records = vec![record(&[
            ("cost_id", "5"),
            ("fuel_id", "1"),
            ("date", "2021-01-01"),
            ("driving_style", "normal"),
        ])];
        let set = OutputSet::from_records(&records).unwrap();
        assert_eq!(set.costs.len(), 1);
        assert_eq!(set.fuelings.len(), 1);
    }

    #[test]
    fn test_bad_driving_style_keeps_cost_row() {
        let records = vec![
            record(&[
                ("cost_id", "9"),
                ("fuel_id", "1"),
                ("date", "2021-02-01"),
                ("cost", "40"),
                ("driving_style", "wild"),
            ]),
            record(&[("cost_id", "3"), ("date", "2021-03-01"), ("cost", "5")]),
        ];
        let set = OutputSet::from_records(&records).unwrap();

        let prices: Vec<&str> = set.costs.iter().map(|c| c.total_price.as_str()).collect();
        assert_eq!(prices, vec!["5", "40"]);
        assert!(set.fuelings.is_empty());
        assert_eq!(set.dropped_fuelings, 1);
    }

    #[test]
    fn test_bad_driving_style_drops_only_that_fueling() {
        let fueling = |id, date, style| {
            record(&[
                ("fueling_id", id),
                ("fuel_id", "1"),
                ("date", date),
                ("driving_style", style),
            ])
        };
        let records = vec![
            fueling("1", "2021-01-01", "normal"),
            fueling("2", "2021-01-02", "wild"),
        ];
        let set = OutputSet::from_records(&records).unwrap();
        assert_eq!(set.fuelings.len(), 1);
        assert_eq!(set.dropped_fuelings, 1);
        assert_eq!(set.fuelings[0].date, "01.01.2021");
    }

    #[test]
    fn test_empty_input() {
        let set = OutputSet::from_records(&[]).unwrap();
        assert!(set.is_empty());
    }
}
