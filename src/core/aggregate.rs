use crate::domain::model::{Aggregation, RawRecord, SkipStats, SummaryRow, YearAccumulator};
use std::collections::HashMap;

pub const DEFAULT_YEAR_FIELD: &str = "work_year";
pub const DEFAULT_SALARY_FIELD: &str = "salary_in_usd";

/// Canonical keys the aggregator reads from each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFields {
    pub year: String,
    pub salary: String,
}

impl Default for AggregateFields {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR_FIELD.to_string(),
            salary: DEFAULT_SALARY_FIELD.to_string(),
        }
    }
}

/// Group records by year in a single pass.
///
/// Records without a year, or whose salary does not coerce to a finite
/// number, are left out of every group and only counted in
/// [`SkipStats`]. Rows come back in the order each year was first seen.
pub fn aggregate(records: &[RawRecord], fields: &AggregateFields) -> Aggregation {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, YearAccumulator)> = Vec::new();
    let mut skipped = SkipStats::default();

    for record in records {
        let Some(year) = record.get(&fields.year).and_then(|v| v.as_key()) else {
            skipped.missing_year += 1;
            continue;
        };
        let Some(salary) = record.get(&fields.salary).and_then(|v| v.as_f64()) else {
            skipped.invalid_salary += 1;
            continue;
        };

        let slot = match index.get(&year) {
            Some(&slot) => slot,
            None => {
                groups.push((year.clone(), YearAccumulator::default()));
                index.insert(year, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].1.push(salary);
    }

    if skipped.total() > 0 {
        tracing::debug!(
            "Skipped {} records ({} without year, {} with non-numeric salary)",
            skipped.total(),
            skipped.missing_year,
            skipped.invalid_salary
        );
    }

    let rows = groups
        .into_iter()
        .map(|(year, acc)| SummaryRow {
            year,
            total_jobs: acc.total_jobs,
            average_salary: acc.average(),
        })
        .collect();

    Aggregation { rows, skipped }
}
