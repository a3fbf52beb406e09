use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single cell of a parsed CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric view of the value. Text is trimmed and parsed; anything
    /// that does not yield a finite number is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Null => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Key form of the value, used for grouping. Integral numbers drop
    /// their fraction so `2020.0` and `"2020"` land in the same group.
    pub fn as_key(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                Some(format!("{}", *n as i64))
            }
            FieldValue::Number(n) if n.is_finite() => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

/// One parsed CSV row keyed by canonical field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub data: HashMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new(data: HashMap<String, FieldValue>) -> Self {
        Self { data }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.data.get(field)
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearAccumulator {
    pub total_jobs: u64,
    pub total_salary: f64,
}

impl YearAccumulator {
    pub fn push(&mut self, salary: f64) {
        self.total_jobs += 1;
        self.total_salary += salary;
    }

    /// Only called on accumulators that received at least one salary.
    pub fn average(&self) -> f64 {
        self.total_salary / self.total_jobs as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub year: String,
    pub total_jobs: u64,
    pub average_salary: f64,
}

/// Records that contributed to no group during an aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipStats {
    pub missing_year: u64,
    pub invalid_salary: u64,
}

impl SkipStats {
    pub fn total(&self) -> u64 {
        self.missing_year + self.invalid_salary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub rows: Vec<SummaryRow>,
    pub skipped: SkipStats,
}

impl Aggregation {
    /// Orders rows by year, numerically when both years parse as integers.
    pub fn sort_by_year(&mut self) {
        self.rows.sort_by(|a, b| {
            match (a.year.parse::<i64>(), b.year.parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.year.cmp(&b.year),
            }
        });
    }

    pub fn total_jobs(&self) -> u64 {
        self.rows.iter().map(|row| row.total_jobs).sum()
    }
}
