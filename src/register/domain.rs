use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coarse classification of a vendor's numeric risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::High, Self::Medium, Self::Low, Self::Unknown]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }

    /// Buckets a score against the configured high cutoff. Boundaries are
    /// inclusive on the lower edge: a score exactly at `high_threshold` is
    /// High, exactly 50 is Medium.
    pub fn bucket(score: Option<f64>, high_threshold: f64) -> Self {
        match score {
            None => Self::Unknown,
            Some(value) if value >= high_threshold => Self::High,
            Some(value) if value >= 50.0 => Self::Medium,
            Some(_) => Self::Low,
        }
    }
}

/// One value in the register. Sources are permissive, so a cell carries
/// whatever the parser could make of it; coercion to the logical type
/// happens in the flag engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Text rendering used for CSV output and console summaries. Whole
    /// numbers drop the trailing fraction so scores round-trip as entered.
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Number(value) if value.fract() == 0.0 => format!("{}", *value as i64),
            Cell::Number(value) => format!("{value}"),
            Cell::Bool(value) => value.to_string(),
            Cell::Date(value) => value.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Logical columns every register must expose after loading.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Vendor Name",
    "Service",
    "Risk Score",
    "Assessment Date",
    "Remediation Status",
];

pub const VENDOR_NAME: &str = REQUIRED_COLUMNS[0];
pub const RISK_SCORE: &str = REQUIRED_COLUMNS[2];
pub const ASSESSMENT_DATE: &str = REQUIRED_COLUMNS[3];
pub const REMEDIATION_STATUS: &str = REQUIRED_COLUMNS[4];

pub const DAYS_SINCE_REVIEW: &str = "Days Since Review";
pub const NEEDS_REVIEW: &str = "Needs Review";
pub const RISK_CATEGORY: &str = "Risk Category";

/// Ordered columns by ordered rows. Row order is significant and preserved
/// end-to-end; extra source columns ride along untouched.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Appends a row, padding or truncating to the current column count.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Empty);
        self.rows.push(cells);
    }

    /// Appends a column of per-row values; the column must not already
    /// exist and `cells` is padded with nulls if short.
    pub fn push_column(&mut self, name: &str, mut cells: Vec<Cell>) {
        cells.resize(self.rows.len(), Cell::Empty);
        self.columns.push(name.to_string());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&Cell::Empty)
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: Cell) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *slot = value;
        }
    }

    /// Typed lookup by column name; missing column reads as null.
    pub fn value(&self, row: usize, column_name: &str) -> &Cell {
        match self.column_index(column_name) {
            Some(column) => self.cell(row, column),
            None => &Cell::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries_are_inclusive() {
        assert_eq!(RiskCategory::bucket(Some(80.0), 80.0), RiskCategory::High);
        assert_eq!(RiskCategory::bucket(Some(79.9), 80.0), RiskCategory::Medium);
        assert_eq!(RiskCategory::bucket(Some(50.0), 80.0), RiskCategory::Medium);
        assert_eq!(RiskCategory::bucket(Some(49.9), 80.0), RiskCategory::Low);
        assert_eq!(RiskCategory::bucket(None, 80.0), RiskCategory::Unknown);
    }

    #[test]
    fn bucket_is_total_over_any_threshold() {
        for threshold in [0.0, 50.0, 80.0, 100.0] {
            for score in [None, Some(-5.0), Some(0.0), Some(50.0), Some(100.0)] {
                let category = RiskCategory::bucket(score, threshold);
                assert!(RiskCategory::ordered().contains(&category));
            }
        }
    }

    #[test]
    fn render_keeps_whole_scores_integral() {
        assert_eq!(Cell::Number(72.0).render(), "72");
        assert_eq!(Cell::Number(79.9).render(), "79.9");
        assert_eq!(Cell::Empty.render(), "");
        assert_eq!(
            Cell::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).render(),
            "2024-05-01"
        );
    }

    #[test]
    fn push_column_pads_short_columns_with_nulls() {
        let mut frame = Frame::new(vec!["Vendor Name".into()]);
        frame.push_row(vec![Cell::Text("Acme".into())]);
        frame.push_row(vec![Cell::Text("Globex".into())]);
        frame.push_column("Needs Review", vec![Cell::Bool(true)]);

        assert_eq!(frame.value(0, "Needs Review"), &Cell::Bool(true));
        assert_eq!(frame.value(1, "Needs Review"), &Cell::Empty);
        assert_eq!(frame.value(1, "No Such Column"), &Cell::Empty);
    }
}
