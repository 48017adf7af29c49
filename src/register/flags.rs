use super::domain::{
    Cell, Frame, RiskCategory, ASSESSMENT_DATE, DAYS_SINCE_REVIEW, NEEDS_REVIEW, RISK_CATEGORY,
    RISK_SCORE,
};
use chrono::{DateTime, Duration, NaiveDate};
use tracing::warn;

/// Computes the derived review fields over the frame, in place.
///
/// Deterministic given (frame, today, thresholds): coerces Assessment Date
/// and Risk Score cells to their logical types (unparseable values become
/// null, per cell, without failing the row), then appends Days Since
/// Review, Needs Review, and Risk Category. `today` is day-granular; the
/// staleness cutoff is `today - days_threshold` days.
pub fn compute_flags(frame: &mut Frame, today: NaiveDate, days_threshold: i64, high_threshold: f64) {
    let review_cutoff = today - Duration::days(days_threshold);

    coerce_column(frame, ASSESSMENT_DATE, coerce_date);
    coerce_column(frame, RISK_SCORE, coerce_number);

    let mut days_since = Vec::with_capacity(frame.row_count());
    let mut needs_review = Vec::with_capacity(frame.row_count());
    let mut categories = Vec::with_capacity(frame.row_count());

    for row in 0..frame.row_count() {
        let assessed = frame.value(row, ASSESSMENT_DATE).as_date();
        let score = frame.value(row, RISK_SCORE).as_number();

        days_since.push(match assessed {
            Some(date) => Cell::Number((today - date).num_days() as f64),
            None => Cell::Empty,
        });
        needs_review.push(Cell::Bool(match assessed {
            Some(date) => date < review_cutoff,
            None => true,
        }));
        categories.push(Cell::Text(
            RiskCategory::bucket(score, high_threshold).label().to_string(),
        ));
    }

    append_or_replace(frame, DAYS_SINCE_REVIEW, days_since);
    append_or_replace(frame, NEEDS_REVIEW, needs_review);
    append_or_replace(frame, RISK_CATEGORY, categories);
}

/// Recomputing over already-flagged output must reproduce the same values,
/// so derived columns overwrite rather than duplicate.
fn append_or_replace(frame: &mut Frame, name: &str, cells: Vec<Cell>) {
    match frame.column_index(name) {
        Some(column) => {
            for (row, cell) in cells.into_iter().enumerate() {
                frame.set_cell(row, column, cell);
            }
        }
        None => frame.push_column(name, cells),
    }
}

fn coerce_column(frame: &mut Frame, name: &str, coerce: fn(&Cell) -> Cell) {
    let Some(column) = frame.column_index(name) else {
        return;
    };

    let mut failures = 0usize;
    for row in 0..frame.row_count() {
        let current = frame.cell(row, column);
        let coerced = coerce(current);
        if coerced.is_empty() && !current.is_empty() {
            failures += 1;
        }
        if &coerced != current {
            frame.set_cell(row, column, coerced);
        }
    }

    if failures > 0 {
        warn!(column = name, failures, "coerced unparseable values to null");
    }
}

fn coerce_number(cell: &Cell) -> Cell {
    match cell {
        Cell::Number(value) => Cell::Number(*value),
        Cell::Text(value) => match value.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Cell::Number(parsed),
            _ => Cell::Empty,
        },
        _ => Cell::Empty,
    }
}

fn coerce_date(cell: &Cell) -> Cell {
    match cell {
        Cell::Date(value) => Cell::Date(*value),
        Cell::Text(value) => match parse_date(value) {
            Some(date) => Cell::Date(date),
            None => Cell::Empty,
        },
        _ => Cell::Empty,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.naive_utc().date());
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    None
}
