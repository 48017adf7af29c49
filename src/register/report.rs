use super::domain::{Cell, Frame, NEEDS_REVIEW, RISK_SCORE};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SHEET_NAME: &str = "Vendor Register";
pub const DEFAULT_HIGHLIGHT_FILL: &str = "FFF2CC";

pub const HIGH_RISK_CSV: &str = "high_risk.csv";
pub const NEEDS_REVIEW_CSV: &str = "needs_review.csv";
pub const FLAGGED_WORKBOOK: &str = "vendor_register_flagged.xlsx";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV extract: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to process workbook: {0}")]
    Workbook(String),
}

#[derive(Debug)]
pub struct ReportPaths {
    pub high_risk: PathBuf,
    pub needs_review: PathBuf,
    pub workbook: PathBuf,
}

/// Emits the three report artifacts from the flagged frame: the high-risk
/// and needs-review CSV extracts (original row order), and the full
/// workbook followed by the highlighting pass.
pub fn write_reports(
    frame: &Frame,
    outdir: &Path,
    high_threshold: f64,
) -> Result<ReportPaths, ReportError> {
    let paths = ReportPaths {
        high_risk: outdir.join(HIGH_RISK_CSV),
        needs_review: outdir.join(NEEDS_REVIEW_CSV),
        workbook: outdir.join(FLAGGED_WORKBOOK),
    };

    write_filtered_csv(frame, &paths.high_risk, |frame, row| {
        row_is_high_risk(frame, row, high_threshold)
    })?;
    write_filtered_csv(frame, &paths.needs_review, row_needs_review)?;

    write_workbook(frame, &paths.workbook)?;
    let highlighted = highlight_flagged_rows(&paths.workbook, DEFAULT_HIGHLIGHT_FILL)?;

    info!(
        high_risk = %paths.high_risk.display(),
        needs_review = %paths.needs_review.display(),
        workbook = %paths.workbook.display(),
        highlighted,
        "report artifacts written"
    );

    Ok(paths)
}

pub fn row_is_high_risk(frame: &Frame, row: usize, high_threshold: f64) -> bool {
    frame
        .value(row, RISK_SCORE)
        .as_number()
        .is_some_and(|score| score >= high_threshold)
}

pub fn row_needs_review(frame: &Frame, row: usize) -> bool {
    frame.value(row, NEEDS_REVIEW).as_bool().unwrap_or(false)
}

fn write_filtered_csv<F>(frame: &Frame, path: &Path, keep: F) -> Result<(), ReportError>
where
    F: Fn(&Frame, usize) -> bool,
{
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(frame.columns())?;

    for row in 0..frame.row_count() {
        if !keep(frame, row) {
            continue;
        }
        let rendered: Vec<String> = (0..frame.columns().len())
            .map(|column| frame.cell(row, column).render())
            .collect();
        writer.write_record(&rendered)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the full frame under the named sheet. Dates go out as ISO text
/// so the flag engine can re-coerce them from a round-tripped workbook.
fn write_workbook(frame: &Frame, path: &Path) -> Result<(), ReportError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(SHEET_NAME)
        .map_err(|err| ReportError::Workbook(err.to_string()))?;

    for (index, column) in frame.columns().iter().enumerate() {
        sheet
            .get_cell_mut((index as u32 + 1, 1))
            .set_value_string(column.as_str());
    }

    for row in 0..frame.row_count() {
        let sheet_row = row as u32 + 2;
        for column in 0..frame.columns().len() {
            let coordinate = (column as u32 + 1, sheet_row);
            match frame.cell(row, column) {
                Cell::Empty => {}
                Cell::Number(value) => {
                    sheet.get_cell_mut(coordinate).set_value_number(*value);
                }
                Cell::Bool(value) => {
                    sheet.get_cell_mut(coordinate).set_value_bool(*value);
                }
                Cell::Text(value) => {
                    sheet.get_cell_mut(coordinate).set_value_string(value.as_str());
                }
                Cell::Date(value) => {
                    sheet
                        .get_cell_mut(coordinate)
                        .set_value_string(value.format("%Y-%m-%d").to_string());
                }
            }
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|err| ReportError::Workbook(err.to_string()))
}

/// Tolerant truthy reading of a highlight-flag cell: boolean true, the
/// case-insensitive strings "true"/"1"/"yes", or the number 1 all count
/// as flagged. Everything else does not.
pub(crate) fn flag_cell_set(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    if matches!(value.as_str(), "true" | "1" | "yes") {
        return true;
    }
    value.parse::<f64>().map(|number| number == 1.0).unwrap_or(false)
}

/// Re-opens the written workbook and applies a solid fill across every
/// column of each row whose Needs Review cell reads truthy. A missing
/// sheet or flag column skips highlighting without failing; the workbook
/// stays on disk as written. Returns the number of rows highlighted.
pub fn highlight_flagged_rows(path: &Path, fill: &str) -> Result<usize, ReportError> {
    let mut book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|err| ReportError::Workbook(err.to_string()))?;

    let Some(sheet) = book.get_sheet_by_name_mut(SHEET_NAME) else {
        warn!(sheet = SHEET_NAME, "sheet not found, skipping highlighting");
        return Ok(0);
    };

    let max_column = sheet.get_highest_column();
    let max_row = sheet.get_highest_row();
    let flag_column = (1..=max_column)
        .find(|column| sheet.get_value((*column, 1)).trim() == NEEDS_REVIEW);
    let Some(flag_column) = flag_column else {
        warn!(
            column = NEEDS_REVIEW,
            "flag column not found in workbook, skipping highlighting"
        );
        return Ok(0);
    };

    let mut highlighted = 0usize;
    for row in 2..=max_row {
        if !flag_cell_set(&sheet.get_value((flag_column, row))) {
            continue;
        }
        for column in 1..=max_column {
            sheet.get_style_mut((column, row)).set_background_color(fill);
        }
        highlighted += 1;
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|err| ReportError::Workbook(err.to_string()))?;

    Ok(highlighted)
}
