use super::domain::{Cell, Frame, REQUIRED_COLUMNS};
use super::resolve::{ResolvedSource, SourceFormat};
use calamine::{open_workbook_auto, Data, Reader};
use std::fs::File;
use std::io::Read;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read register source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid delimited register data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid spreadsheet register data: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

/// Parses the resolved source into a frame. Header names are trimmed of
/// surrounding whitespace in both parser families.
pub fn load(source: &ResolvedSource) -> Result<Frame, LoadError> {
    info!(path = %source.path.display(), "loading register");
    match source.format {
        SourceFormat::Spreadsheet => load_spreadsheet(source),
        SourceFormat::DelimitedText => {
            let file = File::open(&source.path)?;
            load_delimited(file)
        }
    }
}

fn load_spreadsheet(source: &ResolvedSource) -> Result<Frame, LoadError> {
    let mut workbook = open_workbook_auto(&source.path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Frame::default()),
    };

    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Ok(Frame::default()),
    };

    let mut frame = Frame::new(columns);
    for row in rows {
        frame.push_row(row.iter().map(spreadsheet_cell).collect());
    }

    Ok(frame)
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(value) if value.trim().is_empty() => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) => Cell::Date(datetime.date()),
            None => Cell::Empty,
        },
        Data::DateTimeIso(value) => Cell::Text(value.clone()),
        Data::DurationIso(value) => Cell::Text(value.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// Comma-delimited parse with a header row. Split out over `Read` so tests
/// can feed fixtures through a cursor.
pub(crate) fn load_delimited<R: Read>(reader: R) -> Result<Frame, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut frame = Frame::new(columns);
    for record in csv_reader.records() {
        let record = record?;
        frame.push_row(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(frame)
}

/// Schema completion: any required logical column missing from the source
/// is appended as an all-null column. Warns per column, never fails.
pub fn ensure_columns(frame: &mut Frame) {
    for name in REQUIRED_COLUMNS {
        if frame.column_index(name).is_none() {
            warn!(column = name, "column missing from source, creating empty column");
            frame.push_column(name, vec![Cell::Empty; frame.row_count()]);
        }
    }
}
