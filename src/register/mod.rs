//! Vendor risk register pipeline: resolve a source, load it into a frame,
//! derive review flags, and emit CSV extracts, a highlighted workbook, and
//! summary charts.

pub mod charts;
pub mod domain;
pub mod flags;
pub mod loader;
pub mod report;
pub mod resolve;

pub use charts::{render_charts, ChartError};
pub use domain::{Cell, Frame, RiskCategory};
pub use flags::compute_flags;
pub use loader::{ensure_columns, load, LoadError};
pub use report::{write_reports, ReportError, ReportPaths};
pub use resolve::{resolve_source, ResolveError, ResolvedSource, SourceFormat};
