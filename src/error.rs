use crate::register::{ChartError, LoadError, ReportError, ResolveError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Resolve(ResolveError),
    Load(LoadError),
    Report(ReportError),
    Chart(ChartError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Resolve(err) => write!(f, "input error: {}", err),
            AppError::Load(err) => write!(f, "load error: {}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
            AppError::Chart(err) => write!(f, "chart error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Resolve(err) => Some(err),
            AppError::Load(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Chart(err) => Some(err),
        }
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ResolveError> for AppError {
    fn from(value: ResolveError) -> Self {
        Self::Resolve(value)
    }
}

impl From<LoadError> for AppError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<ChartError> for AppError {
    fn from(value: ChartError) -> Self {
        Self::Chart(value)
    }
}
