use std::path::{Path, PathBuf};

/// Parser family selected for a resolved source, keyed off its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    DelimitedText,
}

impl SourceFormat {
    fn for_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("xls") | Some("xlsx") => Self::Spreadsheet,
            _ => Self::DelimitedText,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub path: PathBuf,
    pub format: SourceFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no input file found; looked for: {}", searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    InputNotFound { searched: Vec<PathBuf> },
}

/// Ordered fallback over candidate paths: the first that exists wins.
/// Purely a resolution step, parsing happens elsewhere.
pub fn resolve_source(candidates: &[PathBuf]) -> Result<ResolvedSource, ResolveError> {
    for candidate in candidates {
        if candidate.exists() {
            return Ok(ResolvedSource {
                format: SourceFormat::for_path(candidate),
                path: candidate.clone(),
            });
        }
    }

    Err(ResolveError::InputNotFound {
        searched: candidates.to_vec(),
    })
}
