pub mod document;
pub mod pdf;
pub mod tabular;
pub mod text;

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::classify::classify;
use crate::error::TrawlError;
use crate::matcher::SearchPattern;
use crate::types::{CandidateFile, FileKind, MatchRecord};

pub use document::WordProcessor;
pub use pdf::Pdf;
pub use tabular::{Delimited, Spreadsheet};
pub use text::PlainText;

/// One format-specific extraction strategy. Opens `path`, scans it with
/// `pattern`, and returns every match in document order. Any failure is
/// returned as an error and the caller discards the whole file.
pub trait ContentExtractor {
    fn extract(&self, path: &Path, pattern: &SearchPattern)
    -> Result<Vec<MatchRecord>, TrawlError>;
}

/// Strategy for a file kind. `PlainText` is the default branch of `classify`,
/// so every file gets a strategy.
pub fn extractor_for(kind: FileKind) -> Box<dyn ContentExtractor> {
    match kind {
        FileKind::PlainText => Box::new(PlainText),
        FileKind::Delimited(delimiter) => Box::new(Delimited { delimiter }),
        FileKind::Spreadsheet => Box::new(Spreadsheet),
        FileKind::Pdf => Box::new(Pdf),
        FileKind::WordProcessor => Box::new(WordProcessor),
    }
}

/// Select a strategy by the candidate's extension and run it.
/// Empty files short-circuit to zero records whatever their format.
pub fn extract(
    candidate: &CandidateFile,
    pattern: &SearchPattern,
) -> Result<Vec<MatchRecord>, TrawlError> {
    let path = candidate.path.as_path();
    let meta = fs::metadata(path).map_err(|e| TrawlError::io(path, e))?;
    if meta.len() == 0 {
        return Ok(Vec::new());
    }

    let kind = classify(&candidate.ext);
    debug!(path = %path.display(), ?kind, "extracting");

    let records = extractor_for(kind).extract(path, pattern)?;
    trace!(path = %path.display(), matches = records.len(), "scanned");
    Ok(records)
}
