use std::path::{Path, PathBuf};

use serde::Serialize;

/// Content format as detected by extension. Determines extraction strategy.
/// Adding a format means adding an arm here and the compiler tells you
/// everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Default branch: anything not listed below, including no extension.
    PlainText,
    /// Delimited text; carries the field separator byte.
    Delimited(u8),
    Spreadsheet,
    Pdf,
    WordProcessor,
}

/// A file selected by the walker, with its lower-cased extension tag.
/// The tag is empty when the file name has no extension.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub ext: String,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ext = extension_tag(&path);
        Self { path, ext }
    }
}

/// Lower-cased extension of `path`, or `""` if it has none.
pub fn extension_tag(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Where in a file a match was found. Indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    Line {
        line: usize,
    },
    Row {
        #[serde(skip_serializing_if = "Option::is_none")]
        sheet: Option<String>,
        row: usize,
    },
    Page {
        page: usize,
    },
    /// The whole document matched; no finer position is reported.
    Document,
}

/// One reported occurrence: source, location, and the matching line/row or
/// matched fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub path: PathBuf,
    pub location: Location,
    pub text: String,
}

/// What happened to one candidate file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Extraction completed. Empty when nothing matched.
    Matched(Vec<MatchRecord>),
    /// Extraction failed; no records were kept for this file.
    Skipped(String),
}

/// Per-file results in walk order, plus counters for the summary line.
#[derive(Debug)]
pub struct SearchResult {
    pub scope: PathBuf,
    pub files: Vec<(CandidateFile, FileOutcome)>,
}

impl SearchResult {
    /// All records in walk order, file by file.
    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.files.iter().flat_map(|(_, outcome)| match outcome {
            FileOutcome::Matched(records) => records.as_slice(),
            FileOutcome::Skipped(_) => &[][..],
        })
    }

    #[must_use]
    pub fn total_matches(&self) -> usize {
        self.records().count()
    }

    #[must_use]
    pub fn matched_files(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Matched(r) if !r.is_empty()))
            .count()
    }

    #[must_use]
    pub fn skipped_files(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Skipped(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_tag_is_lowercased() {
        assert_eq!(CandidateFile::new("/a/Report.PDF").ext, "pdf");
        assert_eq!(CandidateFile::new("/a/notes.tar.gz").ext, "gz");
        assert_eq!(CandidateFile::new("/a/Makefile").ext, "");
        assert_eq!(CandidateFile::new("/a/.bashrc").ext, "");
    }

    #[test]
    fn location_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Location::Row {
            sheet: None,
            row: 4,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"row","row":4}"#);
        let json = serde_json::to_string(&Location::Document).unwrap();
        assert_eq!(json, r#"{"kind":"document"}"#);
    }

    #[test]
    fn summary_counts() {
        let rec = |line| MatchRecord {
            path: PathBuf::from("a.txt"),
            location: Location::Line { line },
            text: "x".into(),
        };
        let result = SearchResult {
            scope: PathBuf::from("."),
            files: vec![
                (
                    CandidateFile::new("a.txt"),
                    FileOutcome::Matched(vec![rec(0), rec(3)]),
                ),
                (CandidateFile::new("b.txt"), FileOutcome::Matched(vec![])),
                (
                    CandidateFile::new("c.pdf"),
                    FileOutcome::Skipped("bad xref".into()),
                ),
            ],
        };
        assert_eq!(result.total_matches(), 2);
        assert_eq!(result.matched_files(), 1);
        assert_eq!(result.skipped_files(), 1);
    }
}
