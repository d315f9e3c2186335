use std::path::Path;

use crate::matcher::SearchPattern;
use crate::types::{Location, MatchRecord, SearchResult};

/// Build the run header:
/// `# Search: "pattern" in /abs/root (case-insensitive)`
pub fn search_header(pattern: &SearchPattern, scope: &Path) -> String {
    let case = if pattern.is_case_sensitive() {
        "case-sensitive"
    } else {
        "case-insensitive"
    };
    format!(
        "# Search: \"{}\" in {} ({case})",
        pattern.as_str(),
        scope.display()
    )
}

/// One human-readable line per record. Whole-document matches name the
/// pattern rather than the fragment.
pub fn record_line(record: &MatchRecord, pattern: &str) -> String {
    let path = record.path.display();
    match &record.location {
        Location::Line { line } => format!("{path} : Line {line} : {}", record.text),
        Location::Row {
            sheet: Some(sheet),
            row,
        } => format!("{path} [{sheet}] : Line {row} : {}", record.text),
        Location::Row { sheet: None, row } => {
            format!("{path} : Line {row} : {}", record.text)
        }
        Location::Page { page } => format!("{path} : Found on Page {page}"),
        Location::Document => format!("{path} Found In Document File : {pattern}"),
    }
}

/// One compact JSON object per record, for piping into other tools.
pub fn record_json(record: &MatchRecord) -> String {
    serde_json::to_string(record).expect("MatchRecord is always serializable")
}

/// Closing summary: `N matches in M files, K skipped`.
pub fn summary(result: &SearchResult) -> String {
    let matches = result.total_matches();
    let files = result.matched_files();
    let skipped = result.skipped_files();
    let noun = |n: usize, one: &'static str, many: &'static str| if n == 1 { one } else { many };
    format!(
        "{matches} {} in {files} {}, {skipped} skipped",
        noun(matches, "match", "matches"),
        noun(files, "file", "files"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CandidateFile, FileOutcome};
    use std::path::PathBuf;

    fn record(location: Location, text: &str) -> MatchRecord {
        MatchRecord {
            path: PathBuf::from("/d/f"),
            location,
            text: text.into(),
        }
    }

    #[test]
    fn header_reports_case_mode() {
        let p = SearchPattern::new("hello", false).unwrap();
        let header = search_header(&p, Path::new("/tmp/scope"));
        assert_eq!(
            header,
            "# Search: \"hello\" in /tmp/scope (case-insensitive)"
        );
    }

    #[test]
    fn line_formats_per_location() {
        assert_eq!(
            record_line(&record(Location::Line { line: 3 }, "hi there"), "hi"),
            "/d/f : Line 3 : hi there"
        );
        assert_eq!(
            record_line(
                &record(
                    Location::Row {
                        sheet: None,
                        row: 1
                    },
                    "a b"
                ),
                "a"
            ),
            "/d/f : Line 1 : a b"
        );
        assert_eq!(
            record_line(
                &record(
                    Location::Row {
                        sheet: Some("Q1".into()),
                        row: 0
                    },
                    "a b"
                ),
                "a"
            ),
            "/d/f [Q1] : Line 0 : a b"
        );
        assert_eq!(
            record_line(&record(Location::Page { page: 3 }, "hi"), "hi"),
            "/d/f : Found on Page 3"
        );
        assert_eq!(
            record_line(&record(Location::Document, "HI"), "hi"),
            "/d/f Found In Document File : hi"
        );
    }

    #[test]
    fn json_carries_all_fields() {
        let json = record_json(&record(Location::Page { page: 2 }, "x"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["path"], "/d/f");
        assert_eq!(value["location"]["kind"], "page");
        assert_eq!(value["location"]["page"], 2);
        assert_eq!(value["text"], "x");
    }

    #[test]
    fn summary_pluralizes() {
        let result = SearchResult {
            scope: PathBuf::from("."),
            files: vec![(
                CandidateFile::new("a.txt"),
                FileOutcome::Matched(vec![record(Location::Line { line: 0 }, "x")]),
            )],
        };
        assert_eq!(summary(&result), "1 match in 1 file, 0 skipped");
    }
}
