use std::path::Path;

use grep_searcher::SearcherBuilder;
use grep_searcher::sinks::Lossy;

use super::ContentExtractor;
use crate::error::TrawlError;
use crate::matcher::SearchPattern;
use crate::types::{Location, MatchRecord};

/// Line-by-line search using ripgrep's searcher. Invalid UTF-8 is replaced,
/// never raised; binary content is searched like any other bytes.
pub struct PlainText;

impl ContentExtractor for PlainText {
    fn extract(
        &self,
        path: &Path,
        pattern: &SearchPattern,
    ) -> Result<Vec<MatchRecord>, TrawlError> {
        let mut records = Vec::new();
        let mut searcher = SearcherBuilder::new().line_number(true).build();

        searcher
            .search_path(
                pattern.matcher(),
                path,
                Lossy(|line_num, line| {
                    records.push(MatchRecord {
                        path: path.to_path_buf(),
                        // Searcher numbers lines from 1
                        location: Location::Line {
                            line: line_num.saturating_sub(1) as usize,
                        },
                        text: strip_terminator(line).to_string(),
                    });
                    Ok(true)
                }),
            )
            .map_err(|e| TrawlError::io(path, e))?;

        Ok(records)
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
