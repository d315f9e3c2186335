use std::fs::File;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use super::ContentExtractor;
use crate::error::TrawlError;
use crate::matcher::SearchPattern;
use crate::types::{Location, MatchRecord};

/// Row-oriented search over delimited text. No header row: every physical
/// record is a row, numbered from 0. Ragged rows are accepted.
pub struct Delimited {
    pub delimiter: u8,
}

impl ContentExtractor for Delimited {
    fn extract(
        &self,
        path: &Path,
        pattern: &SearchPattern,
    ) -> Result<Vec<MatchRecord>, TrawlError> {
        let file = File::open(path).map_err(|e| TrawlError::io(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(file);

        let mut records = Vec::new();
        for (row, result) in reader.byte_records().enumerate() {
            let record = result.map_err(|e| TrawlError::parse(path, e))?;
            let line = join_cells(record.iter().map(String::from_utf8_lossy));
            if pattern.matches(&line) {
                records.push(MatchRecord {
                    path: path.to_path_buf(),
                    location: Location::Row { sheet: None, row },
                    text: line,
                });
            }
        }
        Ok(records)
    }
}

/// Workbook search across every worksheet, in workbook order.
pub struct Spreadsheet;

impl ContentExtractor for Spreadsheet {
    fn extract(
        &self,
        path: &Path,
        pattern: &SearchPattern,
    ) -> Result<Vec<MatchRecord>, TrawlError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| TrawlError::parse(path, e))?;

        let mut records = Vec::new();
        for sheet in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&sheet)
                .map_err(|e| TrawlError::parse(path, e))?;
            records.extend(scan_range(path, &sheet, &range, pattern));
        }
        Ok(records)
    }
}

/// Apply the row policy to one worksheet. Row indices are absolute sheet
/// rows, so leading blank rows that calamine trims still count.
pub(crate) fn scan_range(
    path: &Path,
    sheet: &str,
    range: &Range<Data>,
    pattern: &SearchPattern,
) -> Vec<MatchRecord> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);

    range
        .rows()
        .enumerate()
        .filter_map(|(i, cells)| {
            let line = join_cells(cells.iter().map(cell_text));
            pattern.matches(&line).then(|| MatchRecord {
                path: path.to_path_buf(),
                location: Location::Row {
                    sheet: Some(sheet.to_string()),
                    row: first_row + i,
                },
                text: line,
            })
        })
        .collect()
}

/// String form of one workbook cell. Date cells render as calendar
/// timestamps; calamine's `Display` would print the Excel serial number.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map_or_else(
            || cell.to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        _ => cell.to_string(),
    }
}

/// Join the string form of each non-blank cell with single spaces.
pub(crate) fn join_cells<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for cell in cells {
        let cell = cell.as_ref().trim();
        if cell.is_empty() {
            continue;
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(cell);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use std::fs;

    fn pattern(p: &str) -> SearchPattern {
        SearchPattern::new(p, false).unwrap()
    }

    #[test]
    fn join_skips_blank_cells() {
        assert_eq!(join_cells(["a", "", "  ", "b c", "1.5"]), "a b c 1.5");
        assert_eq!(join_cells(Vec::<String>::new()), "");
    }

    #[test]
    fn csv_reports_matching_row_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "name,city\nann,paris\nbob,\"Hello, world\"\ncy,rome\n").unwrap();

        let records = Delimited { delimiter: b',' }
            .extract(&path, &pattern("hello"))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].location,
            Location::Row {
                sheet: None,
                row: 2
            }
        );
        assert_eq!(records[0].text, "bob Hello, world");
    }

    #[test]
    fn csv_tolerates_ragged_rows_and_bad_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, b"a,b,c\nx\n\xffkey,y\n").unwrap();

        let records = Delimited { delimiter: b',' }
            .extract(&path, &pattern("key"))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].location,
            Location::Row {
                sheet: None,
                row: 2
            }
        );
    }

    #[test]
    fn tsv_splits_on_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.tsv");
        fs::write(&path, "a\tb\nfoo\tbar\n").unwrap();

        let records = Delimited { delimiter: b'\t' }
            .extract(&path, &pattern("foo bar"))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "foo bar");
    }

    #[test]
    fn range_rows_are_joined_and_numbered() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("id".into()));
        range.set_value((0, 1), Data::String("label".into()));
        range.set_value((1, 0), Data::Int(7));
        range.set_value((1, 1), Data::String("apple".into()));
        range.set_value((2, 0), Data::Float(2.5));
        range.set_value((2, 1), Data::String("Hello there".into()));
        range.set_value((2, 2), Data::Bool(true));

        let records = scan_range(Path::new("w.xlsx"), "Sheet1", &range, &pattern("hello"));
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].location,
            Location::Row {
                sheet: Some("Sheet1".into()),
                row: 2
            }
        );
        assert_eq!(records[0].text, "2.5 Hello there true");
    }

    #[test]
    fn numeric_cells_are_searchable() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("total".into()));
        range.set_value((1, 0), Data::Int(4096));

        let records = scan_range(Path::new("w.xlsx"), "S", &range, &pattern("409"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "4096");
    }

    #[test]
    fn date_cells_render_as_calendar_dates() {
        let mut range: Range<Data> = Range::new((0, 0), (0, 1));
        range.set_value((0, 0), Data::String("due".into()));
        range.set_value(
            (0, 1),
            Data::DateTime(ExcelDateTime::new(45366.0, ExcelDateTimeType::DateTime, false)),
        );

        let records = scan_range(Path::new("w.xlsx"), "S", &range, &pattern("2024-03"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "due 2024-03-15 00:00:00");
    }

    #[test]
    fn serial_number_is_not_searched_for_dates() {
        let cell = Data::DateTime(ExcelDateTime::new(45366.5, ExcelDateTimeType::DateTime, false));
        assert_eq!(cell_text(&cell), "2024-03-15 12:00:00");
        assert_eq!(cell_text(&Data::Float(45366.5)), "45366.5");
    }

    #[test]
    fn range_offset_keeps_absolute_rows() {
        let mut range: Range<Data> = Range::new((3, 0), (4, 0));
        range.set_value((3, 0), Data::String("skip".into()));
        range.set_value((4, 0), Data::String("target".into()));

        let records = scan_range(Path::new("w.xlsx"), "S", &range, &pattern("target"));
        assert_eq!(
            records[0].location,
            Location::Row {
                sheet: Some("S".into()),
                row: 4
            }
        );
    }
}
