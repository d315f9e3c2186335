use crate::types::FileKind;

/// Map a lower-cased extension tag to its extraction strategy.
/// No lookup table allocation: `match` compiles to a jump table.
/// Anything unrecognized is searched as text.
pub fn classify(ext: &str) -> FileKind {
    match ext {
        "csv" => FileKind::Delimited(b','),
        "tsv" => FileKind::Delimited(b'\t'),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => FileKind::Spreadsheet,
        "pdf" => FileKind::Pdf,
        "docx" | "doc" => FileKind::WordProcessor,
        _ => FileKind::PlainText,
    }
}

/// Normalize a user-supplied extension (`".PDF"`, `"pdf"`, `" Pdf "`) to the
/// tag form used by `classify` and the skip list.
pub fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
