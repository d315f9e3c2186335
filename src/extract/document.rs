use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::ContentExtractor;
use crate::error::TrawlError;
use crate::matcher::SearchPattern;
use crate::types::{Location, MatchRecord};

const BODY_PART: &str = "word/document.xml";

/// Whole-document search over a word-processor file. The body is flattened
/// to plain text and tested once, so a document yields at most one record.
pub struct WordProcessor;

impl ContentExtractor for WordProcessor {
    fn extract(
        &self,
        path: &Path,
        pattern: &SearchPattern,
    ) -> Result<Vec<MatchRecord>, TrawlError> {
        let body = body_text(path)?;
        Ok(pattern
            .find(&body)
            .map(|(_, fragment)| MatchRecord {
                path: path.to_path_buf(),
                location: Location::Document,
                text: fragment.to_string(),
            })
            .into_iter()
            .collect())
    }
}

/// Read the main document part out of the zip container and strip markup.
fn body_text(path: &Path) -> Result<String, TrawlError> {
    let file = File::open(path).map_err(|e| TrawlError::io(path, e))?;
    let mut archive =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| TrawlError::parse(path, e))?;
    let mut part = archive
        .by_name(BODY_PART)
        .map_err(|e| TrawlError::parse(path, e))?;

    let mut raw = Vec::new();
    part.read_to_end(&mut raw)
        .map_err(|e| TrawlError::io(path, e))?;
    Ok(markup_to_text(&String::from_utf8_lossy(&raw)))
}

/// Flatten WordprocessingML to text. Tags are dropped; paragraph ends and
/// breaks become newlines, tab runs become tabs, entities are decoded.
/// Tab-stop definitions inside `<w:tabs>` are not tabs.
pub(crate) fn markup_to_text(xml: &str) -> String {
    let bytes = xml.as_bytes();
    let mut out = String::with_capacity(xml.len() / 4);
    let mut in_tab_stops = false;
    let mut pos = 0;

    while let Some(offset) = memchr::memchr(b'<', &bytes[pos..]) {
        let open = pos + offset;
        decode_entities(&xml[pos..open], &mut out);

        let Some(len) = memchr::memchr(b'>', &bytes[open..]) else {
            // Unterminated tag: drop the rest.
            return out;
        };
        let tag = &xml[open + 1..open + len];
        pos = open + len + 1;

        let (closing, name) = match tag.strip_prefix('/') {
            Some(rest) => (true, tag_name(rest)),
            None => (false, tag_name(tag)),
        };
        match (closing, name) {
            (true, "w:p") | (false, "w:br" | "w:cr") => out.push('\n'),
            (false, "w:tab") if !in_tab_stops => out.push('\t'),
            (false, "w:tabs") => in_tab_stops = !tag.ends_with('/'),
            (true, "w:tabs") => in_tab_stops = false,
            _ => {}
        }
    }

    decode_entities(&xml[pos..], &mut out);
    out
}

fn tag_name(tag: &str) -> &str {
    tag.split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
}

/// Append `text` to `out`, decoding the five XML entities and numeric
/// character references. Unknown entities are kept verbatim.
fn decode_entities(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let c = match &rest[1..semi] {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                num => {
                    let code = if let Some(hex) = num.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()?
                    } else {
                        num.strip_prefix('#')?.parse().ok()?
                    };
                    char::from_u32(code)?
                }
            };
            Some((c, semi + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
}
