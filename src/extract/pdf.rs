use std::any::Any;
use std::cell::Cell;
use std::fs::File;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Once;

use memmap2::Mmap;
use tracing::debug;

use super::ContentExtractor;
use crate::error::TrawlError;
use crate::matcher::SearchPattern;
use crate::types::{Location, MatchRecord};

/// Page-level search over the text layer of a PDF. Each page's text is
/// tested as one string; the record carries the first matched fragment.
pub struct Pdf;

impl ContentExtractor for Pdf {
    fn extract(
        &self,
        path: &Path,
        pattern: &SearchPattern,
    ) -> Result<Vec<MatchRecord>, TrawlError> {
        let pages = page_texts(path)?;

        let records = pages
            .iter()
            .enumerate()
            .filter_map(|(page, text)| {
                let (_, fragment) = pattern.find(text)?;
                Some(MatchRecord {
                    path: path.to_path_buf(),
                    location: Location::Page { page },
                    text: fragment.to_string(),
                })
            })
            .collect();
        Ok(records)
    }
}

/// Extract the text of every page, in page order.
/// The parser panics on some malformed inputs; that is reported as a parse
/// error for this file only.
fn page_texts(path: &Path) -> Result<Vec<String>, TrawlError> {
    let file = File::open(path).map_err(|e| TrawlError::io(path, e))?;
    // Caller guarantees a non-empty file; mmap of 0 bytes fails on some platforms.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| TrawlError::io(path, e))?;
    let buf = &mmap[..];

    quietly(|| pdf_extract::extract_text_from_mem_by_pages(buf))
        .map_err(|msg| {
            debug!(path = %path.display(), panic = %msg, "pdf parser panicked");
            TrawlError::parse(path, format!("pdf parser panicked: {msg}"))
        })?
        .map_err(|e| TrawlError::parse(path, e))
}

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Run `f`, turning a panic into `Err(message)`. The default hook's stderr
/// report is suppressed for panics raised inside `f` on this thread; panics
/// anywhere else still reach the previous hook.
fn quietly<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCED.with(Cell::get) {
                previous(info);
            }
        }));
    });

    SILENCED.with(|s| s.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    SILENCED.with(|s| s.set(false));
    result.map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
