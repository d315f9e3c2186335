use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::TrawlError;
use crate::extract;
use crate::matcher::SearchPattern;
use crate::types::{CandidateFile, FileOutcome, SearchResult};

/// What to search and what to leave out.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub root: PathBuf,
    /// Directory names pruned wherever they appear below the root.
    pub skip_dirs: Vec<String>,
    /// Normalized extension tags never opened.
    pub skip_extensions: Vec<String>,
    /// Worker threads for extraction. `None` uses rayon's default.
    pub jobs: Option<usize>,
}

/// Build a sequential, deterministic directory walker over ALL files except
/// pruned directories. Does NOT respect .gitignore or hidden-file rules:
/// everything under the root is a candidate unless configured away.
pub(crate) fn walker(root: &Path, skip_dirs: &[String]) -> ignore::Walk {
    let skip: HashSet<String> = skip_dirs.iter().cloned().collect();
    WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            // The root itself is never pruned, whatever its name.
            if entry.depth() > 0 && entry.file_type().is_some_and(|ft| ft.is_dir()) {
                if let Some(name) = entry.file_name().to_str() {
                    return !skip.contains(name);
                }
            }
            true
        })
        .build()
}

/// Enumerate candidate files in walk order, dropping skipped extensions.
/// Unreadable directories are logged and passed over.
pub fn candidates(options: &SearchOptions) -> Vec<CandidateFile> {
    let skip_ext: HashSet<&str> = options.skip_extensions.iter().map(String::as_str).collect();

    walker(&options.root, &options.skip_dirs)
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "walk error");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| CandidateFile::new(entry.into_path()))
        .filter(|c| !skip_ext.contains(c.ext.as_str()))
        .collect()
}

/// Run one candidate through its strategy. This is the single place where
/// extraction failures are caught: they are logged and turned into a skip.
pub fn process(candidate: &CandidateFile, pattern: &SearchPattern) -> FileOutcome {
    match extract::extract(candidate, pattern) {
        Ok(records) => FileOutcome::Matched(records),
        Err(e) => {
            debug!(path = %candidate.path.display(), error = %e, "skipping file");
            FileOutcome::Skipped(e.to_string())
        }
    }
}

/// Walk `options.root` and search every candidate. Files are extracted in
/// parallel but results come back in walk order, one file at a time, so
/// records never lose their grouping or source.
pub fn search(pattern: &SearchPattern, options: &SearchOptions) -> Result<SearchResult, TrawlError> {
    fs::metadata(&options.root).map_err(|e| TrawlError::io(&options.root, e))?;

    let candidates = candidates(options);
    debug!(
        root = %options.root.display(),
        candidates = candidates.len(),
        "walk complete"
    );

    let run = || -> Vec<(CandidateFile, FileOutcome)> {
        candidates
            .into_par_iter()
            .map(|c| {
                let outcome = process(&c, pattern);
                (c, outcome)
            })
            .collect()
    };

    let files = match options.jobs {
        Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                warn!(error = %e, "thread pool unavailable, using global pool");
                run()
            }
        },
        None => run(),
    };

    Ok(SearchResult {
        scope: options.root.clone(),
        files,
    })
}
