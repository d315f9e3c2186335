#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,  // line/row numbers as usize, we target 64-bit
    clippy::module_name_repetitions,   // Rust naming conventions
    clippy::missing_errors_doc,        // internal fns don't need error docs
    clippy::missing_panics_doc,        // same
    clippy::struct_excessive_bools,    // CLI struct derives clap
)]

pub(crate) mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod matcher;
pub mod search;
pub mod types;

use error::TrawlError;
use matcher::SearchPattern;
use search::SearchOptions;
use types::SearchResult;

/// The single public API. Everything flows through here:
/// walk → classify by extension → extract per file → collect in walk order.
pub fn run(pattern: &SearchPattern, options: &SearchOptions) -> Result<SearchResult, TrawlError> {
    search::search(pattern, options)
}
