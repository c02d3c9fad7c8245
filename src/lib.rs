//! Pounce core - fuzzy window matching and ranking for the Pounce switcher.
//!
//! Given the user's query and the current window list (title + owning process
//! name per window), this library decides which windows match, how well they
//! match, and which substrings to highlight. Four independent matching
//! strategies are combined into one ranked result set; a `group.text` query
//! prefix scopes the search to a single process group.
//!
//! # Architecture
//! - `interface`: shared value types (StringPart, MatchResult, FilterResult)
//! - `matching`: the four matcher strategies and the scan-plan cache
//! - `query`: raw query -> (text filter, optional group filter)
//! - `filter`: per-candidate scoring, inclusion, stable ranking
//! - `highlight`: matched segmentation -> bold-emphasis markup
//!
//! The core is a pure computation: no I/O, no persisted state, total over
//! every input combination. Window enumeration, hotkeys, and rendering live
//! in the calling application.

mod filter;
mod highlight;
mod interface;
mod matching;
mod query;

pub use filter::{filter_candidates, filter_query, PARALLEL_FILTER_THRESHOLD};
pub use highlight::highlight;
pub use interface::{Candidate, CandidateItem, FilterResult, MatchResult, StringPart};
pub use matching::MatchStrategy;
pub use query::Query;
