//! Scrandle Leaderboard
//!
//! Turns a spreadsheet of Scrandle results into a ranked, filtered leaderboard
//! and renders it as a styled HTML page.
//!
//! This library provides:
//! - `loader`: Reads CSV/TSV and Excel/ODS sheets into typed entries
//! - `recency`: Normalizes the "Most Recent" column into inactive days
//! - `cache`: Explicit load cache keyed on source file identity
//! - `pipeline`: Filter, stable sort and rank decoration
//! - `ranking`: Rank markers and score tiers
//! - `render`: HTML page and plain-text table output
//! - `export`: CSV and XLSX export of a rendered leaderboard
//!
//! Binaries:
//! - `leaderboard`: Render, show, export or watch a leaderboard file

pub mod cache;
pub mod entry;
pub mod error;
pub mod export;
pub mod loader;
pub mod pipeline;
pub mod ranking;
pub mod recency;
pub mod render;

pub use cache::LoadCache;
pub use entry::LeaderboardEntry;
pub use error::LoadError;
pub use pipeline::{build_leaderboard, Controls, Leaderboard, RankedEntry, SortMode};
pub use ranking::{RankMarker, ScoreTier};
