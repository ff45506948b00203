//! Filter, sort and decorate loaded entries into a leaderboard.
//!
//! Everything here is total: once entries are loaded nothing can fail, and an
//! empty result is a valid leaderboard with zero rows.

use std::cmp::Ordering;

use crate::entry::LeaderboardEntry;
use crate::ranking::{is_top_row, RankMarker, ScoreTier};

/// Key the leaderboard is ordered by, always high to low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    AverageScore,
    GamesPlayed,
}

impl SortMode {
    pub fn label(self) -> &'static str {
        match self {
            SortMode::AverageScore => "Average Score (High → Low)",
            SortMode::GamesPlayed => "Games Played (High → Low)",
        }
    }

    fn compare_descending(self, a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
        match self {
            SortMode::AverageScore => b.average_score.total_cmp(&a.average_score),
            SortMode::GamesPlayed => b.number_played.cmp(&a.number_played),
        }
    }
}

/// Render-time controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub sort: SortMode,
    /// Minimum games played to be listed
    pub min_games: u32,
    /// Maximum days since the last game to be listed
    pub max_inactive_days: u32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            sort: SortMode::AverageScore,
            min_games: 5,
            max_inactive_days: 7,
        }
    }
}

impl Controls {
    /// True when the entry passes both thresholds.
    pub fn admits(&self, entry: &LeaderboardEntry) -> bool {
        entry.number_played >= self.min_games && entry.active_within(self.max_inactive_days)
    }
}

/// A sorted entry with its display decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<'a> {
    /// 0-based position after sorting
    pub position: usize,
    pub entry: &'a LeaderboardEntry,
    pub marker: Option<RankMarker>,
    pub top_row: bool,
    pub tier: ScoreTier,
}

/// The result of one pass over a batch of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard<'a> {
    pub controls: Controls,
    pub rows: Vec<RankedEntry<'a>>,
    /// Entries in the batch before filtering
    pub total_entries: usize,
}

impl Leaderboard<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Keep exactly the entries admitted by `controls`, in input order.
pub fn filter_entries<'a>(
    entries: &'a [LeaderboardEntry],
    controls: &Controls,
) -> Vec<&'a LeaderboardEntry> {
    entries.iter().filter(|e| controls.admits(e)).collect()
}

/// Sort high to low on `mode`. The sort is stable: equal keys keep their
/// input order.
pub fn sort_entries(entries: &mut [&LeaderboardEntry], mode: SortMode) {
    entries.sort_by(|a, b| mode.compare_descending(a, b));
}

/// Attach rank markers, the top-row flag and score tiers to sorted entries.
pub fn decorate<'a>(sorted: Vec<&'a LeaderboardEntry>) -> Vec<RankedEntry<'a>> {
    sorted
        .into_iter()
        .enumerate()
        .map(|(position, entry)| RankedEntry {
            position,
            entry,
            marker: RankMarker::for_position(position),
            top_row: is_top_row(position),
            tier: ScoreTier::classify(entry.average_score),
        })
        .collect()
}

/// Filter, sort and decorate a batch.
pub fn build_leaderboard<'a>(
    entries: &'a [LeaderboardEntry],
    controls: &Controls,
) -> Leaderboard<'a> {
    let mut selected = filter_entries(entries, controls);
    sort_entries(&mut selected, controls.sort);
    log::debug!(
        "{} of {} entries pass min_games={} max_inactive_days={}",
        selected.len(),
        entries.len(),
        controls.min_games,
        controls.max_inactive_days
    );

    Leaderboard {
        controls: *controls,
        rows: decorate(selected),
        total_entries: entries.len(),
    }
}
