//! Typed leaderboard records.

/// Column holding the author's avatar URL
pub const COL_PROFILE_IMAGE: &str = "Profile Image";
/// Column holding the author's display name
pub const COL_AUTHOR: &str = "Author";
/// Column holding the mean score across all games
pub const COL_AVERAGE_SCORE: &str = "Average Score";
/// Column holding the number of games played
pub const COL_NUMBER_PLAYED: &str = "Number Played";
/// Column holding the time since the author last played
pub const COL_MOST_RECENT: &str = "Most Recent";

/// Every column a leaderboard source must provide, in display order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_PROFILE_IMAGE,
    COL_AUTHOR,
    COL_AVERAGE_SCORE,
    COL_NUMBER_PLAYED,
    COL_MOST_RECENT,
];

/// One author's standing for a single render.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// Avatar URL, `None` when the cell was blank
    pub profile_image_url: Option<String>,
    /// Display name (not guaranteed unique)
    pub author: String,
    /// Mean score, roughly 0-10
    pub average_score: f64,
    /// Games played
    pub number_played: u32,
    /// Whole days since the last game, never negative.
    /// `None` when the source had no value, which fails every inactivity filter.
    pub inactive_days: Option<f64>,
}

impl LeaderboardEntry {
    /// True when the entry has played within `max_days` days.
    pub fn active_within(&self, max_days: u32) -> bool {
        self.inactive_days
            .is_some_and(|days| days <= f64::from(max_days))
    }
}
