//! Rank markers and score tiers used to decorate leaderboard rows.

/// Medal shown beside the first three authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMarker {
    First,
    Second,
    Third,
}

impl RankMarker {
    /// Marker for a 0-based position after sorting.
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(RankMarker::First),
            1 => Some(RankMarker::Second),
            2 => Some(RankMarker::Third),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            RankMarker::First => "🥇",
            RankMarker::Second => "🥈",
            RankMarker::Third => "🥉",
        }
    }

    /// Plain label for fixed-width text output
    pub fn label(self) -> &'static str {
        match self {
            RankMarker::First => "1st",
            RankMarker::Second => "2nd",
            RankMarker::Third => "3rd",
        }
    }
}

/// Only the leader's row is highlighted.
pub fn is_top_row(position: usize) -> bool {
    position == 0
}

/// Color band for an average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    /// 9 and above
    High,
    /// 7 up to 9
    Mid,
    /// Below 7
    Low,
}

impl ScoreTier {
    pub const HIGH_THRESHOLD: f64 = 9.0;
    pub const MID_THRESHOLD: f64 = 7.0;

    pub fn classify(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            ScoreTier::High
        } else if score >= Self::MID_THRESHOLD {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }

    /// CSS class applied to the score cell
    pub fn css_class(self) -> &'static str {
        match self {
            ScoreTier::High => "score-green",
            ScoreTier::Mid => "score-orange",
            ScoreTier::Low => "score-red",
        }
    }

    /// Font color used in spreadsheet exports, matching the page stylesheet
    pub fn color(self) -> &'static str {
        match self {
            ScoreTier::High => "#2E7D32",
            ScoreTier::Mid => "#F9A825",
            ScoreTier::Low => "#C62828",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_for_first_three_positions() {
        assert_eq!(RankMarker::for_position(0), Some(RankMarker::First));
        assert_eq!(RankMarker::for_position(1), Some(RankMarker::Second));
        assert_eq!(RankMarker::for_position(2), Some(RankMarker::Third));
        assert_eq!(RankMarker::for_position(3), None);
        assert_eq!(RankMarker::for_position(100), None);
        assert_eq!(RankMarker::First.symbol(), "🥇");
        assert_eq!(RankMarker::Third.label(), "3rd");
    }

    #[test]
    fn test_top_row_only_first() {
        assert!(is_top_row(0));
        assert!(!is_top_row(1));
        assert!(!is_top_row(4));
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ScoreTier::classify(10.0), ScoreTier::High);
        assert_eq!(ScoreTier::classify(9.0), ScoreTier::High);
        assert_eq!(ScoreTier::classify(8.999), ScoreTier::Mid);
        assert_eq!(ScoreTier::classify(7.0), ScoreTier::Mid);
        assert_eq!(ScoreTier::classify(6.999), ScoreTier::Low);
        assert_eq!(ScoreTier::classify(0.0), ScoreTier::Low);
        assert_eq!(ScoreTier::classify(-1.0), ScoreTier::Low);
    }

    #[test]
    fn test_tier_css_classes() {
        assert_eq!(ScoreTier::High.css_class(), "score-green");
        assert_eq!(ScoreTier::Mid.css_class(), "score-orange");
        assert_eq!(ScoreTier::Low.css_class(), "score-red");
    }
}
