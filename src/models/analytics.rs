//! Feedback analytics model

use serde::{Deserialize, Serialize};

/// Count for one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

/// Comments and likes received over the last three months, per day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    #[serde(default)]
    pub last_three_months_comment: Vec<DailyCount>,
    #[serde(default)]
    pub last_three_months_like: Vec<DailyCount>,
}

/// One row of the comments/likes chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFeedback {
    pub date: String,
    pub comments: u64,
    pub likes: u64,
}

impl FeedbackStats {
    pub fn total_comments(&self) -> u64 {
        self.last_three_months_comment.iter().map(|day| day.count).sum()
    }

    pub fn total_likes(&self) -> u64 {
        self.last_three_months_like.iter().map(|day| day.count).sum()
    }

    /// Comment days paired with the like count at the same index.
    /// A missing like entry counts as zero.
    pub fn daily(&self) -> Vec<DailyFeedback> {
        self.last_three_months_comment
            .iter()
            .enumerate()
            .map(|(index, day)| DailyFeedback {
                date: day.date.clone(),
                comments: day.count,
                likes: self
                    .last_three_months_like
                    .get(index)
                    .map(|like| like.count)
                    .unwrap_or(0),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats() -> FeedbackStats {
        serde_json::from_value(json!({
            "lastThreeMonthsComment": [
                { "date": "2024-05-01", "count": 3 },
                { "date": "2024-05-02", "count": 1 }
            ],
            "lastThreeMonthsLike": [{ "date": "2024-05-01", "count": 7 }]
        }))
        .unwrap()
    }

    #[test]
    fn test_totals() {
        let stats = stats();
        assert_eq!(stats.total_comments(), 4);
        assert_eq!(stats.total_likes(), 7);
    }

    #[test]
    fn test_daily_pairs_by_index() {
        let daily = stats().daily();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].likes, 7);
        assert_eq!(daily[1].date, "2024-05-02");
        assert_eq!(daily[1].comments, 1);
        assert_eq!(daily[1].likes, 0);
    }

    #[test]
    fn test_missing_series_default_to_empty() {
        let stats: FeedbackStats = serde_json::from_value(json!({})).unwrap();
        assert_eq!(stats, FeedbackStats::default());
        assert!(stats.daily().is_empty());
    }
}
