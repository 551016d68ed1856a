use serde::Deserialize;

use super::double_option;
use crate::domain::WatchStatus;

/// Fields supplied to a progress upsert.
///
/// On creation, absent fields take their defaults (0 episodes,
/// "Plan to Watch", no score). On update, absent fields are left as they are.
/// `score: null` clears the score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProgressPatch {
    #[serde(default)]
    pub episodes_watched: Option<i32>,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub score: Option<Option<i32>>,
}

impl ProgressPatch {
    #[must_use]
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.episodes_watched.is_some() {
            fields.push("episodes_watched");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.score.is_some() {
            fields.push("score");
        }
        fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supplied_fields().is_empty()
    }

    /// Checks value ranges: episodes_watched >= 0 and score in 1..=10.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(episodes) = self.episodes_watched
            && episodes < 0
        {
            return Err(format!("episodes_watched must not be negative (got {episodes})"));
        }

        if let Some(Some(score)) = self.score
            && !SCORE_RANGE.contains(&score)
        {
            return Err(format!(
                "score must be between {} and {} (got {score})",
                SCORE_RANGE.start(),
                SCORE_RANGE.end()
            ));
        }

        Ok(())
    }
}

pub const SCORE_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_labels_and_null_score() {
        let patch: ProgressPatch =
            serde_json::from_str(r#"{"status": "On Hold", "score": null}"#).unwrap();
        assert_eq!(patch.status, Some(WatchStatus::OnHold));
        assert_eq!(patch.score, Some(None));
        assert_eq!(patch.episodes_watched, None);
        assert_eq!(patch.supplied_fields(), vec!["status", "score"]);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let ok = ProgressPatch {
            episodes_watched: Some(0),
            status: None,
            score: Some(Some(10)),
        };
        assert!(ok.validate().is_ok());

        let cleared = ProgressPatch {
            score: Some(None),
            ..ProgressPatch::default()
        };
        assert!(cleared.validate().is_ok());

        let negative = ProgressPatch {
            episodes_watched: Some(-1),
            ..ProgressPatch::default()
        };
        assert!(negative.validate().is_err());

        for score in [0, 11] {
            let patch = ProgressPatch {
                score: Some(Some(score)),
                ..ProgressPatch::default()
            };
            assert!(patch.validate().is_err());
        }
    }

    #[test]
    fn empty_body_supplies_nothing() {
        let patch: ProgressPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }
}
