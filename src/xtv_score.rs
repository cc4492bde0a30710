// High-score record: the one piece of state that persists across sessions

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("high-score data is corrupt: {reason}")]
    CorruptHighScore { reason: String },
}

/// Best score on record, with the name of its holder
/// The default record (empty name, score 0) stands in when nothing valid
/// has been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighScore {
    pub name: String,
    pub score: i32,
}

impl HighScore {
    /// Parse the stored `name%score` text
    /// Fields past the second are ignored, matching the historical format
    pub fn parse(text: &str) -> Result<HighScore, ScoreError> {
        let mut fields = text.split('%');
        let name = fields.next().unwrap_or_default();
        let score_field = fields.next().ok_or_else(|| ScoreError::CorruptHighScore {
            reason: "expected name%score".to_string(),
        })?;
        let score = score_field.trim().parse::<i32>().map_err(|_| ScoreError::CorruptHighScore {
            reason: format!("score \"{}\" is not a number", score_field.trim()),
        })?;
        Ok(HighScore { name: name.to_string(), score })
    }

    /// Render as `name%score` with no trailing delimiter
    /// Always written as a full overwrite of any prior record
    pub fn serialize(&self) -> String {
        format!("{}%{}", self.name, self.score)
    }

    /// Apply the record rule: a strictly greater score takes the record,
    /// ties leave the standing record in place
    pub fn challenge(&self, name: &str, score: i32) -> Option<HighScore> {
        if score > self.score {
            Some(HighScore { name: name.to_string(), score })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        let record = HighScore::parse("Ann%500").unwrap();
        assert_eq!(record, HighScore { name: "Ann".to_string(), score: 500 });
        assert_eq!(record.serialize(), "Ann%500");
    }

    #[test]
    fn parse_accepts_negative_scores() {
        let record = HighScore::parse("Bob%-400").unwrap();
        assert_eq!(record.score, -400);
    }

    #[test]
    fn parse_rejects_missing_delimiter() {
        assert!(matches!(
            HighScore::parse("just-a-name"),
            Err(ScoreError::CorruptHighScore { .. })
        ));
    }

    #[test]
    fn parse_rejects_non_numeric_score() {
        assert!(matches!(
            HighScore::parse("Ann%lots"),
            Err(ScoreError::CorruptHighScore { .. })
        ));
    }

    #[test]
    fn parse_ignores_trailing_fields() {
        let record = HighScore::parse("Ann%500%junk").unwrap();
        assert_eq!(record, HighScore { name: "Ann".to_string(), score: 500 });
    }

    #[test]
    fn default_record_is_blank_zero() {
        let record = HighScore::default();
        assert_eq!(record.name, "");
        assert_eq!(record.score, 0);
    }

    #[test]
    fn challenge_requires_strictly_greater() {
        let record = HighScore { name: "Ann".to_string(), score: 500 };
        assert_eq!(
            record.challenge("Bob", 600),
            Some(HighScore { name: "Bob".to_string(), score: 600 })
        );
        assert_eq!(record.challenge("Cara", 500), None);
        assert_eq!(record.challenge("Dee", 499), None);
    }
}
