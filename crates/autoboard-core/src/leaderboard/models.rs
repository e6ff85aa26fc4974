use std::fmt;

use serde::{Deserialize, Serialize};

/// Quiz difficulty; each has its own leaderboard panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A JSON scalar cell; the backend is loose about number vs. string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    #[serde(default)]
    pub class_id: Option<CellValue>,
    #[serde(default)]
    pub score: Option<CellValue>,
}

impl LeaderboardRow {
    /// Display text for the class column; empty when absent
    pub fn class_text(&self) -> String {
        self.class_id.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    pub fn score_text(&self) -> String {
        self.score.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}

/// Rankings for all three difficulties at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardSnapshot {
    pub easy: Vec<LeaderboardRow>,
    pub normal: Vec<LeaderboardRow>,
    pub hard: Vec<LeaderboardRow>,
}

impl LeaderboardSnapshot {
    pub fn rows(&self, difficulty: Difficulty) -> &[LeaderboardRow] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.easy.len() + self.normal.len() + self.hard.len()
    }
}

/// Wire shape of the leaderboard endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub easy: Option<Vec<LeaderboardRow>>,
    #[serde(default)]
    pub normal: Option<Vec<LeaderboardRow>>,
    #[serde(default)]
    pub hard: Option<Vec<LeaderboardRow>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LeaderboardResponse {
    /// Convert to a snapshot, surfacing a backend-reported error
    pub fn into_snapshot(self) -> crate::Result<LeaderboardSnapshot> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Err(crate::Error::Api(error));
        }
        Ok(LeaderboardSnapshot {
            easy: self.easy.unwrap_or_default(),
            normal: self.normal.unwrap_or_default(),
            hard: self.hard.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "easy": [{"class_id": "3-2", "score": 980}, {"class_id": 1405, "score": 12.5}],
            "hard": [{"score": 10}]
        }"#;
        let response: LeaderboardResponse = serde_json::from_str(json).unwrap();
        let snapshot = response.into_snapshot().unwrap();

        assert_eq!(snapshot.easy.len(), 2);
        assert_eq!(snapshot.easy[0].class_text(), "3-2");
        assert_eq!(snapshot.easy[0].score_text(), "980");
        assert_eq!(snapshot.easy[1].class_text(), "1405");
        assert_eq!(snapshot.easy[1].score_text(), "12.5");
        assert!(snapshot.normal.is_empty());
        assert_eq!(snapshot.hard[0].class_text(), "");
        assert_eq!(snapshot.total_rows(), 3);
    }

    #[test]
    fn test_error_field_is_api_error() {
        let response: LeaderboardResponse =
            serde_json::from_str(r#"{"error": "database unavailable"}"#).unwrap();
        match response.into_snapshot() {
            Err(crate::Error::Api(msg)) => assert_eq!(msg, "database unavailable"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_null_sections() {
        let response: LeaderboardResponse =
            serde_json::from_str(r#"{"easy": null, "normal": [], "hard": null}"#).unwrap();
        assert_eq!(response.into_snapshot().unwrap(), LeaderboardSnapshot::default());
    }

    #[test]
    fn test_empty_error_is_ignored() {
        let response: LeaderboardResponse =
            serde_json::from_str(r#"{"error": "", "easy": [{"class_id": "1-1", "score": 5}]}"#)
                .unwrap();
        let snapshot = response.into_snapshot().unwrap();
        assert_eq!(snapshot.easy.len(), 1);
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::Normal.to_string(), "Normal");
        assert_eq!(Difficulty::ALL.map(Difficulty::label), ["Easy", "Normal", "Hard"]);
    }
}
