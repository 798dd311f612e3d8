//! Competition model
//!
//! Writing competitions, the works submitted to them, and the per-parameter
//! scores judges hand out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest score a judge can give on one parameter
pub const MIN_SCORE: f64 = 0.0;
/// Highest score a judge can give on one parameter
pub const MAX_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    pub uuid: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl Competition {
    /// Whether submissions are accepted at `now`
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.start_date.map_or(true, |start| start <= now);
        let not_ended = self.end_date.map_or(true, |end| now <= end);
        started && not_ended
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub uuid: String,
    pub competition_uuid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub scores: Vec<ParameterScore>,
}

/// A criterion submissions are judged on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationParameter {
    pub uuid: String,
    #[serde(alias = "parameterName")]
    pub parameter_name: String,
}

/// One judge's score on one parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterScore {
    pub parameter_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub score: f64,
}

impl ParameterScore {
    /// Blank score for a parameter, as a judge form starts out
    pub fn blank(parameter: &EvaluationParameter) -> Self {
        Self {
            parameter_uuid: parameter.uuid.clone(),
            notes: None,
            score: MIN_SCORE,
        }
    }
}
