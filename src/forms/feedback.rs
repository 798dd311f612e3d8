//! Judge feedback on a competition submission

use serde::Serialize;

use super::{Form, Schema};
use crate::api::{segment, ApiError, WriteRequest};
use crate::models::{EvaluationParameter, ParameterScore, MAX_SCORE, MIN_SCORE};

/// One judge's scores for one submission, a score per evaluation parameter
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackForm {
    #[serde(skip)]
    pub judge_uuid: String,
    #[serde(skip)]
    pub competition_uuid: Option<String>,
    pub submission_uuid: String,
    pub parameter_scores: Vec<ParameterScore>,
}

impl FeedbackForm {
    /// A form with a blank score for every parameter
    pub fn new(
        judge_uuid: impl Into<String>,
        submission_uuid: impl Into<String>,
        parameters: &[EvaluationParameter],
    ) -> Self {
        Self {
            judge_uuid: judge_uuid.into(),
            competition_uuid: None,
            submission_uuid: submission_uuid.into(),
            parameter_scores: parameters.iter().map(ParameterScore::blank).collect(),
        }
    }

    pub fn for_competition(mut self, competition_uuid: impl Into<String>) -> Self {
        self.competition_uuid = Some(competition_uuid.into());
        self
    }

    /// Set the score and notes for a parameter. Returns false, leaving the
    /// form unchanged, if the form has no such parameter or `score` is not a
    /// finite number.
    pub fn score(&mut self, parameter_uuid: &str, score: f64, notes: Option<&str>) -> bool {
        if !score.is_finite() {
            return false;
        }
        match self
            .parameter_scores
            .iter_mut()
            .find(|s| s.parameter_uuid == parameter_uuid)
        {
            Some(entry) => {
                entry.score = score;
                entry.notes = notes.map(str::to_string).filter(|n| !n.trim().is_empty());
                true
            }
            None => false,
        }
    }
}

impl Form for FeedbackForm {
    fn schema(&self) -> Schema {
        Schema::new()
            .field("submission_uuid", |f| f.required("Submission is required."))
            .field("parameter_scores", |f| {
                f.min_len(1, "At least one parameter must be scored.")
            })
            .field("parameter_scores[].score", |f| {
                f.required("Score is required.")
                    .min(MIN_SCORE, format!("Score must be at least {}.", MIN_SCORE))
                    .max(MAX_SCORE, format!("Score must be at most {}.", MAX_SCORE))
            })
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        WriteRequest::patch_json(&format!("/judges/{}/submission", segment(&self.judge_uuid)), self)
    }

    fn revalidates(&self) -> Vec<String> {
        let mut keys = vec!["/judges/me".to_string()];
        if let Some(competition) = &self.competition_uuid {
            keys.push(format!("/competitions/{}/submissions", segment(competition)));
        }
        keys
    }

    fn success_message(&self) -> &'static str {
        "Submission judged."
    }

    fn failure_fallback(&self) -> &'static str {
        "An error occurred while judging the submission."
    }
}
