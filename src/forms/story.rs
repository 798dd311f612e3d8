//! Writing a story episode

use serde::Serialize;
use serde_json::json;

use super::{Form, Schema};
use crate::api::{ApiError, WriteRequest};
use crate::models::ContentKind;

/// New episode of a story
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeForm {
    #[serde(skip)]
    pub story_uuid: String,
    pub title: String,
    pub content: String,
    pub order: u32,
}

impl EpisodeForm {
    fn episodes_path(&self) -> String {
        format!("{}/episodes", ContentKind::Story.item_path(&self.story_uuid))
    }
}

impl Form for EpisodeForm {
    fn schema(&self) -> Schema {
        Schema::new()
            .field("title", |f| {
                f.required("Title is required.")
                    .min_len(5, "Title must be longer than or equal to 5 characters")
            })
            .field("content", |f| f.required("Content must be filled"))
            .field("order", |f| f.min(1.0, "Order must be filled"))
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        WriteRequest::post_json(
            &self.episodes_path(),
            &json!({
                "title": self.title,
                "content": self.content,
                "order": self.order,
            }),
        )
    }

    fn revalidates(&self) -> Vec<String> {
        vec![self.episodes_path(), ContentKind::Story.collection_path().to_string()]
    }

    fn success_message(&self) -> &'static str {
        "Episode saved."
    }

    fn failure_fallback(&self) -> &'static str {
        "An error occurred while saving the episode."
    }
}
