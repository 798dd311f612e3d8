//! Confirmation dialogs: delete, reject, approve
//!
//! A dialog has no fields. It acts on one item path and, on success,
//! revalidates the collection that item belongs to: the path with its
//! trailing UUID segment stripped.

use serde::Serialize;

use super::{Form, Schema};
use crate::api::{collection_of, normalize_path, ApiError, WriteRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Delete,
    Reject,
    Approve,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionDialog {
    #[serde(skip)]
    action: DialogAction,
    #[serde(skip)]
    path: String,
}

impl ActionDialog {
    pub fn new(action: DialogAction, path: &str) -> Self {
        Self {
            action,
            path: path.trim().to_string(),
        }
    }

    pub fn delete(path: &str) -> Self {
        Self::new(DialogAction::Delete, path)
    }

    pub fn reject(path: &str) -> Self {
        Self::new(DialogAction::Reject, path)
    }

    pub fn approve(path: &str) -> Self {
        Self::new(DialogAction::Approve, path)
    }

    pub fn action(&self) -> DialogAction {
        self.action
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Form for ActionDialog {
    fn schema(&self) -> Schema {
        Schema::new()
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        if normalize_path(&self.path) == "/" {
            return Err(ApiError::InvalidRequest("Dialog has no target path".to_string()));
        }
        Ok(match self.action {
            DialogAction::Delete => WriteRequest::delete(&self.path),
            DialogAction::Reject => WriteRequest::patch_empty(&format!("{}/reject", normalize_path(&self.path))),
            DialogAction::Approve => WriteRequest::patch_empty(&format!("{}/approve", normalize_path(&self.path))),
        })
    }

    fn revalidates(&self) -> Vec<String> {
        vec![collection_of(&self.path)]
    }

    fn success_title(&self) -> &'static str {
        match self.action {
            DialogAction::Delete => "Delete Successful!",
            DialogAction::Reject => "Content Rejected Successfully!",
            DialogAction::Approve => "Content Approved Successfully!",
        }
    }

    fn success_message(&self) -> &'static str {
        match self.action {
            DialogAction::Delete => "The item has been deleted.",
            DialogAction::Reject => "The content has been rejected.",
            DialogAction::Approve => "The content has been approved.",
        }
    }

    fn failure_fallback(&self) -> &'static str {
        match self.action {
            DialogAction::Delete => "An error occurred while deleting the content.",
            DialogAction::Reject => "An error occurred while rejecting the content.",
            DialogAction::Approve => "An error occurred while approving the content.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Body, Method};
    use crate::cache::MemoryCache;
    use crate::forms::{SubmitError, Submitter};
    use crate::hooks::Hooks;
    use crate::notify::RecordingNotifier;
    use crate::testing::MockApi;
    use serde_json::json;
    use std::sync::Arc;

    const VIDEO: &str = "/contents/videos/0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d";

    #[test]
    fn test_requests() {
        let delete = ActionDialog::delete(VIDEO).request().unwrap();
        assert_eq!(delete.method, Method::Delete);
        assert_eq!(delete.path, VIDEO);

        let reject = ActionDialog::reject(VIDEO).request().unwrap();
        assert_eq!(reject.method, Method::Patch);
        assert_eq!(reject.path, format!("{}/reject", VIDEO));
        assert_eq!(reject.body, Body::Empty);

        let approve = ActionDialog::approve(&format!("{}/", VIDEO)).request().unwrap();
        assert_eq!(approve.path, format!("{}/approve", VIDEO));
    }

    #[test]
    fn test_revalidates_collection() {
        assert_eq!(ActionDialog::delete(VIDEO).revalidates(), vec!["/contents/videos".to_string()]);
        assert_eq!(
            ActionDialog::delete("/categories/fiction").revalidates(),
            vec!["/categories/fiction".to_string()]
        );
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(matches!(
            ActionDialog::delete(" ").request(),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_item_from_list() {
        let api = MockApi::start().await;
        api.collection(
            "/contents/videos",
            vec![
                json!({ "uuid": "0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d", "title": "Belajar Rust" }),
                json!({ "uuid": "11111111-2222-4333-8444-555555555555", "title": "Belajar Go" }),
            ],
        );
        let notifier = RecordingNotifier::new();
        let hooks = Hooks::new(api.client(), MemoryCache::new());
        let submitter = Submitter::for_hooks(&hooks, Arc::new(notifier.clone()));

        assert_eq!(hooks.videos().load().await.data.unwrap().len(), 2);

        submitter.submit(&ActionDialog::delete(VIDEO)).await.unwrap();

        let notice = notifier.last().unwrap();
        assert_eq!(notice.title, "Delete Successful!");
        assert_eq!(notice.description, "Delete successful");

        let videos = hooks.videos().load().await.data.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Belajar Go");
    }

    #[tokio::test]
    async fn test_reject_failure_notifies_error_field() {
        let api = MockApi::start().await;
        api.fail(&format!("{}/reject", VIDEO), 403, json!({ "error": "Forbidden" }));
        let notifier = RecordingNotifier::new();
        let hooks = Hooks::new(api.client(), MemoryCache::new());
        let submitter = Submitter::for_hooks(&hooks, Arc::new(notifier.clone()));

        let err = submitter.submit(&ActionDialog::reject(VIDEO)).await.unwrap_err();

        assert!(matches!(err, SubmitError::Failed(_)));
        assert_eq!(notifier.last().unwrap().description, "Forbidden");
    }

    #[tokio::test]
    async fn test_approve_unreachable_server_uses_fallback() {
        let client = crate::api::ApiClient::new(&crate::config::ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
        })
        .unwrap();
        let notifier = RecordingNotifier::new();
        let submitter = Submitter::new(client, MemoryCache::new(), Arc::new(notifier.clone()));

        submitter.submit(&ActionDialog::approve(VIDEO)).await.unwrap_err();

        assert_eq!(
            notifier.last().unwrap().description,
            "An error occurred while approving the content."
        );
    }
}
