//! Pages: text renderings of hook data
//!
//! A page pulls what it needs through hooks and renders it as plain text,
//! keeping the JSON it rendered from for machine-readable output. Pages are
//! normally opened through a role guard.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::api::ApiError;
use crate::hooks::Hook;
use crate::models::{
    Category, Competition, ContentItem, Episode, EvaluationParameter, FeedbackStats, Major,
    Student, Submission, Tag, User,
};

/// Rendered page
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub title: String,
    pub body: String,
    pub data: Value,
}

impl PageView {
    pub fn text(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: Value::Null,
        }
    }
}

#[async_trait]
pub trait Page: Send + Sync {
    fn title(&self) -> String;

    async fn render(&self) -> Result<PageView, ApiError>;
}

#[async_trait]
impl Page for Box<dyn Page> {
    fn title(&self) -> String {
        (**self).title()
    }

    async fn render(&self) -> Result<PageView, ApiError> {
        (**self).render().await
    }
}

/// One-line summary of a list entry
pub trait Listing {
    fn line(&self) -> String;
}

/// Multi-line description of a single resource
pub trait Detail {
    fn lines(&self) -> Vec<String>;
}

/// A list of resources
pub struct ListPage<T> {
    title: String,
    hook: Hook<Vec<T>>,
}

impl<T> ListPage<T> {
    pub fn new(title: impl Into<String>, hook: Hook<Vec<T>>) -> Self {
        Self {
            title: title.into(),
            hook,
        }
    }
}

#[async_trait]
impl<T> Page for ListPage<T>
where
    T: Listing + DeserializeOwned + Serialize + Send + Sync,
{
    fn title(&self) -> String {
        self.title.clone()
    }

    async fn render(&self) -> Result<PageView, ApiError> {
        let items = self.hook.load().await.into_result()?;
        let body = if items.is_empty() {
            "No items.".to_string()
        } else {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{:>3}. {}", i + 1, item.line()))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Ok(PageView {
            title: self.title.clone(),
            body,
            data: serde_json::to_value(&items).unwrap_or(Value::Null),
        })
    }
}

/// A single resource
pub struct DetailPage<T> {
    title: String,
    hook: Hook<T>,
}

impl<T> DetailPage<T> {
    pub fn new(title: impl Into<String>, hook: Hook<T>) -> Self {
        Self {
            title: title.into(),
            hook,
        }
    }
}

#[async_trait]
impl<T> Page for DetailPage<T>
where
    T: Detail + DeserializeOwned + Serialize + Send + Sync,
{
    fn title(&self) -> String {
        self.title.clone()
    }

    async fn render(&self) -> Result<PageView, ApiError> {
        let item = self.hook.load().await.into_result()?;
        Ok(PageView {
            title: self.title.clone(),
            body: item.lines().join("\n"),
            data: serde_json::to_value(&item).unwrap_or(Value::Null),
        })
    }
}

impl Listing for Category {
    fn line(&self) -> String {
        match &self.description {
            Some(description) => format!("{} - {} [{}]", self.name, description, self.uuid),
            None => format!("{} [{}]", self.name, self.uuid),
        }
    }
}

impl Listing for Tag {
    fn line(&self) -> String {
        format!("#{}", self.name)
    }
}

impl Listing for ContentItem {
    fn line(&self) -> String {
        let creator = self
            .creator
            .as_ref()
            .map(|c| format!(" by {}", c.name))
            .unwrap_or_default();
        format!("{}{} ({}) [{}]", self.title, creator, self.status, self.handle())
    }
}

impl Listing for Episode {
    fn line(&self) -> String {
        format!("Episode {}: {}", self.order, self.title)
    }
}

impl Listing for Student {
    fn line(&self) -> String {
        match &self.major {
            Some(major) => format!("{} ({}) [{}]", self.name, major, self.uuid),
            None => format!("{} [{}]", self.name, self.uuid),
        }
    }
}

impl Listing for Major {
    fn line(&self) -> String {
        self.name.clone()
    }
}

impl Listing for Competition {
    fn line(&self) -> String {
        let open = if self.is_open_at(chrono::Utc::now()) { "open" } else { "closed" };
        format!("{} ({}) [{}]", self.title, open, self.uuid)
    }
}

impl Listing for Submission {
    fn line(&self) -> String {
        format!(
            "{} by {} - {} scores [{}]",
            self.title.as_deref().unwrap_or("Untitled"),
            self.student_name.as_deref().unwrap_or("unknown"),
            self.scores.len(),
            self.uuid
        )
    }
}

impl Listing for EvaluationParameter {
    fn line(&self) -> String {
        format!("{} [{}]", self.parameter_name, self.uuid)
    }
}

impl Detail for ContentItem {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone(), format!("Status: {}", self.status)];
        if let Some(creator) = &self.creator {
            lines.push(format!("By: {}", creator.name));
        }
        if let Some(category) = &self.category {
            lines.push(format!("Category: {}", category));
        }
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("#{}", t.name)).collect();
            lines.push(format!("Tags: {}", tags.join(" ")));
        }
        if !self.subjects.is_empty() {
            lines.push(format!("Subjects: {}", self.subjects.join(", ")));
        }
        if let Some(description) = &self.description {
            lines.push(String::new());
            lines.push(description.clone());
        }
        lines
    }
}

impl Detail for Competition {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            lines.push(format!("{} - {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")));
        }
        if let Some(description) = &self.description {
            lines.push(description.clone());
        }
        lines
    }
}

impl Detail for User {
    fn lines(&self) -> Vec<String> {
        vec![
            format!("{} <{}>", self.name, self.email),
            format!("Role: {}", self.role),
        ]
    }
}

impl Detail for FeedbackStats {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Comments (last 3 months): {}", self.total_comments()),
            format!("Likes (last 3 months): {}", self.total_likes()),
        ];
        let daily = self.daily();
        if !daily.is_empty() {
            lines.push(String::new());
            lines.extend(
                daily
                    .iter()
                    .map(|day| format!("{}  {} comments, {} likes", day.date, day.comments, day.likes)),
            );
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::hooks::Hooks;
    use crate::testing::MockApi;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_page_renders_lines() {
        let api = MockApi::start().await;
        api.set(
            "/contents/stories",
            json!({ "data": [
                { "uuid": "s-1", "slug": "si-kancil", "title": "Si Kancil", "status": "approved", "creator": { "name": "Rina" } },
                { "uuid": "s-2", "title": "Malin Kundang", "status": "pending" }
            ] }),
        );
        let hooks = Hooks::new(api.client(), MemoryCache::new());

        let view = ListPage::new("Stories", hooks.stories()).render().await.unwrap();

        assert_eq!(view.title, "Stories");
        assert_eq!(
            view.body,
            "  1. Si Kancil by Rina (approved) [si-kancil]\n  2. Malin Kundang (pending) [s-2]"
        );
        assert_eq!(view.data[1]["uuid"], "s-2");
    }

    #[tokio::test]
    async fn test_empty_list() {
        let api = MockApi::start().await;
        api.set("/tags", json!({ "data": [] }));
        let hooks = Hooks::new(api.client(), MemoryCache::new());

        let view = ListPage::new("Tags", hooks.tags()).render().await.unwrap();
        assert_eq!(view.body, "No items.");
    }

    #[tokio::test]
    async fn test_detail_page_propagates_errors() {
        let api = MockApi::start().await;
        api.fail("/contents/blogs/missing", 404, json!({ "message": "Blog not found" }));
        let hooks = Hooks::new(api.client(), MemoryCache::new());

        let err = DetailPage::new("Blog", hooks.blog_by_slug("missing"))
            .render()
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Blog not found"));
    }

    #[test]
    fn test_content_detail_lines() {
        let item: ContentItem = serde_json::from_value(json!({
            "uuid": "b-1",
            "title": "Hello",
            "status": "draft",
            "tags": [{ "name": "intro" }],
            "description": "First post"
        }))
        .unwrap();

        assert_eq!(
            item.lines(),
            vec!["Hello", "Status: draft", "Tags: #intro", "", "First post"]
        );
    }

    #[tokio::test]
    async fn test_paged_list_reads_requested_page() {
        let api = MockApi::start().await;
        api.set(
            "/contents/audios?page=2",
            json!({ "data": [{ "uuid": "a-9", "title": "Dongeng Malam", "status": "approved" }] }),
        );
        let hooks = Hooks::new(api.client(), MemoryCache::new());

        let view = ListPage::new("Audios", hooks.contents_page(crate::models::ContentKind::Audio, 2))
            .render()
            .await
            .unwrap();

        assert_eq!(view.body, "  1. Dongeng Malam (approved) [a-9]");
        assert_eq!(api.count("GET", "/contents/audios?page=2"), 1);
    }

    #[tokio::test]
    async fn test_feedback_stats_page() {
        let api = MockApi::start().await;
        api.set(
            "/analytics/feedbacks",
            json!({ "data": {
                "lastThreeMonthsComment": [
                    { "date": "2024-05-01", "count": 2 },
                    { "date": "2024-05-02", "count": 0 }
                ],
                "lastThreeMonthsLike": [
                    { "date": "2024-05-01", "count": 5 },
                    { "date": "2024-05-02", "count": 1 }
                ]
            } }),
        );
        let hooks = Hooks::new(api.client(), MemoryCache::new());

        let view = DetailPage::new("Feedback", hooks.feedback_stats())
            .render()
            .await
            .unwrap();

        assert_eq!(
            view.body,
            "Comments (last 3 months): 2\nLikes (last 3 months): 6\n\n2024-05-01  2 comments, 5 likes\n2024-05-02  0 comments, 1 likes"
        );
        assert_eq!(view.data["lastThreeMonthsLike"][0]["count"], 5);
    }
}
