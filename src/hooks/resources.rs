//! One hook constructor per resource type

use serde::{de::DeserializeOwned, Serialize};

use super::Hook;
use crate::api::{segment, with_query, ApiClient};
use crate::cache::MemoryCache;
use crate::models::{
    Category, Competition, ContentItem, ContentKind, EvaluationParameter, Episode, FeedbackStats,
    Judge, Major, Student, Submission, Tag, User,
};

/// Hands out hooks that share one client and one cache
#[derive(Debug, Clone)]
pub struct Hooks {
    client: ApiClient,
    cache: MemoryCache,
}

impl Hooks {
    pub fn new(client: ApiClient, cache: MemoryCache) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &MemoryCache {
        &self.cache
    }

    /// Hook for an arbitrary path
    pub fn at<T>(&self, path: &str) -> Hook<T>
    where
        T: DeserializeOwned + Serialize + Send + Sync,
    {
        Hook::new(
            self.client.clone(),
            self.cache.clone(),
            crate::api::normalize_path(path),
        )
    }

    // Categories, tags and people

    pub fn categories(&self) -> Hook<Vec<Category>> {
        self.at("/categories")
    }

    pub fn category_search(&self, term: &str) -> Hook<Vec<Category>> {
        self.at(&with_query("/categories", &[("search", term)]))
    }

    pub fn tags(&self) -> Hook<Vec<Tag>> {
        self.at("/tags")
    }

    pub fn tag_by_name(&self, name: &str) -> Hook<Tag> {
        self.at(&format!("/tags/{}", segment(name)))
    }

    pub fn students(&self) -> Hook<Vec<Student>> {
        self.at("/students")
    }

    pub fn majors(&self) -> Hook<Vec<Major>> {
        self.at("/majors")
    }

    /// The signed-in user
    pub fn current_user(&self) -> Hook<User> {
        self.at("/auth/me")
    }

    /// The signed-in judge
    pub fn judge_user(&self) -> Hook<Judge> {
        self.at("/judges/me")
    }

    // Content

    pub fn contents(&self, kind: ContentKind) -> Hook<Vec<ContentItem>> {
        self.at(kind.collection_path())
    }

    /// One page of a content collection, numbered from 1
    pub fn contents_page(&self, kind: ContentKind, page: u32) -> Hook<Vec<ContentItem>> {
        self.at(&with_query(kind.collection_path(), &[("page", &page.to_string())]))
    }

    /// One content item by slug or uuid
    pub fn content(&self, kind: ContentKind, handle: &str) -> Hook<ContentItem> {
        self.at(&kind.item_path(handle))
    }

    pub fn blogs(&self) -> Hook<Vec<ContentItem>> {
        self.contents(ContentKind::Blog)
    }

    pub fn blog_by_slug(&self, slug: &str) -> Hook<ContentItem> {
        self.content(ContentKind::Blog, slug)
    }

    pub fn stories(&self) -> Hook<Vec<ContentItem>> {
        self.contents(ContentKind::Story)
    }

    pub fn story_by_slug(&self, slug: &str) -> Hook<ContentItem> {
        self.content(ContentKind::Story, slug)
    }

    pub fn story_episodes(&self, story_uuid: &str) -> Hook<Vec<Episode>> {
        self.at(&format!("{}/episodes", ContentKind::Story.item_path(story_uuid)))
    }

    pub fn ebooks(&self) -> Hook<Vec<ContentItem>> {
        self.contents(ContentKind::Ebook)
    }

    pub fn audios(&self) -> Hook<Vec<ContentItem>> {
        self.contents(ContentKind::Audio)
    }

    pub fn videos(&self) -> Hook<Vec<ContentItem>> {
        self.contents(ContentKind::Video)
    }

    pub fn reports(&self) -> Hook<Vec<ContentItem>> {
        self.contents(ContentKind::Report)
    }

    // Analytics

    /// Platform-wide comments and likes for the admin dashboard
    pub fn feedback_stats(&self) -> Hook<FeedbackStats> {
        self.at("/analytics/feedbacks")
    }

    // Competitions

    pub fn competitions(&self) -> Hook<Vec<Competition>> {
        self.at("/competitions")
    }

    pub fn competition(&self, uuid: &str) -> Hook<Competition> {
        self.at(&format!("/competitions/{}", segment(uuid)))
    }

    pub fn submissions(&self, competition_uuid: &str) -> Hook<Vec<Submission>> {
        self.at(&format!("/competitions/{}/submissions", segment(competition_uuid)))
    }

    pub fn evaluation_parameters(&self, competition_uuid: &str) -> Hook<Vec<EvaluationParameter>> {
        self.at(&format!("/competitions/{}/parameters", segment(competition_uuid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::testing::MockApi;
    use serde_json::json;

    fn hooks() -> Hooks {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        Hooks::new(client, MemoryCache::new())
    }

    #[test]
    fn test_resource_keys() {
        let hooks = hooks();
        assert_eq!(hooks.categories().key(), "/categories");
        assert_eq!(hooks.category_search("seni rupa").key(), "/categories?search=seni%20rupa");
        assert_eq!(hooks.tag_by_name("sci fi").key(), "/tags/sci%20fi");
        assert_eq!(hooks.current_user().key(), "/auth/me");
        assert_eq!(hooks.blog_by_slug("hello").key(), "/contents/blogs/hello");
        assert_eq!(hooks.story_episodes("s-1").key(), "/contents/stories/s-1/episodes");
        assert_eq!(hooks.videos().key(), "/contents/videos");
        assert_eq!(hooks.contents_page(ContentKind::Audio, 1).key(), "/contents/audios?page=1");
        assert_eq!(hooks.feedback_stats().key(), "/analytics/feedbacks");
        assert_eq!(hooks.evaluation_parameters("c-1").key(), "/competitions/c-1/parameters");
        assert_eq!(hooks.submissions("c-1").key(), "/competitions/c-1/submissions");
    }

    #[tokio::test]
    async fn test_hooks_share_one_cache() {
        let api = MockApi::start().await;
        api.set(
            "/categories",
            json!({ "data": [{ "uuid": "c-1", "name": "Fiction" }] }),
        );
        let hooks = Hooks::new(api.client(), MemoryCache::new());

        let first = hooks.categories().load().await;
        let second = hooks.categories().peek().await;

        assert_eq!(first.data, second.data);
        assert_eq!(api.count("GET", "/categories"), 1);
    }

    #[tokio::test]
    async fn test_blog_by_slug_decodes_item() {
        let api = MockApi::start().await;
        api.collection(
            "/contents/blogs",
            vec![json!({
                "uuid": "b-1",
                "slug": "first-post",
                "title": "First post",
                "status": "approved",
                "author": { "name": "Sari" }
            })],
        );
        let hooks = Hooks::new(api.client(), MemoryCache::new());

        let blog = hooks.blog_by_slug("first-post").fetch().await.unwrap();
        assert_eq!(blog.title, "First post");
        assert!(blog.is_published());
        assert_eq!(blog.creator.unwrap().name, "Sari");
    }
}
