//! Content model
//!
//! Stories, ebooks, audio and video podcasts, reports and blogs share one
//! shape on the wire; `ContentKind` decides which collection they live in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::tag::Tag;

/// Kind of content, one API collection each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Story,
    Ebook,
    Audio,
    Video,
    Report,
    Blog,
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Story,
        ContentKind::Ebook,
        ContentKind::Audio,
        ContentKind::Video,
        ContentKind::Report,
        ContentKind::Blog,
    ];

    /// Collection path of this kind, e.g. `/contents/ebooks`
    pub fn collection_path(&self) -> &'static str {
        match self {
            ContentKind::Story => "/contents/stories",
            ContentKind::Ebook => "/contents/ebooks",
            ContentKind::Audio => "/contents/audios",
            ContentKind::Video => "/contents/videos",
            ContentKind::Report => "/contents/reports",
            ContentKind::Blog => "/contents/blogs",
        }
    }

    /// Path of a single item addressed by slug or uuid
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection_path(), urlencoding::encode(id))
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Story => "story",
            ContentKind::Ebook => "ebook",
            ContentKind::Audio => "audio",
            ContentKind::Video => "video",
            ContentKind::Report => "report",
            ContentKind::Blog => "blog",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "story" | "stories" => Ok(ContentKind::Story),
            "ebook" | "ebooks" => Ok(ContentKind::Ebook),
            "audio" | "audios" => Ok(ContentKind::Audio),
            "video" | "videos" => Ok(ContentKind::Video),
            "report" | "reports" => Ok(ContentKind::Report),
            "blog" | "blogs" => Ok(ContentKind::Blog),
            _ => Err(anyhow::anyhow!("Invalid content kind: {}", s)),
        }
    }
}

/// Lifecycle status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentStatus::Draft => write!(f, "draft"),
            ContentStatus::Pending => write!(f, "pending"),
            ContentStatus::Approved => write!(f, "approved"),
            ContentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Reference to the student or staff member who made the content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatorRef {
    #[serde(default)]
    pub uuid: Option<String>,
    pub name: String,
}

/// A content item of any kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub uuid: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default, alias = "author")]
    pub creator: Option<CreatorRef>,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Slug when the API provides one, uuid otherwise
    pub fn handle(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.uuid)
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Approved
    }
}

/// One part of a serialized story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub uuid: Option<String>,
    pub title: String,
    pub content: String,
    pub order: u32,
}
