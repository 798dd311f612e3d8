//! Content forms: reports, podcasts, ebooks and blog updates
//!
//! All of these are sent as multipart because they may carry a thumbnail or
//! a media file. Tags and subjects travel as JSON-encoded text fields and the
//! category is sent by name.

use chrono::NaiveDate;
use serde::Serialize;

use super::{Attachment, Field, Form, Schema};
use crate::api::{ApiError, FileUpload, MultipartPayload, WriteRequest};
use crate::models::{ContentKind, SubjectList, TagList};

const TITLE_TOO_SHORT: &str = "Title must be longer than or equal to 5 characters";

fn title_rules(f: Field) -> Field {
    f.required("Title is required.").min_len(5, TITLE_TOO_SHORT)
}

/// Fields every content form shares
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: TagList,
    pub subjects: SubjectList,
    pub thumbnail: Option<FileUpload>,
}

impl ContentFields {
    pub fn new(title: impl Into<String>, description: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .field("title", title_rules)
            .field("description", |f| f.required("Description is required."))
            .field("category", |f| f.required("Category is required."))
            .field("tags[].name", |f| f.required("Tag name is required."))
    }

    fn payload(&self) -> Result<MultipartPayload, ApiError> {
        Ok(MultipartPayload::new()
            .file("thumbnail", self.thumbnail.as_ref())
            .text("title", self.title.as_str())
            .text("description", self.description.as_str())
            .json("subjects", &self.subjects)?
            .text("category_name", self.category.as_str())
            .json("tags", &self.tags)?)
    }

    fn thumbnail_attachment(&self) -> Option<Attachment<'_>> {
        self.thumbnail.as_ref().map(|file| Attachment {
            field: "thumbnail",
            file,
            image: true,
        })
    }
}

fn create_or_update(kind: ContentKind, uuid: Option<&str>, payload: MultipartPayload) -> WriteRequest {
    match uuid {
        Some(uuid) => WriteRequest::patch_multipart(&kind.item_path(uuid), payload),
        None => WriteRequest::post_multipart(kind.collection_path(), payload),
    }
}

fn media_attachment(file: Option<&FileUpload>) -> Option<Attachment<'_>> {
    file.map(|file| Attachment {
        field: "file",
        file,
        image: false,
    })
}

/// Report create or edit
#[derive(Debug, Clone, Serialize)]
pub struct ReportForm {
    #[serde(skip)]
    pub uuid: Option<String>,
    #[serde(flatten)]
    pub fields: ContentFields,
    pub pages: u32,
    pub author: String,
    pub published_at: Option<NaiveDate>,
    pub file: Option<FileUpload>,
}

impl Form for ReportForm {
    fn schema(&self) -> Schema {
        let schema = self
            .fields
            .schema()
            .field("pages", |f| f.min(1.0, "Pages must be greater than 0."))
            .field("author", |f| f.required("Author is required."))
            .field("published_at", |f| f.required("Publication date is required."));
        if self.uuid.is_none() {
            schema.field("file", |f| f.required("File is required."))
        } else {
            schema
        }
    }

    fn attachments(&self) -> Vec<Attachment<'_>> {
        self.fields
            .thumbnail_attachment()
            .into_iter()
            .chain(media_attachment(self.file.as_ref()))
            .collect()
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        let mut payload = self
            .fields
            .payload()?
            .text("pages", self.pages.to_string())
            .file("file_url", self.file.as_ref())
            .text("author_uuid", self.author.trim());
        if let Some(date) = self.published_at {
            payload = payload.text("published_at", date.to_string());
        }
        Ok(create_or_update(ContentKind::Report, self.uuid.as_deref(), payload))
    }

    fn revalidates(&self) -> Vec<String> {
        vec![ContentKind::Report.collection_path().to_string()]
    }

    fn success_title(&self) -> &'static str {
        match self.uuid {
            Some(_) => "Report Updated Successfully!",
            None => "Report Added Successfully!",
        }
    }

    fn failure_fallback(&self) -> &'static str {
        match self.uuid {
            Some(_) => "An error occurred while editing the report.",
            None => "An error occurred while adding the report.",
        }
    }
}

/// Which podcast collection a `PodcastForm` writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Podcast {
    Audio,
    Video,
}

impl Podcast {
    pub fn kind(&self) -> ContentKind {
        match self {
            Podcast::Audio => ContentKind::Audio,
            Podcast::Video => ContentKind::Video,
        }
    }
}

/// Audio or video podcast create
#[derive(Debug, Clone, Serialize)]
pub struct PodcastForm {
    #[serde(skip)]
    pub podcast: Podcast,
    #[serde(flatten)]
    pub fields: ContentFields,
    /// Length in minutes
    pub duration: u32,
    pub creator: String,
    pub file: Option<FileUpload>,
}

impl Form for PodcastForm {
    fn schema(&self) -> Schema {
        self.fields
            .schema()
            .field("duration", |f| f.min(1.0, "Duration must be greater than 0."))
            .field("creator", |f| f.required("Creator is required."))
            .field("file", |f| f.required("File is required."))
    }

    fn attachments(&self) -> Vec<Attachment<'_>> {
        self.fields
            .thumbnail_attachment()
            .into_iter()
            .chain(media_attachment(self.file.as_ref()))
            .collect()
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        let payload = self
            .fields
            .payload()?
            .text("duration", self.duration.to_string())
            .file("file_url", self.file.as_ref())
            .text("creator_uuid", self.creator.trim());
        Ok(create_or_update(self.podcast.kind(), None, payload))
    }

    fn revalidates(&self) -> Vec<String> {
        vec![self.podcast.kind().collection_path().to_string()]
    }

    fn success_title(&self) -> &'static str {
        match self.podcast {
            Podcast::Audio => "Audio Added Successfully!",
            Podcast::Video => "Video Added Successfully!",
        }
    }

    fn failure_fallback(&self) -> &'static str {
        "An error occurred while adding the podcast."
    }
}

/// Ebook create or edit
#[derive(Debug, Clone, Serialize)]
pub struct EbookForm {
    #[serde(skip)]
    pub uuid: Option<String>,
    #[serde(flatten)]
    pub fields: ContentFields,
    pub pages: u32,
    pub publication: String,
    pub author: String,
    pub isbn: String,
    pub release_date: Option<NaiveDate>,
    pub file: Option<FileUpload>,
}

impl Form for EbookForm {
    fn schema(&self) -> Schema {
        let schema = self
            .fields
            .schema()
            .field("pages", |f| f.min(1.0, "Pages must be greater than 0."))
            .field("publication", |f| f.required("Publication is required."))
            .field("author", |f| f.required("Author is required."))
            .field("isbn", |f| f.required("ISBN is required."));
        if self.uuid.is_none() {
            schema.field("file", |f| f.required("File is required."))
        } else {
            schema
        }
    }

    fn attachments(&self) -> Vec<Attachment<'_>> {
        self.fields
            .thumbnail_attachment()
            .into_iter()
            .chain(media_attachment(self.file.as_ref()))
            .collect()
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        let mut payload = self
            .fields
            .payload()?
            .text("pages", self.pages.to_string())
            .file("file_url", self.file.as_ref())
            .text("author", self.author.trim())
            .text("publication", self.publication.trim())
            .text("isbn", self.isbn.trim());
        if let Some(date) = self.release_date {
            payload = payload.text("release_date", date.to_string());
        }
        Ok(create_or_update(ContentKind::Ebook, self.uuid.as_deref(), payload))
    }

    fn revalidates(&self) -> Vec<String> {
        vec![ContentKind::Ebook.collection_path().to_string()]
    }

    fn success_title(&self) -> &'static str {
        match self.uuid {
            Some(_) => "Ebook Updated Successfully!",
            None => "Ebook Added Successfully!",
        }
    }

    fn failure_fallback(&self) -> &'static str {
        match self.uuid {
            Some(_) => "An error occurred while editing the ebook.",
            None => "An error occurred while adding the ebook.",
        }
    }
}

/// Blog update. Subjects are not part of a blog.
#[derive(Debug, Clone, Serialize)]
pub struct BlogUpdateForm {
    #[serde(skip)]
    pub uuid: String,
    #[serde(flatten)]
    pub fields: ContentFields,
}

impl Form for BlogUpdateForm {
    fn schema(&self) -> Schema {
        self.fields.schema()
    }

    fn attachments(&self) -> Vec<Attachment<'_>> {
        self.fields.thumbnail_attachment().into_iter().collect()
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        let payload = MultipartPayload::new()
            .file("thumbnail", self.fields.thumbnail.as_ref())
            .text("title", self.fields.title.as_str())
            .text("description", self.fields.description.as_str())
            .json("tags", &self.fields.tags)?
            .text("category_name", self.fields.category.as_str());
        Ok(create_or_update(ContentKind::Blog, Some(&self.uuid), payload))
    }

    fn revalidates(&self) -> Vec<String> {
        vec![ContentKind::Blog.collection_path().to_string()]
    }

    fn failure_fallback(&self) -> &'static str {
        "An error occurred while updating the blog."
    }
}
