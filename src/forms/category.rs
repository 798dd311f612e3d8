//! Category create and edit

use serde::Serialize;

use super::{Attachment, Form, Schema};
use crate::api::{segment, ApiError, FileUpload, MultipartPayload, WriteRequest};

const CATEGORIES: &str = "/categories";

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryForm {
    /// Set when editing an existing category
    #[serde(skip)]
    pub uuid: Option<String>,
    pub name: String,
    pub description: String,
    pub avatar: Option<FileUpload>,
}

impl CategoryForm {
    pub fn create(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uuid: None,
            name: name.into(),
            description: description.into(),
            avatar: None,
        }
    }

    pub fn edit(uuid: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            ..Self::create(name, description)
        }
    }

    pub fn with_avatar(mut self, avatar: Option<FileUpload>) -> Self {
        self.avatar = avatar;
        self
    }

    fn payload(&self) -> MultipartPayload {
        MultipartPayload::new()
            .text("name", self.name.trim())
            .text("description", self.description.trim())
            .file("avatar", self.avatar.as_ref())
    }
}

impl Form for CategoryForm {
    fn schema(&self) -> Schema {
        Schema::new()
            .field("name", |f| f.required("Name is required."))
            .field("description", |f| f.required("Description is required."))
    }

    fn attachments(&self) -> Vec<Attachment<'_>> {
        self.avatar
            .iter()
            .map(|file| Attachment {
                field: "avatar",
                file,
                image: true,
            })
            .collect()
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        Ok(match &self.uuid {
            Some(uuid) => WriteRequest::patch_multipart(
                &format!("{}/{}", CATEGORIES, segment(uuid)),
                self.payload(),
            ),
            None => WriteRequest::post_multipart(CATEGORIES, self.payload()),
        })
    }

    fn revalidates(&self) -> Vec<String> {
        vec![CATEGORIES.to_string()]
    }

    fn success_title(&self) -> &'static str {
        match self.uuid {
            Some(_) => "Category Updated Successfully!",
            None => "Category Added Successfully!",
        }
    }

    fn failure_fallback(&self) -> &'static str {
        match self.uuid {
            Some(_) => "An error occurred while updating the category.",
            None => "An error occurred while adding the category.",
        }
    }
}
