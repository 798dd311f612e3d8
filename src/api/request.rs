//! Write requests
//!
//! Forms and dialogs describe their network write as a `WriteRequest`; the
//! client turns it into a reqwest call. Multipart payloads are kept as plain
//! data so a request can be inspected in tests and rebuilt on every send.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::common::normalize_path;
use super::error::ApiError;
use super::upload::FileUpload;

/// HTTP method of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// One part of a multipart body
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartField {
    Text { name: String, value: String },
    File { name: String, file: FileUpload },
}

/// A multipart/form-data body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartPayload {
    fields: Vec<MultipartField>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push(MultipartField::Text {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    /// Add a field holding the JSON encoding of `value`
    pub fn json<T: Serialize>(self, name: &str, value: &T) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode '{}': {}", name, e)))?;
        Ok(self.text(name, encoded))
    }

    /// Add a file part; `None` leaves the payload unchanged
    pub fn file(mut self, name: &str, file: Option<&FileUpload>) -> Self {
        if let Some(file) = file {
            self.fields.push(MultipartField::File {
                name: name.to_string(),
                file: file.clone(),
            });
        }
        self
    }

    pub fn fields(&self) -> &[MultipartField] {
        &self.fields
    }

    /// Value of the first text field named `name`
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match field {
            MultipartField::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|field| matches!(field, MultipartField::File { name: n, .. } if n == name))
    }

    /// Build the reqwest form for one send
    pub fn to_form(&self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for field in &self.fields {
            form = match field {
                MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
                MultipartField::File { name, file } => {
                    let part = reqwest::multipart::Part::bytes(file.data.as_ref().clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.content_type)
                        .map_err(|e| {
                            ApiError::InvalidRequest(format!(
                                "Invalid content type '{}': {}",
                                file.content_type, e
                            ))
                        })?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// Body of a write
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

/// A network write: method, resource path and body
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub method: Method,
    pub path: String,
    pub body: Body,
}

impl WriteRequest {
    pub fn new(method: Method, path: &str, body: Body) -> Self {
        Self {
            method,
            path: normalize_path(path),
            body,
        }
    }

    pub fn post_json<T: Serialize>(path: &str, body: &T) -> Result<Self, ApiError> {
        Ok(Self::new(Method::Post, path, Body::Json(to_value(body)?)))
    }

    pub fn patch_json<T: Serialize>(path: &str, body: &T) -> Result<Self, ApiError> {
        Ok(Self::new(Method::Patch, path, Body::Json(to_value(body)?)))
    }

    pub fn post_multipart(path: &str, payload: MultipartPayload) -> Self {
        Self::new(Method::Post, path, Body::Multipart(payload))
    }

    pub fn patch_multipart(path: &str, payload: MultipartPayload) -> Self {
        Self::new(Method::Patch, path, Body::Multipart(payload))
    }

    pub fn patch_empty(path: &str) -> Self {
        Self::new(Method::Patch, path, Body::Empty)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::Delete, path, Body::Empty)
    }
}

fn to_value<T: Serialize>(body: &T) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))
}
