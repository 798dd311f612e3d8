//! API layer - talking to the skilins REST API
//!
//! This module contains everything needed to reach the remote API:
//! - `ApiClient`: reqwest client bound to the configured base URL
//! - `WriteRequest`: description of a create/update/delete call
//! - `ApiError`: failures with the server's message preserved
//! - path helpers shared by hooks, forms and dialogs
//! - file uploads for multipart writes

pub mod client;
pub mod common;
pub mod error;
pub mod request;
pub mod responses;
pub mod upload;

pub use client::ApiClient;
pub use common::{collection_of, normalize_path, relative_to, segment, with_query};
pub use error::ApiError;
pub use request::{Body, Method, MultipartField, MultipartPayload, WriteRequest};
pub use responses::{decode_data, decode_envelope, Envelope, WriteResponse};
pub use upload::{content_type_for, FileUpload, UploadError};
