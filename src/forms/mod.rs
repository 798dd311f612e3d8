//! Forms and dialogs
//!
//! Every write goes through a `Submitter`:
//!
//! 1. refuse if another submission is still in flight
//! 2. validate against the form's schema and check attached files
//! 3. send the write built by the form
//! 4. notify success or failure
//! 5. on success, revalidate the cache keys the form names
//!
//! Invalid input never reaches the network.

pub mod auth;
pub mod category;
pub mod content;
pub mod dialogs;
pub mod feedback;
pub mod story;
pub mod validation;

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{relative_to, ApiClient, ApiError, FileUpload, WriteRequest, WriteResponse};
use crate::cache::MemoryCache;
use crate::config::UploadConfig;
use crate::hooks::Hooks;
use crate::notify::{Notification, Notifier};

pub use auth::{ForgotPasswordForm, LoginForm, RegisterStudentForm, ResetPasswordForm};
pub use category::CategoryForm;
pub use content::{BlogUpdateForm, ContentFields, EbookForm, Podcast, PodcastForm, ReportForm};
pub use dialogs::{ActionDialog, DialogAction};
pub use feedback::FeedbackForm;
pub use story::EpisodeForm;
pub use validation::{Field, FieldErrors, Schema};

/// A file attached to a form field
#[derive(Debug, Clone, Copy)]
pub struct Attachment<'a> {
    pub field: &'static str,
    pub file: &'a FileUpload,
    /// Must be one of the allowed image types
    pub image: bool,
}

/// A form: schema, write, and what to refresh afterwards
pub trait Form: Serialize + Send + Sync {
    fn schema(&self) -> Schema;

    fn validate(&self) -> Result<(), FieldErrors> {
        self.schema().validate_value(self).into_result()
    }

    /// Files to check against the upload limits before sending
    fn attachments(&self) -> Vec<Attachment<'_>> {
        Vec::new()
    }

    /// The network write for this form's current values
    fn request(&self) -> Result<WriteRequest, ApiError>;

    /// Cache keys to revalidate after a successful write
    fn revalidates(&self) -> Vec<String>;

    fn success_title(&self) -> &'static str {
        "Success!"
    }

    /// Shown when the server's response carries no message
    fn success_message(&self) -> &'static str {
        "Saved successfully."
    }

    /// Shown when a failed write carries no server message
    fn failure_fallback(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Form is invalid: {0}")]
    Invalid(FieldErrors),

    #[error("A submission is already in progress")]
    Busy,

    #[error(transparent)]
    Failed(#[from] ApiError),
}

impl SubmitError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Runs forms against the API
pub struct Submitter {
    client: ApiClient,
    cache: MemoryCache,
    notifier: Arc<dyn Notifier>,
    upload: UploadConfig,
    in_flight: AtomicBool,
}

impl Submitter {
    pub fn new(client: ApiClient, cache: MemoryCache, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            cache,
            notifier,
            upload: UploadConfig::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submitter sharing the client and cache of `hooks`
    pub fn for_hooks(hooks: &Hooks, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(hooks.client().clone(), hooks.cache().clone(), notifier)
    }

    pub fn with_upload_config(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    /// Whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit<F: Form + ?Sized>(&self, form: &F) -> Result<WriteResponse, SubmitError> {
        let _flight = InFlight::acquire(&self.in_flight).ok_or(SubmitError::Busy)?;

        self.check(form).map_err(SubmitError::Invalid)?;

        let request = match form.request() {
            Ok(request) => request,
            Err(error) => return Err(self.fail(form, error)),
        };

        tracing::info!("Submitting {} {}", request.method, request.path);
        let body = match self.client.send(&request).await {
            Ok(body) => body,
            Err(error) => return Err(self.fail(form, error)),
        };

        let response = WriteResponse::from_value(body);
        let description = response
            .message
            .clone()
            .unwrap_or_else(|| form.success_message().to_string());
        self.notifier
            .notify(Notification::success(form.success_title(), description));

        for key in form.revalidates() {
            let key = relative_to(self.client.base_url(), &key);
            self.cache.revalidate(&key).await;
        }

        Ok(response)
    }

    fn check<F: Form + ?Sized>(&self, form: &F) -> Result<(), FieldErrors> {
        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors,
        };

        for attachment in form.attachments() {
            let checked = if attachment.image {
                attachment.file.check_image(&self.upload)
            } else {
                attachment.file.check_size(&self.upload)
            };
            if let Err(e) = checked {
                errors.add(attachment.field, e.to_string());
            }
        }

        if !errors.is_empty() {
            tracing::debug!("Form rejected before sending: {}", errors);
        }
        errors.into_result()
    }

    fn fail<F: Form + ?Sized>(&self, form: &F, error: ApiError) -> SubmitError {
        tracing::warn!("Write failed: {}", error);
        self.notifier
            .notify(Notification::from_error(&error, form.failure_fallback()));
        SubmitError::Failed(error)
    }
}

/// Holds the in-flight flag for the duration of one submission
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
