//! Data models
//!
//! Transient copies of remote API resources:
//! - Users, roles, students, judges, majors
//! - Categories and tags
//! - Content items of every kind
//! - Competitions, submissions and scores
//! - Feedback analytics

mod analytics;
mod category;
mod competition;
mod content;
mod tag;
mod user;

pub use analytics::{DailyCount, DailyFeedback, FeedbackStats};
pub use category::Category;
pub use competition::{Competition, EvaluationParameter, ParameterScore, Submission, MAX_SCORE, MIN_SCORE};
pub use content::{ContentItem, ContentKind, ContentStatus, CreatorRef, Episode};
pub use tag::{SubjectList, Tag, TagList};
pub use user::{Judge, Major, Sex, Student, User, UserRole};
