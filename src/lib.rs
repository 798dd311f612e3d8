//! skilins - typed client for the skilins school library content platform
//!
//! The library wraps the platform's REST API:
//! - `api`: HTTP client, write requests, multipart uploads, errors
//! - `cache` and `hooks`: cached, revalidating resource loads
//! - `forms`: validated writes with notifications and revalidation
//! - `guard` and `session`: role-based page access from the `userRole` cookie
//! - `pages` and `cli`: text rendering and the `skilins` binary

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod forms;
pub mod guard;
pub mod hooks;
pub mod models;
pub mod notify;
pub mod pages;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
