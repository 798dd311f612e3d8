//! Resource path helpers shared by hooks, forms and dialogs.
//!
//! Paths double as cache keys, so they are normalized the same way
//! everywhere: leading slash, no trailing slash, no base URL.

use uuid::Uuid;

/// Normalize a resource path into its cache-key form
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    let trimmed = trimmed.trim_start_matches('/');
    format!("/{}", trimmed)
}

/// Strip a base URL prefix from `path`, if present, and normalize the rest
pub fn relative_to(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match path.strip_prefix(base) {
        Some(rest) => normalize_path(rest),
        None => normalize_path(path),
    }
}

/// Path of the collection an item path belongs to.
///
/// `/contents/blogs/<uuid>` becomes `/contents/blogs`; paths not ending in a
/// UUID segment are returned normalized but otherwise unchanged.
pub fn collection_of(path: &str) -> String {
    let normalized = normalize_path(path);
    match normalized.rsplit_once('/') {
        Some((parent, last)) if is_hyphenated_uuid(last) => normalize_path(parent),
        _ => normalized,
    }
}

/// Lowercase hyphenated form only; uppercase hex is treated as a slug
fn is_hyphenated_uuid(segment: &str) -> bool {
    segment.len() == 36
        && !segment.bytes().any(|b| b.is_ascii_uppercase())
        && Uuid::parse_str(segment).is_ok()
}

/// Append URL-encoded query parameters to a path
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let path = normalize_path(path);
    if params.is_empty() {
        return path;
    }
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("{}?{}", path, query.join("&"))
}

/// Encode one path segment (slug, name or uuid)
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
