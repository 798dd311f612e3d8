//! Session: where the role claim comes from
//!
//! The role claim is written by an external login flow into the `userRole`
//! cookie. This crate only reads it. Sources sit behind `RoleClaimSource` so
//! a guard can be driven by a raw cookie header, a cookie file, or a claim
//! injected directly by the caller.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::config::SessionConfig;

/// Cookie holding the role claim
pub const ROLE_COOKIE: &str = "userRole";

/// Something that can produce the current role claim
#[async_trait]
pub trait RoleClaimSource: Send + Sync {
    /// The raw role claim, if one is present
    async fn role_claim(&self) -> Option<String>;

    /// The full cookie header to forward on credentialed requests
    async fn cookie_header(&self) -> Option<String> {
        None
    }
}

/// Read one cookie's value out of a `Cookie` header
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    for cookie in header.split(';') {
        let cookie = cookie.trim();
        if let Some((key, value)) = cookie.split_once('=') {
            if key.trim() == name {
                let value = urlencoding::decode(value.trim())
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.trim().to_string());
                return Some(value).filter(|v| !v.is_empty());
            }
        }
    }
    None
}

/// Role claim from an inline cookie header
#[derive(Debug, Clone)]
pub struct CookieHeader(pub String);

#[async_trait]
impl RoleClaimSource for CookieHeader {
    async fn role_claim(&self) -> Option<String> {
        cookie_value(&self.0, ROLE_COOKIE)
    }

    async fn cookie_header(&self) -> Option<String> {
        Some(self.0.clone()).filter(|c| !c.trim().is_empty())
    }
}

/// Role claim from a file holding a cookie header.
///
/// The file is read on every query so a login flow can rewrite it between
/// runs. A missing or unreadable file means no session.
#[derive(Debug, Clone)]
pub struct CookieFile(pub PathBuf);

impl CookieFile {
    async fn read(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.0).await {
            Ok(content) => Some(content.trim().to_string()).filter(|c| !c.is_empty()),
            Err(e) => {
                tracing::debug!("No session cookie at {}: {}", self.0.display(), e);
                None
            }
        }
    }
}

#[async_trait]
impl RoleClaimSource for CookieFile {
    async fn role_claim(&self) -> Option<String> {
        let header = self.read().await?;
        cookie_value(&header, ROLE_COOKIE)
    }

    async fn cookie_header(&self) -> Option<String> {
        self.read().await
    }
}

/// A claim injected by the caller, e.g. from an auth context
#[derive(Debug, Clone, Default)]
pub struct StaticClaim(pub Option<String>);

impl StaticClaim {
    pub fn new(claim: impl Into<String>) -> Self {
        Self(Some(claim.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait]
impl RoleClaimSource for StaticClaim {
    async fn role_claim(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Pick the claim source the configuration describes.
///
/// A cookie file wins over an inline cookie; with neither there is no session.
pub fn source_from_config(config: &SessionConfig) -> Box<dyn RoleClaimSource> {
    if let Some(path) = &config.cookie_file {
        return Box::new(CookieFile(path.clone()));
    }
    match &config.cookie {
        Some(cookie) => Box::new(CookieHeader(cookie.clone())),
        None => Box::new(StaticClaim::none()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cookie_value() {
        let header = "token=abc; userRole=admin; theme=dark";
        assert_eq!(cookie_value(header, "userRole").as_deref(), Some("admin"));
        assert_eq!(cookie_value(header, "token").as_deref(), Some("abc"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("userRole=", "userRole"), None);
        assert_eq!(cookie_value("userRole=Staff%20", "userRole").as_deref(), Some("Staff "));
    }

    #[tokio::test]
    async fn test_cookie_header_source() {
        let source = CookieHeader("userRole=judge; token=t".to_string());
        assert_eq!(source.role_claim().await.as_deref(), Some("judge"));
        assert_eq!(source.cookie_header().await.as_deref(), Some("userRole=judge; token=t"));
    }

    #[tokio::test]
    async fn test_cookie_file_source() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "userRole=student; token=xyz").unwrap();

        let source = CookieFile(file.path().to_path_buf());
        assert_eq!(source.role_claim().await.as_deref(), Some("student"));
        assert_eq!(source.cookie_header().await.as_deref(), Some("userRole=student; token=xyz"));
    }

    #[tokio::test]
    async fn test_missing_cookie_file_is_no_session() {
        let source = CookieFile(PathBuf::from("/definitely/not/a/cookie"));
        assert_eq!(source.role_claim().await, None);
    }

    #[tokio::test]
    async fn test_source_from_config() {
        let config = SessionConfig {
            cookie: Some("userRole=admin".to_string()),
            cookie_file: None,
        };
        assert_eq!(source_from_config(&config).role_claim().await.as_deref(), Some("admin"));

        let empty = source_from_config(&SessionConfig::default());
        assert_eq!(empty.role_claim().await, None);
        assert_eq!(empty.cookie_header().await, None);
    }
}
