//! Role guard
//!
//! Wraps a page and decides, from the visitor's role claim, whether it may be
//! rendered. Until the claim has been checked the wrapped page shows a
//! loading placeholder, never its content.

use crate::api::ApiError;
use crate::models::UserRole;
use crate::pages::{Page, PageView};
use crate::session::RoleClaimSource;

/// Outcome of a role check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(UserRole),
    Redirect(String),
}

/// Set of roles allowed on a page plus where to send unauthenticated visitors
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: Vec<UserRole>,
    login_path: String,
}

impl RoleGuard {
    pub fn new(allowed: &[UserRole], login_path: impl Into<String>) -> Self {
        Self {
            allowed: allowed.to_vec(),
            login_path: login_path.into(),
        }
    }

    /// Guard for pages of a single role, logging in through that role's login page
    pub fn only(role: UserRole) -> Self {
        Self::new(&[role], role.login_path())
    }

    pub fn allowed(&self) -> &[UserRole] {
        &self.allowed
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide where a visitor with `claim` goes.
    ///
    /// A missing claim and a claim that is not a known role both mean the
    /// visitor is unauthenticated.
    pub fn decide(&self, claim: Option<&str>) -> Navigation {
        let role = match claim.map(str::parse::<UserRole>) {
            Some(Ok(role)) => role,
            Some(Err(e)) => {
                tracing::info!("Unrecognized role claim, redirecting to login: {}", e);
                return Navigation::Redirect(self.login_path.clone());
            }
            None => {
                tracing::info!("No role claim, redirecting to {}", self.login_path);
                return Navigation::Redirect(self.login_path.clone());
            }
        };

        if self.allowed.contains(&role) {
            Navigation::Render(role)
        } else {
            tracing::info!("Role {} not allowed here, redirecting to {}", role, role.home_path());
            Navigation::Redirect(role.home_path().to_string())
        }
    }
}

/// Progress of a guarded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Allowed(UserRole),
    Redirected(String),
}

/// What a guarded page shows
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Loading,
    Redirect(String),
    Page(PageView),
}

/// A page wrapped in a role guard
pub struct WithRole<P> {
    page: P,
    guard: RoleGuard,
    state: GuardState,
}

impl<P: Page> WithRole<P> {
    pub fn new(page: P, guard: RoleGuard) -> Self {
        Self {
            page,
            guard,
            state: GuardState::Loading,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Check the visitor's claim and settle the guard
    pub async fn resolve(&mut self, source: &dyn RoleClaimSource) -> &GuardState {
        let claim = source.role_claim().await;
        self.state = match self.guard.decide(claim.as_deref()) {
            Navigation::Render(role) => GuardState::Allowed(role),
            Navigation::Redirect(path) => GuardState::Redirected(path),
        };
        &self.state
    }

    /// Render according to the current state. The wrapped page is only
    /// asked to render once the guard has allowed it.
    pub async fn render(&self) -> Result<Rendered, ApiError> {
        match &self.state {
            GuardState::Loading => Ok(Rendered::Loading),
            GuardState::Redirected(path) => Ok(Rendered::Redirect(path.clone())),
            GuardState::Allowed(_) => Ok(Rendered::Page(self.page.render().await?)),
        }
    }

    /// Resolve then render
    pub async fn open(&mut self, source: &dyn RoleClaimSource) -> Result<Rendered, ApiError> {
        self.resolve(source).await;
        self.render().await
    }
}
