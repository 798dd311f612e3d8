//! User model
//!
//! Users of the platform and the role claim that gates every page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role for authorization.
///
/// Roles determine which pages a visitor may open:
/// - Student: browses content and submits own works
/// - Staff: curates content and reviews submissions
/// - Judge: scores competition submissions
/// - Admin: full access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(alias = "student", alias = "STUDENT")]
    Student,
    #[serde(alias = "staff", alias = "STAFF")]
    Staff,
    #[serde(alias = "judge", alias = "JUDGE")]
    Judge,
    #[serde(alias = "admin", alias = "ADMIN")]
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Student,
        UserRole::Staff,
        UserRole::Judge,
        UserRole::Admin,
    ];

    /// Landing page a signed-in user of this role is sent to when a page
    /// refuses them.
    pub fn home_path(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin/dashboard",
            UserRole::Staff => "/staff/dashboard",
            UserRole::Judge => "/judge/dashboard",
            UserRole::Student => "/",
        }
    }

    /// Login page for users of this role
    pub fn login_path(&self) -> &'static str {
        match self {
            UserRole::Admin | UserRole::Staff => "/auth/staff/login",
            UserRole::Judge | UserRole::Student => "/auth/user/login",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => write!(f, "student"),
            UserRole::Staff => write!(f, "staff"),
            UserRole::Judge => write!(f, "judge"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "staff" => Ok(UserRole::Staff),
            "judge" => Ok(UserRole::Judge),
            "admin" => Ok(UserRole::Admin),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// The signed-in user as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Sex::Male),
            "Female" => Ok(Sex::Female),
            _ => Err(anyhow::anyhow!("Invalid sex: {}", s)),
        }
    }
}

/// Student record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub nis: Option<i64>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub birthplace: Option<String>,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<Sex>,
}

/// Judge record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judge {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// School major a student can register under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Major {
    pub uuid: String,
    pub name: String,
}
