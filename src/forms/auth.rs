//! Authentication forms: login, student registration, password recovery
//!
//! The session cookie these endpoints set is managed outside this crate; a
//! successful login only refreshes the cached current user.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{Form, Schema};
use crate::api::{ApiError, WriteRequest};
use crate::models::Sex;

/// Email domains students may register with
pub const ALLOWED_DOMAINS: &[&str] = &["@gmail.com", "@skilins.com"];

const SEXES: &[&str] = &["Male", "Female"];

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new("[A-Z]").expect("valid pattern"));
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new("[a-z]").expect("valid pattern"));
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new("[0-9]").expect("valid pattern"));
static SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new("[@$!%*?&]").expect("valid pattern"));

const CURRENT_USER: &str = "/auth/me";

#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Form for LoginForm {
    fn schema(&self) -> Schema {
        Schema::new()
            .field("email", |f| {
                f.required("This field has to be filled.")
                    .email("This is not valid email")
            })
            .field("password", |f| {
                f.required("Password must be at least 6 characters.")
                    .min_len(6, "Password must be at least 6 characters.")
            })
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        WriteRequest::post_json("/auth/login", self)
    }

    fn revalidates(&self) -> Vec<String> {
        vec![CURRENT_USER.to_string()]
    }

    fn success_title(&self) -> &'static str {
        "Login successful!"
    }

    fn success_message(&self) -> &'static str {
        "Welcome back."
    }

    fn failure_fallback(&self) -> &'static str {
        "Invalid credentials. Please check your email or password."
    }
}

/// Student self-registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterStudentForm {
    pub email: String,
    pub password: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub nis: u64,
    pub name: String,
    pub major: String,
    pub birthplace: String,
    pub birthdate: Option<NaiveDate>,
    pub sex: Option<Sex>,
}

impl Form for RegisterStudentForm {
    fn schema(&self) -> Schema {
        let domains = format!(
            "Email must use one of the following domains: {}",
            ALLOWED_DOMAINS.join(", ")
        );
        Schema::new()
            .field("email", |f| {
                f.required("Email must be filled")
                    .email("This is not valid email")
                    .ends_with_any(ALLOWED_DOMAINS, domains)
            })
            .field("password", |f| {
                f.required("Password must be at least 8 characters.")
                    .min_len(8, "Password must be at least 8 characters.")
                    .pattern(&UPPERCASE, "Passwords must have at least one uppercase letter")
                    .pattern(&LOWERCASE, "Passwords must have at least one lowercase letter")
                    .pattern(&DIGIT, "Password must have at least one number")
                    .pattern(&SYMBOL, "Password must have at least 1 special symbol (@$!%*?&)")
            })
            .field("fullName", |f| {
                f.required("Full name must be at least 4 characters.")
                    .min_len(4, "Full name must be at least 4 characters.")
            })
            .field("nis", |f| f.min(1.0, "This field has to be filled."))
            .field("name", |f| {
                f.required("Name must be at least 4 characters.")
                    .min_len(4, "Name must be at least 4 characters.")
            })
            .field("major", |f| f.required("Major has to be filled."))
            .field("birthplace", |f| f.required("Birthplace has to be filled."))
            .field("birthdate", |f| f.required("Birthdate has to be filled."))
            .field("sex", |f| {
                f.required("You need to select a sex.")
                    .one_of(SEXES, "You need to select a sex.")
            })
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        WriteRequest::post_json("/auth/register", self)
    }

    fn revalidates(&self) -> Vec<String> {
        vec!["/students".to_string()]
    }

    fn success_title(&self) -> &'static str {
        "Registration successful!"
    }

    fn success_message(&self) -> &'static str {
        "Check your email to verify your account."
    }

    fn failure_fallback(&self) -> &'static str {
        "An error occurred while registering."
    }
}

/// Ask for a password reset link
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl Form for ForgotPasswordForm {
    fn schema(&self) -> Schema {
        Schema::new().field("email", |f| {
            f.required("This field has to be filled.")
                .email("This is not valid email")
        })
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        WriteRequest::post_json("/auth/forgot-password", self)
    }

    fn revalidates(&self) -> Vec<String> {
        Vec::new()
    }

    fn success_title(&self) -> &'static str {
        "Link has been sent to your email!"
    }

    fn success_message(&self) -> &'static str {
        "Follow the link in the email to choose a new password."
    }

    fn failure_fallback(&self) -> &'static str {
        "Something went wrong!"
    }
}

/// Choose a new password using the token from a reset link
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl Form for ResetPasswordForm {
    fn schema(&self) -> Schema {
        Schema::new()
            .field("token", |f| f.required("Reset link is invalid or missing."))
            .field("new_password", |f| {
                f.required("Password must be at least 6 characters.")
                    .min_len(6, "Password must be at least 6 characters.")
            })
            .field("confirm_password", |f| {
                f.required("Password must be at least 6 characters.")
                    .min_len(6, "Password must be at least 6 characters.")
                    .same_as("new_password", "Passwords do not match.")
            })
    }

    fn request(&self) -> Result<WriteRequest, ApiError> {
        WriteRequest::post_json(
            "/auth/reset-password",
            &serde_json::json!({ "password": self.new_password, "token": self.token }),
        )
    }

    fn revalidates(&self) -> Vec<String> {
        Vec::new()
    }

    fn success_title(&self) -> &'static str {
        "Password has been changed"
    }

    fn success_message(&self) -> &'static str {
        "You can now log in with the new password."
    }

    fn failure_fallback(&self) -> &'static str {
        "Failed to change password!"
    }
}
