//! Local validation of the login form and submission through [`DogApi`].

use std::sync::OnceLock;

use regex::Regex;
use shared::protocol::LoginRequest;
use thiserror::Error;
use tracing::warn;

use crate::DogApi;

const MIN_NAME_LEN: usize = 2;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub name: String,
    pub email: String,
}

impl LoginForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Name,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginFieldError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    InvalidEmail,
}

impl LoginFieldError {
    pub fn field(self) -> LoginField {
        match self {
            LoginFieldError::NameRequired | LoginFieldError::NameTooShort => LoginField::Name,
            LoginFieldError::EmailRequired | LoginFieldError::InvalidEmail => LoginField::Email,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid login form: {}", join_messages(.0))]
    Invalid(Vec<LoginFieldError>),
    #[error("{0}")]
    Failed(String),
}

fn join_messages(errors: &[LoginFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Field-level errors for `form`, at most one per field. Empty when the form may be submitted.
pub fn validate(form: &LoginForm) -> Vec<LoginFieldError> {
    let mut errors = Vec::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push(LoginFieldError::NameRequired);
    } else if name.chars().count() < MIN_NAME_LEN {
        errors.push(LoginFieldError::NameTooShort);
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push(LoginFieldError::EmailRequired);
    } else if !email_pattern().is_match(email) {
        errors.push(LoginFieldError::InvalidEmail);
    }

    errors
}

/// Validates locally and only then calls the login endpoint.
pub async fn submit_login(api: &dyn DogApi, form: &LoginForm) -> Result<(), LoginError> {
    let errors = validate(form);
    if !errors.is_empty() {
        return Err(LoginError::Invalid(errors));
    }

    api.login(&form.to_request()).await.map_err(|err| {
        warn!("login failed: {err}");
        LoginError::Failed(err.user_message())
    })
}

#[cfg(test)]
#[path = "tests/login_tests.rs"]
mod tests;
