//! Field validation for credential submissions.
//!
//! Checks run before any store access. All problems are collected, in field
//! order, into a single `FieldValidationFailed`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Failure, FieldError};
use crate::identity::{NewIdentity, Role};

const MAX_NAME_CHARS: usize = 50;
const MIN_PASSWORD_CHARS: usize = 6;

/// A body field that should hold a JSON string.
///
/// Any other JSON type deserializes as `WrongType` instead of rejecting the
/// whole body, so it is reported against its own field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextField {
    #[default]
    Missing,
    Text(String),
    WrongType,
}

impl TextField {
    /// The trimmed text; missing and wrongly typed fields read as blank.
    fn trimmed(&self) -> &str {
        match self {
            Self::Text(text) => text.trim(),
            Self::Missing | Self::WrongType => "",
        }
    }
}

impl From<&str> for TextField {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<'de> Deserialize<'de> for TextField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Self::Missing,
            Value::String(text) => Self::Text(text),
            _ => Self::WrongType,
        })
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: TextField,
    pub email: TextField,
    pub password: TextField,
    pub role: TextField,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: TextField,
    pub password: TextField,
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Validate a registration body into the fields for a new identity.
pub fn validate_registration(request: RegisterRequest) -> Result<NewIdentity, Failure> {
    let mut errors = Vec::new();

    let name = request.name.trimmed().to_string();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() > MAX_NAME_CHARS {
        errors.push(FieldError::new(
            "name",
            format!("Name cannot be more than {MAX_NAME_CHARS} characters"),
        ));
    }

    let email = request.email.trimmed().to_string();
    if !is_plausible_email(&email) {
        errors.push(FieldError::new("email", "Please provide a valid email"));
    }

    let password = password_text(request.password);
    if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_CHARS} characters"),
        ));
    }

    let role = match &request.role {
        TextField::WrongType => None,
        field if field.trimmed().is_empty() => Some(Role::default()),
        field => field.trimmed().parse::<Role>().ok(),
    };
    let Some(role) = role else {
        let allowed: Vec<&str> = Role::ALL.iter().map(|role| role.as_str()).collect();
        errors.push(FieldError::new(
            "role",
            format!("Role must be one of: {}", allowed.join(", ")),
        ));
        return Err(Failure::FieldValidationFailed(errors));
    };

    if !errors.is_empty() {
        return Err(Failure::FieldValidationFailed(errors));
    }

    Ok(NewIdentity {
        name,
        email,
        password,
        role,
    })
}

/// Validate a login body.
pub fn validate_login(request: LoginRequest) -> Result<Credentials, Failure> {
    let mut errors = Vec::new();

    let email = request.email.trimmed().to_string();
    if !is_plausible_email(&email) {
        errors.push(FieldError::new("email", "Please provide a valid email"));
    }

    let password = password_text(request.password);
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if !errors.is_empty() {
        return Err(Failure::FieldValidationFailed(errors));
    }

    Ok(Credentials { email, password })
}

/// Passwords are taken verbatim, without trimming.
fn password_text(field: TextField) -> String {
    match field {
        TextField::Text(text) => text,
        TextField::Missing | TextField::WrongType => String::new(),
    }
}

/// `local@domain.tld` with no whitespace and a dotted domain.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
