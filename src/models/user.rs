//!
//! # User Model
//!
//! The user record, its input/update payloads, and the credential logic that
//! belongs to it: password hashing on creation and update, and the
//! email+password lookup used by login.
//!
//! Redaction is structural: the sensitive fields (`password`, `tokens`,
//! `avatar`, `avatarMimeType`) are marked `skip_serializing`, so every outward
//! serialization of a `User` is redacted by construction. Avatar bytes are
//! only reachable through the dedicated binary endpoint.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::store::UserStore;

lazy_static! {
    // A password must not literally contain "password", in any casing.
    static ref FORBIDDEN_PASSWORD: regex::Regex = regex::Regex::new(r"(?i)password").unwrap();
}

fn forbid_password_substring(value: &str) -> Result<(), ValidationError> {
    if FORBIDDEN_PASSWORD.is_match(value) {
        return Err(ValidationError::new("forbidden_password"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub email: String,
    /// Salted bcrypt hash, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    /// Live session tokens. One entry per concurrent session.
    #[serde(skip_serializing)]
    pub tokens: Vec<String>,
    /// Normalized avatar bytes (250x250 PNG), served only as binary.
    #[serde(skip_serializing)]
    pub avatar: Option<Vec<u8>>,
    /// The mime type declared at upload time, kept alongside the bytes.
    #[serde(skip_serializing)]
    pub avatar_mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Deserialize, Validate)]
pub struct UserInput {
    #[validate(length(min = 1, message = "Please enter a valid name"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Please enter a valid age"))]
    pub age: i64,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(
        length(min = 7, message = "Please enter a valid password"),
        custom(function = "forbid_password_substring", message = "Please enter a valid password")
    )]
    pub password: String,
}

impl UserInput {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.password = self.password.trim().to_string();
    }
}

/// Self-service update payload. The route layer has already checked the raw
/// key set against the allow-list; absent fields stay untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1, message = "Please enter a valid name"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "Please enter a valid age"))]
    pub age: Option<i64>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    #[validate(
        length(min = 7, message = "Please enter a valid password"),
        custom(function = "forbid_password_substring", message = "Please enter a valid password")
    )]
    pub password: Option<String>,
}

impl UserUpdate {
    fn normalize(&mut self) {
        if let Some(name) = &self.name {
            self.name = Some(name.trim().to_string());
        }
        if let Some(email) = &self.email {
            self.email = Some(email.trim().to_lowercase());
        }
        if let Some(password) = &self.password {
            self.password = Some(password.trim().to_string());
        }
    }
}

impl User {
    /// Builds a new user from a registration payload: normalizes, validates,
    /// and hashes the password. The token list starts empty; the first session
    /// token is issued separately.
    pub fn create(mut input: UserInput) -> Result<Self, AppError> {
        input.normalize();
        input.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name,
            age: input.age,
            email: input.email,
            password: hash_password(&input.password)?,
            tokens: Vec::new(),
            avatar: None,
            avatar_mime_type: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Looks a user up by email and checks the password against the stored
    /// hash. Both failure modes collapse into the same generic error.
    pub async fn find_by_credentials<S>(
        store: &S,
        email: &str,
        password: &str,
    ) -> Result<User, AppError>
    where
        S: UserStore + ?Sized,
    {
        let user = store
            .find_user_by_email(email)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password)? {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Applies a validated subset of fields. A changed password is re-hashed
    /// before it is stored.
    pub fn apply_update(&mut self, mut update: UserUpdate) -> Result<(), AppError> {
        update.normalize();
        update.validate()?;

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(password) = update.password {
            self.password = hash_password(&password)?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_avatar(&mut self, bytes: Vec<u8>, mime_type: String) {
        self.avatar = Some(bytes);
        self.avatar_mime_type = Some(mime_type);
        self.updated_at = Utc::now();
    }

    pub fn clear_avatar(&mut self) {
        self.avatar = None;
        self.avatar_mime_type = None;
        self.updated_at = Utc::now();
    }
}
