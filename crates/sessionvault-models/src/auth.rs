//! Authentication DTOs.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use sessionvault_core::StagedFile;

use crate::users::PublicUser;

/// Login with a username or an email, plus a password.
///
/// Either identifier suffices. Missing fields deserialize as empty so that
/// validation, not the JSON parser, reports what is missing.
#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_login_identifier"))]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[serde(default)]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

impl LoginRequest {
    /// Lower-cased username, if one was given.
    pub fn username(&self) -> Option<String> {
        normalize_identifier(self.username.as_deref())
    }

    /// Lower-cased email, if one was given.
    pub fn email(&self) -> Option<String> {
        normalize_identifier(self.email.as_deref())
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn normalize_identifier(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn validate_login_identifier(request: &LoginRequest) -> Result<(), ValidationError> {
    if request.username().is_none() && request.email().is_none() {
        return Err(ValidationError::new("identifier")
            .with_message(Cow::Borrowed("username or email is required")));
    }
    Ok(())
}

/// Refresh token submitted in the request body when no cookie is present.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// A freshly minted access/refresh pair.
#[derive(Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// Successful login: the user plus both tokens.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

impl LoginResponse {
    pub fn new(user: PublicUser, tokens: TokenPair) -> Self {
        Self {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Registration input, assembled from a multipart form.
///
/// Uploaded files are already staged on disk; dropping the form removes them.
#[derive(Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub avatar: Option<StagedFile>,
    pub cover_image: Option<StagedFile>,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("avatar", &self.avatar.as_ref().map(|s| s.path()))
            .field("cover_image", &self.cover_image.as_ref().map(|s| s.path()))
            .finish_non_exhaustive()
    }
}

/// OpenAPI description of the multipart registration body.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUpload {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[schema(value_type = String, format = Binary)]
    pub avatar: Vec<u8>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub cover_image: Option<Vec<u8>>,
}
