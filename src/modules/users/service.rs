use std::time::Instant;

use anyhow::anyhow;
use tracing::instrument;
use validator::Validate;

use sessionvault_auth::{
    TokenError, create_access_token, create_refresh_token, verify_access_token,
    verify_refresh_token,
};
use sessionvault_config::JwtConfig;
use sessionvault_core::{AuthError, MediaStore, hash_password, verify_password};
use sessionvault_db::{DirectoryError, UserDirectory};
use sessionvault_models::{
    LoginRequest, LoginResponse, NewUser, PublicUser, RegisterForm, TokenPair, User, UserId,
};

use crate::metrics::{
    track_access_validation, track_login_failure, track_login_success, track_logout,
    track_password_hash_duration, track_rotation, track_tokens_issued, track_user_registered,
};
use crate::validator::collect_messages;

const UNAUTHORIZED_REQUEST: &str = "unauthorized request";
const INVALID_ACCESS_TOKEN: &str = "invalid access token";
const INVALID_REFRESH_TOKEN: &str = "invalid refresh token";
const REFRESH_TOKEN_USED: &str = "refresh token is expired or used";
const DUPLICATE_USER: &str = "user with this email or username already exists";

fn directory_error(err: DirectoryError) -> AuthError {
    match err {
        DirectoryError::UniqueViolation(_) => AuthError::conflict(DUPLICATE_USER),
        other => AuthError::internal(other),
    }
}

fn signing_error(err: TokenError) -> AuthError {
    AuthError::internal(anyhow!("failed to sign token: {}", err))
}

/// Bearer credential with surrounding whitespace removed; empty counts as absent.
fn present(token: Option<&str>) -> Option<&str> {
    token.map(str::trim).filter(|t| !t.is_empty())
}

fn mint_pair(user: &User, jwt_config: &JwtConfig) -> Result<TokenPair, AuthError> {
    let access_token = create_access_token(
        user.id.into_inner(),
        &user.username,
        &user.email,
        &user.full_name,
        jwt_config,
    )
    .map_err(signing_error)?;
    let refresh_token =
        create_refresh_token(user.id.into_inner(), jwt_config).map_err(signing_error)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

pub struct AuthService;

impl AuthService {
    /// Resolve a user from login credentials.
    #[instrument(skip_all, fields(username = ?dto.username(), email = ?dto.email()))]
    pub async fn authenticate(
        users: &dyn UserDirectory,
        dto: &LoginRequest,
    ) -> Result<User, AuthError> {
        if let Err(errors) = dto.validate() {
            let messages = collect_messages(&errors);
            let message = messages
                .first()
                .cloned()
                .unwrap_or_else(|| "username or email is required".to_string());
            track_login_failure("validation");
            return Err(AuthError::validation_with(message, messages));
        }

        let username = dto.username();
        let email = dto.email();

        let Some(user) = users
            .find_by_username_or_email(username.as_deref(), email.as_deref())
            .await
            .map_err(directory_error)?
        else {
            track_login_failure("user_not_found");
            return Err(AuthError::not_found("user does not exist"));
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Login failed: invalid password");
            track_login_failure("invalid_password");
            return Err(AuthError::unauthorized("invalid user credentials"));
        }

        Ok(user)
    }

    /// Mint a fresh pair for `user` and record the refresh token as current.
    ///
    /// Nothing is returned when the write fails.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn issue_tokens(
        users: &dyn UserDirectory,
        user: &User,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AuthError> {
        let tokens = mint_pair(user, jwt_config)?;

        users
            .set_refresh_token(user.id, Some(&tokens.refresh_token))
            .await
            .map_err(|e| AuthError::internal(anyhow!("failed to persist refresh token: {}", e)))?;

        track_tokens_issued("login");
        Ok(tokens)
    }

    #[instrument(skip_all)]
    pub async fn login(
        users: &dyn UserDirectory,
        dto: &LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AuthError> {
        let user = Self::authenticate(users, dto).await?;
        let tokens = Self::issue_tokens(users, &user, jwt_config).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        track_login_success();

        Ok(LoginResponse::new(user.to_public(), tokens))
    }

    /// Resolve the user behind an access token.
    #[instrument(skip_all)]
    pub async fn verify_access(
        users: &dyn UserDirectory,
        token: Option<&str>,
        jwt_config: &JwtConfig,
    ) -> Result<User, AuthError> {
        let token = present(token).ok_or_else(|| AuthError::unauthorized(UNAUTHORIZED_REQUEST))?;

        let claims = verify_access_token(token, jwt_config).map_err(|e| {
            track_access_validation(false);
            match e {
                TokenError::Expired => AuthError::invalid_token("access token has expired"),
                _ => AuthError::invalid_token(INVALID_ACCESS_TOKEN),
            }
        })?;

        let user_id: UserId = claims.sub.parse().map_err(|_| {
            track_access_validation(false);
            AuthError::invalid_token(INVALID_ACCESS_TOKEN)
        })?;

        let user = users
            .find_by_id(user_id)
            .await
            .map_err(directory_error)?
            .ok_or_else(|| {
                track_access_validation(false);
                AuthError::invalid_token(INVALID_ACCESS_TOKEN)
            })?;

        track_access_validation(true);
        Ok(user)
    }

    /// Exchange the current refresh token for a new pair.
    ///
    /// The stored token is replaced with a compare-and-swap, so of several
    /// concurrent rotations presenting the same token exactly one succeeds.
    #[instrument(skip_all)]
    pub async fn rotate_refresh_token(
        users: &dyn UserDirectory,
        presented: Option<&str>,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AuthError> {
        let presented =
            present(presented).ok_or_else(|| AuthError::unauthorized(UNAUTHORIZED_REQUEST))?;

        let claims = verify_refresh_token(presented, jwt_config).map_err(|e| {
            track_rotation("invalid");
            match e {
                TokenError::Expired => AuthError::invalid_token("refresh token has expired"),
                _ => AuthError::invalid_token(INVALID_REFRESH_TOKEN),
            }
        })?;

        let user_id: UserId = claims.sub.parse().map_err(|_| {
            track_rotation("invalid");
            AuthError::invalid_token(INVALID_REFRESH_TOKEN)
        })?;

        let Some(user) = users.find_by_id(user_id).await.map_err(directory_error)? else {
            track_rotation("invalid");
            return Err(AuthError::invalid_token(INVALID_REFRESH_TOKEN));
        };

        if user.refresh_token.as_deref() != Some(presented) {
            tracing::warn!(user_id = %user.id, "Refresh token replay rejected");
            track_rotation("replayed");
            return Err(AuthError::replayed_token(REFRESH_TOKEN_USED));
        }

        let tokens = mint_pair(&user, jwt_config)?;

        let swapped = users
            .swap_refresh_token(user.id, presented, &tokens.refresh_token)
            .await
            .map_err(|e| AuthError::internal(anyhow!("failed to rotate refresh token: {}", e)))?;

        if !swapped {
            tracing::warn!(user_id = %user.id, "Refresh token rotation lost a race");
            track_rotation("replayed");
            return Err(AuthError::replayed_token(REFRESH_TOKEN_USED));
        }

        track_rotation("rotated");
        track_tokens_issued("refresh");
        Ok(tokens)
    }

    /// Clear the stored refresh token. Issued access tokens stay valid until
    /// they expire.
    #[instrument(skip(users))]
    pub async fn logout(users: &dyn UserDirectory, user_id: UserId) -> Result<(), AuthError> {
        users
            .set_refresh_token(user_id, None)
            .await
            .map_err(directory_error)?;

        tracing::info!(user_id = %user_id, "User logged out");
        track_logout();
        Ok(())
    }

    /// Create a user from a registration form.
    ///
    /// Staged uploads belong to `form` and are removed when it drops, on
    /// success and on every error path.
    #[instrument(skip_all, fields(username = %form.username, email = %form.email))]
    pub async fn register(
        users: &dyn UserDirectory,
        media: &dyn MediaStore,
        form: RegisterForm,
    ) -> Result<PublicUser, AuthError> {
        let full_name = form.full_name.trim();
        let username = form.username.trim().to_lowercase();
        let email = form.email.trim().to_lowercase();

        // Passwords are taken as given, so only an empty one is missing.
        let missing: Vec<String> = [
            ("fullName", full_name),
            ("username", username.as_str()),
            ("email", email.as_str()),
            ("password", form.password.as_str()),
        ]
        .into_iter()
        .filter(|(field, value)| match *field {
            "password" => value.is_empty(),
            _ => value.trim().is_empty(),
        })
        .map(|(field, _)| format!("{} is required", field))
        .collect();

        if let Some(first) = missing.first() {
            return Err(AuthError::validation_with(first.clone(), missing));
        }

        if !email.contains('@') {
            return Err(AuthError::validation("valid email required"));
        }

        let Some(avatar) = form.avatar.as_ref() else {
            return Err(AuthError::validation("avatar is required"));
        };

        let existing = users
            .find_by_username_or_email(Some(username.as_str()), Some(email.as_str()))
            .await
            .map_err(directory_error)?;
        if existing.is_some() {
            return Err(AuthError::conflict(DUPLICATE_USER));
        }

        let avatar_url = media.upload(avatar.path()).await.map_err(|e| {
            tracing::warn!(error = %e, "Avatar upload failed");
            AuthError::validation("avatar upload failed")
        })?;

        let cover_image_url = match form.cover_image.as_ref() {
            Some(cover) => match media.upload(cover.path()).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(error = %e, "Cover image upload failed, continuing without it");
                    String::new()
                }
            },
            None => String::new(),
        };

        let started = Instant::now();
        let password_hash = hash_password(&form.password)?;
        track_password_hash_duration(started.elapsed().as_secs_f64());

        let created = users
            .create(NewUser {
                username,
                email,
                full_name: full_name.to_string(),
                avatar: avatar_url,
                cover_image: cover_image_url,
                password_hash,
            })
            .await
            .map_err(directory_error)?;

        let user = users
            .find_by_id(created.id)
            .await
            .map_err(directory_error)?
            .ok_or_else(|| {
                AuthError::internal(anyhow!("something went wrong while registering the user"))
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        track_user_registered();

        Ok(user.to_public())
    }
}
