use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use tracing::instrument;
use utoipa::ToSchema;

use sessionvault_config::CookieConfig;
use sessionvault_core::{ApiResponse, AppError, AuthError, StagedFile};
use sessionvault_models::{
    LoginRequest, LoginResponse, PublicUser, RefreshTokenRequest, RegisterForm, RegisterUpload,
    TokenPair,
};

use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, AuthUser, REFRESH_TOKEN_COOKIE};
use crate::state::AppState;
use crate::validator::JsonBody;

use super::service::AuthService;

/// Uniform error body.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
}

fn token_cookie(name: &'static str, value: String, config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(config.secure)
        .path(config.path.clone())
        .build()
}

fn with_token_cookies(jar: CookieJar, tokens: &TokenPair, config: &CookieConfig) -> CookieJar {
    jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        config,
    ))
    .add(token_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        config,
    ))
}

/// Expire both token cookies. Added explicitly so the `Set-Cookie` headers go
/// out even when the request authenticated with a bearer header.
fn without_token_cookies(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE]
        .into_iter()
        .fold(jar, |jar, name| {
            let mut cookie = token_cookie(name, String::new(), config);
            cookie.make_removal();
            jar.add(cookie)
        })
}

async fn read_register_form(
    mut multipart: Multipart,
    state: &AppState,
) -> Result<RegisterForm, AppError> {
    let mut form = RegisterForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AuthError::validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "avatar" | "coverImage" => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AuthError::validation(format!("Invalid upload: {}", e)))?;
                if bytes.is_empty() {
                    continue;
                }

                let staged = StagedFile::stage(
                    &state.upload_config.staging_dir,
                    file_name.as_deref(),
                    &bytes,
                )
                .await
                .map_err(AuthError::internal)?;

                if name == "avatar" {
                    form.avatar = Some(staged);
                } else {
                    form.cover_image = Some(staged);
                }
            }
            "username" | "email" | "fullName" | "password" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AuthError::validation(format!("Invalid field {}: {}", name, e)))?;
                match name.as_str() {
                    "username" => form.username = value,
                    "email" => form.email = value,
                    "fullName" => form.full_name = value,
                    _ => form.password = value,
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body(content = RegisterUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User registered successfully", body = PublicUser),
        (status = 400, description = "Missing field, invalid email, missing avatar or upload failure", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiResponse<PublicUser>, AppError> {
    let form = read_register_form(multipart, &state).await?;
    let user = AuthService::register(state.users.as_ref(), state.media.as_ref(), form).await?;

    Ok(ApiResponse::created(user, "User registered successfully"))
}

/// Log in with username or email and receive an access/refresh pair
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token cookies set", body = LoginResponse),
        (status = 400, description = "Missing identifier or password", body = ErrorResponse),
        (status = 401, description = "Invalid user credentials", body = ErrorResponse),
        (status = 404, description = "User does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(dto): JsonBody<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<LoginResponse>), AppError> {
    let response = AuthService::login(state.users.as_ref(), &dto, &state.jwt_config).await?;

    let tokens = TokenPair {
        access_token: response.access_token.clone(),
        refresh_token: response.refresh_token.clone(),
    };
    let jar = with_token_cookies(jar, &tokens, &state.cookie_config);

    Ok((
        jar,
        ApiResponse::ok(response, "User logged in successfully"),
    ))
}

/// Exchange the current refresh token for a new pair
#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    request_body(content = RefreshTokenRequest, description = "Used only when no refreshToken cookie is sent"),
    responses(
        (status = 201, description = "Tokens rotated, token cookies set", body = TokenPair),
        (status = 401, description = "Missing, invalid, expired or already used refresh token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn refresh_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, ApiResponse<TokenPair>), AppError> {
    let from_cookie = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.trim().is_empty());

    let presented = match from_cookie {
        Some(token) => Some(token),
        None if body.is_empty() => None,
        None => serde_json::from_slice::<RefreshTokenRequest>(&body)
            .ok()
            .and_then(|req| req.refresh_token),
    };

    let tokens = AuthService::rotate_refresh_token(
        state.users.as_ref(),
        presented.as_deref(),
        &state.jwt_config,
    )
    .await?;

    let jar = with_token_cookies(jar, &tokens, &state.cookie_config);

    Ok((
        jar,
        ApiResponse::new(StatusCode::CREATED, tokens, "Access token refreshed"),
    ))
}

/// Log out: clear the stored refresh token and both cookies
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses(
        (status = 200, description = "User logged out"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id()))]
pub async fn logout_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<()>), AppError> {
    AuthService::logout(state.users.as_ref(), auth_user.user_id()).await?;

    let jar = without_token_cookies(jar, &state.cookie_config);
    Ok((jar, ApiResponse::ok((), "User logged out")))
}

/// The authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    responses(
        (status = 200, description = "Current user fetched", body = PublicUser),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_current_user(AuthUser(user): AuthUser) -> ApiResponse<PublicUser> {
    ApiResponse::ok(user, "Current user fetched successfully")
}
