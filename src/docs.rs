use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use sessionvault_models::{
    LoginRequest, LoginResponse, PublicUser, RefreshTokenRequest, RegisterUpload, TokenPair,
    UserId,
};

use crate::modules::users::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::register_user,
        crate::modules::users::controller::login_user,
        crate::modules::users::controller::refresh_access_token,
        crate::modules::users::controller::logout_user,
        crate::modules::users::controller::get_current_user,
    ),
    components(
        schemas(
            UserId,
            PublicUser,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            RegisterUpload,
            TokenPair,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and session token endpoints")
    ),
    info(
        title = "SessionVault API",
        version = "0.1.0",
        description = "Credential-based session management with rotating refresh tokens.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("accessToken"))),
            );
        }
    }
}
