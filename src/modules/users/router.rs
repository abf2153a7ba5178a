use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

use super::controller::{
    get_current_user, login_user, logout_user, refresh_access_token, register_user,
};

pub fn init_users_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout_user))
        .route("/current-user", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route(
            "/register",
            post(register_user).layer(DefaultBodyLimit::max(
                state.upload_config.max_request_bytes(),
            )),
        )
        .route("/login", post(login_user))
        .route("/refresh-token", post(refresh_access_token))
        .merge(protected)
}
