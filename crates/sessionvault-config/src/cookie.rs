/// Attributes applied to the `accessToken` and `refreshToken` cookies.
///
/// Cookies are always `HttpOnly`. `Secure` defaults to on and can only be
/// switched off through `COOKIE_SECURE=false` for plain-HTTP local work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieConfig {
    pub secure: bool,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    pub fn from_env() -> Self {
        Self {
            secure: std::env::var("COOKIE_SECURE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
            ..Self::default()
        }
    }
}
