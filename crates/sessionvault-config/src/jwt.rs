use std::env;

/// Secrets and lifetimes for access and refresh tokens.
///
/// The two token classes are signed with different secrets so that a leaked
/// access key cannot be used to mint refresh tokens, and the reverse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JwtConfig {
    pub access_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    pub refresh_secret: String,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    /// Load from `ACCESS_TOKEN_SECRET`, `ACCESS_TOKEN_EXPIRY`,
    /// `REFRESH_TOKEN_SECRET` and `REFRESH_TOKEN_EXPIRY`.
    pub fn from_env() -> Self {
        Self {
            access_secret: env::var("ACCESS_TOKEN_SECRET")
                .unwrap_or_else(|_| "access-secret-change-in-production".to_string()),
            access_token_expiry: crate::env_or("ACCESS_TOKEN_EXPIRY", 900), // 15 minutes
            refresh_secret: env::var("REFRESH_TOKEN_SECRET")
                .unwrap_or_else(|_| "refresh-secret-change-in-production".to_string()),
            refresh_token_expiry: crate::env_or("REFRESH_TOKEN_EXPIRY", 864000), // 10 days
        }
    }

    /// Reject configurations that would let one token class stand in for the other.
    pub fn validate(&self) -> Result<(), String> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err("token secrets must not be empty".to_string());
        }
        if self.access_secret == self.refresh_secret {
            return Err("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ".to_string());
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err("token expiries must be positive".to_string());
        }
        if self.refresh_token_expiry <= self.access_token_expiry {
            return Err("refresh tokens must outlive access tokens".to_string());
        }
        Ok(())
    }
}
