#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use sessionvault::router::init_router;
use sessionvault::state::AppState;
use sessionvault_config::{CookieConfig, CorsConfig, JwtConfig, UploadConfig};
use sessionvault_core::LocalMediaStore;
use sessionvault_db::{InMemoryUserDirectory, UserDirectory};
use sessionvault_models::{NewUser, User};
use uuid::Uuid;

pub const BOUNDARY: &str = "sessionvault-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserDirectory>,
    pub jwt_config: JwtConfig,
    pub root: PathBuf,
}

impl TestApp {
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.router.clone().oneshot(request).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret-at-least-32-characters".to_string(),
        access_token_expiry: 900,
        refresh_secret: "test-refresh-secret-at-least-32-characters".to_string(),
        refresh_token_expiry: 864000,
    }
}

pub fn setup_test_app() -> TestApp {
    let root = std::env::temp_dir().join(format!("sessionvault-it-{}", Uuid::new_v4()));
    let users = Arc::new(InMemoryUserDirectory::new());
    let upload_config = UploadConfig {
        staging_dir: root.join("temp"),
        media_dir: root.join("media"),
        media_base_url: "http://cdn.test/media".to_string(),
        max_file_size: 1024 * 1024,
    };
    let media = Arc::new(LocalMediaStore::with_max_size(
        upload_config.media_dir.clone(),
        upload_config.media_base_url.clone(),
        upload_config.max_file_size,
    ));
    let jwt_config = test_jwt_config();

    let state = AppState {
        users: users.clone(),
        media,
        jwt_config: jwt_config.clone(),
        cookie_config: CookieConfig::default(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        upload_config,
    };

    TestApp {
        router: init_router(state),
        users,
        jwt_config,
        root,
    }
}

/// Insert a user directly, hashing with a low bcrypt cost to keep tests fast.
pub async fn create_test_user(users: &InMemoryUserDirectory, username: &str, password: &str) -> User {
    users
        .create(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            full_name: format!("{} Test", username),
            avatar: "http://cdn.test/media/avatar.png".to_string(),
            cover_image: String::new(),
            password_hash: bcrypt::hash(password, 4).unwrap(),
        })
        .await
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn set_cookie_headers(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_owned)
        .collect()
}

/// Value of the named cookie from the response's `Set-Cookie` headers.
pub fn cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookie_headers(response).into_iter().find_map(|c| {
        c.strip_prefix(&prefix)
            .map(|rest| rest.split(';').next().unwrap_or_default().to_string())
    })
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
