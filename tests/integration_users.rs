mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sessionvault_db::UserDirectory;

use common::{Part, create_test_user, file_count, multipart_request, read_json, setup_test_app};

const REGISTER: &str = "/api/v1/users/register";

fn register_parts<'a>(username: &'a str, email: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("username", username),
        Part::Text("email", email),
        Part::Text("fullName", "Bob Builder"),
        Part::Text("password", "hunter22"),
        Part::File("avatar", "avatar.png", b"fake-png-bytes"),
    ]
}

#[tokio::test]
async fn test_register_success() {
    let app = setup_test_app();

    let mut parts = register_parts("Bob", "Bob@Example.com");
    parts.push(Part::File("coverImage", "cover.jpg", b"fake-jpg-bytes"));
    let response = app.send(multipart_request(REGISTER, &parts)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["data"]["username"], "bob");
    assert_eq!(body["data"]["email"], "bob@example.com");
    assert_eq!(body["data"]["fullName"], "Bob Builder");
    assert!(
        body["data"]["avatar"]
            .as_str()
            .unwrap()
            .starts_with("http://cdn.test/media/")
    );
    assert!(
        body["data"]["coverImage"]
            .as_str()
            .unwrap()
            .starts_with("http://cdn.test/media/")
    );
    assert!(body["data"].get("passwordHash").is_none());

    assert_eq!(app.users.len().await, 1);
    assert_eq!(file_count(&app.media_dir()), 2);
    assert_eq!(file_count(&app.staging_dir()), 0);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = setup_test_app();

    let response = app
        .send(multipart_request(
            REGISTER,
            &register_parts("bob", "bob-example.com"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "valid email required");

    assert!(app.users.is_empty().await);
    assert_eq!(file_count(&app.staging_dir()), 0);
    assert_eq!(file_count(&app.media_dir()), 0);
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = setup_test_app();

    let parts = vec![
        Part::Text("username", "bob"),
        Part::Text("email", "bob@example.com"),
        Part::Text("password", "hunter22"),
        Part::File("avatar", "avatar.png", b"fake-png-bytes"),
    ];
    let response = app.send(multipart_request(REGISTER, &parts)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "fullName is required");
    assert_eq!(file_count(&app.staging_dir()), 0);
}

#[tokio::test]
async fn test_register_missing_avatar() {
    let app = setup_test_app();

    let parts = vec![
        Part::Text("username", "bob"),
        Part::Text("email", "bob@example.com"),
        Part::Text("fullName", "Bob Builder"),
        Part::Text("password", "hunter22"),
    ];
    let response = app.send(multipart_request(REGISTER, &parts)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "avatar is required");
    assert!(app.users.is_empty().await);
}

#[tokio::test]
async fn test_register_duplicate() {
    let app = setup_test_app();
    let alice = create_test_user(&app.users, "alice", "wonderland").await;

    let mut parts = register_parts("ALICE", "fresh@example.com");
    parts.push(Part::File("coverImage", "cover.jpg", b"fake-jpg-bytes"));
    let response = app.send(multipart_request(REGISTER, &parts)).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await;
    assert_eq!(
        body["message"],
        "user with this email or username already exists"
    );

    assert_eq!(app.users.len().await, 1);
    assert!(app.users.find_by_id(alice.id).await.unwrap().is_some());
    assert_eq!(file_count(&app.staging_dir()), 0);
    assert_eq!(file_count(&app.media_dir()), 0);
}

#[tokio::test]
async fn test_uploaded_avatar_is_served() {
    let app = setup_test_app();

    let response = app
        .send(multipart_request(
            REGISTER,
            &register_parts("bob", "bob@example.com"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;

    let avatar_url = body["data"]["avatar"].as_str().unwrap();
    let path = avatar_url.strip_prefix("http://cdn.test").unwrap();
    assert!(path.starts_with("/media/"));

    let response = app
        .send(Request::get(path).body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fake-png-bytes");
}

#[tokio::test]
async fn test_unknown_media_is_not_found() {
    let app = setup_test_app();

    let response = app
        .send(Request::get("/media/missing.png").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registered_user_can_log_in() {
    let app = setup_test_app();

    let response = app
        .send(multipart_request(
            REGISTER,
            &register_parts("bob", "bob@example.com"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .send(common::json_request(
            "POST",
            "/api/v1/users/login",
            serde_json::json!({ "email": "bob@example.com", "password": "hunter22" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
