mod common;

use common::InMemoryUserRepository;
use common::TestApp;
use identity_service::domain::user::models::EmailAddress;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserId;
use identity_service::domain::user::models::Username;
use identity_service::domain::user::ports::UserRepository;
use identity_service::user::errors::UserError;
use reqwest::StatusCode;
use serde_json::json;

fn ana() -> serde_json::Value {
    json!({
        "userId": 1,
        "name": "Ana",
        "lastName": "García",
        "userName": "ana",
        "password": "secret123",
        "email": "ana@example.com",
        "phoneNumber": 5551234
    })
}

#[tokio::test]
async fn test_create_user_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/users/1")
    );

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["userId"], 1);
    assert_eq!(body["user"]["userName"], "ana");
    assert_eq!(body["user"]["email"], "ana@example.com");

    // The public view has no password field at all, not even null
    assert!(body["user"].get("password").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_create_user_duplicate_id_leaves_original_unmodified() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let mut duplicate = ana();
    duplicate["name"] = json!("Impostora");
    duplicate["userName"] = json!("ana2");
    let response = app
        .post("/users")
        .json(&duplicate)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    // Original record is untouched
    let original: serde_json::Value = app
        .get("/users/1")
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(original["name"], "Ana");
    assert_eq!(original["userName"], "ana");
}

#[tokio::test]
async fn test_create_user_duplicate_username() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let mut duplicate = ana();
    duplicate["userId"] = json!(2);
    let response = app
        .post("/users")
        .json(&duplicate)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_invalid_fields() {
    let app = TestApp::spawn().await;

    let mut empty_name = ana();
    empty_name["name"] = json!("");
    let response = app
        .post("/users")
        .json(&empty_name)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);

    let mut bad_email = ana();
    bad_email["email"] = json!("not-an-email");
    let response = app
        .post("/users")
        .json(&bad_email)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut long_password = ana();
    long_password["password"] = json!("x".repeat(201));
    let response = app
        .post("/users")
        .json(&long_password)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/users")
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_returns_hash_never_plaintext() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .get("/users/1")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["userId"], 1);
    let password = body["password"].as_str().unwrap();
    assert_ne!(password, "secret123");
    assert!(password.starts_with("$argon2"));
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/users/42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let mut second = ana();
    second["userId"] = json!(2);
    second["userName"] = json!("berta");
    app.post("/users")
        .json(&second)
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .get("/users")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["userId"], 1);
    assert_eq!(users[1]["userId"], 2);
}

#[tokio::test]
async fn test_login_success_issues_signed_token() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post("/auth/login")
        .json(&json!({"userName": "ana", "password": "secret123"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());

    let claims = app.token_issuer.decode(token).expect("Token should verify");
    assert_eq!(claims.sub, "ana");
    assert_eq!(claims.name, "Ana");
    assert_eq!(claims.exp - claims.iat, 120 * 60);
}

#[tokio::test]
async fn test_two_logins_have_distinct_token_ids() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let credentials = json!({"userName": "ana", "password": "secret123"});
    let mut token_ids = Vec::new();
    for _ in 0..2 {
        let body: serde_json::Value = app
            .post("/auth/login")
            .json(&credentials)
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response");
        let claims = app
            .token_issuer
            .decode(body["token"].as_str().unwrap())
            .expect("Token should verify");
        token_ids.push(claims.jti);
    }

    assert_ne!(token_ids[0], token_ids[1]);
}

#[tokio::test]
async fn test_login_unknown_user_and_wrong_password_look_identical() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let unknown = app
        .post("/auth/login")
        .json(&json!({"userName": "nobody", "password": "secret123"}))
        .send()
        .await
        .expect("Failed to execute request");
    let unknown_status = unknown.status();
    let unknown_body: serde_json::Value = unknown.json().await.expect("Failed to parse response");

    let mismatch = app
        .post("/auth/login")
        .json(&json!({"userName": "ana", "password": "wrong"}))
        .send()
        .await
        .expect("Failed to execute request");
    let mismatch_status = mismatch.status();
    let mismatch_body: serde_json::Value = mismatch.json().await.expect("Failed to parse response");

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(mismatch_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body, mismatch_body);
}

#[tokio::test]
async fn test_update_user_success() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let mut updated = ana();
    updated["name"] = json!("Ana María");
    updated["password"] = json!("newsecret");
    let response = app
        .put("/users/1")
        .json(&updated)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body: serde_json::Value = app
        .get("/users/1")
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["name"], "Ana María");

    // The replacement password works for login; the old one no longer does
    let new_login = app
        .post("/auth/login")
        .json(&json!({"userName": "ana", "password": "newsecret"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(new_login.status(), StatusCode::OK);

    let old_login = app
        .post("/auth/login")
        .json(&json!({"userName": "ana", "password": "secret123"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_user_id_mismatch_performs_no_mutation() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let mut renamed = ana();
    renamed["name"] = json!("Ana María");
    let response = app
        .put("/users/2")
        .json(&renamed)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Mismatched user ID");

    let original: serde_json::Value = app
        .get("/users/1")
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(original["name"], "Ana");
}

#[tokio::test]
async fn test_update_user_not_found() {
    let app = TestApp::spawn().await;

    let mut body = ana();
    body["userId"] = json!(42);
    let response = app
        .put("/users/42")
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// Two writers read the same record; only the first commit lands, the
// second is rejected by the version guard instead of overwriting it.
#[tokio::test]
async fn test_stale_version_update_is_rejected_not_last_writer_wins() {
    let repository = InMemoryUserRepository::new();

    let user = User {
        id: UserId(1),
        name: "Ana".to_string(),
        last_name: "García".to_string(),
        username: Username::new("ana".to_string()).unwrap(),
        password_hash: "$argon2id$test_hash".to_string(),
        email: EmailAddress::new("ana@example.com".to_string()).unwrap(),
        phone_number: 5551234,
        version: 0,
    };
    repository.create(user.clone()).await.unwrap();

    // First writer commits and bumps the version
    let mut first = user.clone();
    first.name = "Ana María".to_string();
    let committed = repository.update(first, 0).await.unwrap();
    assert_eq!(committed.version, 1);

    // Second writer still holds version 0; its write must fail
    let mut second = user.clone();
    second.name = "Impostora".to_string();
    let result = repository.update(second, 0).await;
    assert!(matches!(
        result.unwrap_err(),
        UserError::ConcurrentModification(1)
    ));

    // The losing write left no trace
    let stored = repository.find_by_id(UserId(1)).await.unwrap().unwrap();
    assert_eq!(stored.name, "Ana María");
    assert_eq!(stored.version, 1);

    // A retry carrying the current version goes through
    let mut retry = stored.clone();
    retry.name = "Ana M. García".to_string();
    let committed = repository.update(retry, 1).await.unwrap();
    assert_eq!(committed.version, 2);
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::spawn().await;

    app.post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .delete("/users/1")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get("/users/1")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .delete("/users/42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// End-to-end happy path: create an account, then log in with the right and
// the wrong password.
#[tokio::test]
async fn test_create_and_login_scenario() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/users")
        .json(&ana())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["userId"], 1);
    assert!(body["user"].get("password").is_none());

    let response = app
        .post("/auth/login")
        .json(&json!({"userName": "ana", "password": "secret123"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(!body["token"].as_str().unwrap().is_empty());

    let response = app
        .post("/auth/login")
        .json(&json!({"userName": "ana", "password": "wrong"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
