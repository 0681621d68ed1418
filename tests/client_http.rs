//! End-to-end client tests against a programmable HTTP backend.

mod common;

use std::sync::Arc;
use std::time::Duration;

use dashboard_client::api::{SignInRequest, UserStatus};
use dashboard_client::auth::{Credential, FileTokenStore, MemoryTokenStore, TokenStore};
use dashboard_client::http::RequestDescriptor;
use dashboard_client::{ErrorKind, SessionEvent};

use common::{closed_port, http_client, start_programmable_backend};

#[tokio::test]
async fn test_structured_validation_error() {
    let (addr, mut requests) = start_programmable_backend(|_req| async {
        (
            400,
            r#"{
                "error": "Bad Request",
                "errorCode": "VALIDATION_ERROR",
                "message": "Validation failed",
                "status": 400,
                "path": "/users",
                "validationErrors": [
                    {"field": "email", "message": "must be a well-formed email address"}
                ]
            }"#
            .to_string(),
        )
    })
    .await;

    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));
    let err = client
        .post("/users", &serde_json::json!({"email": "nope", "name": "X"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.status_code, Some(400));
    assert_eq!(err.human_message, "Validation failed");
    assert_eq!(err.error_code.as_deref(), Some("VALIDATION_ERROR"));
    assert_eq!(err.validation_details.len(), 1);
    assert_eq!(err.validation_details[0].field, "email");

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/users");
    assert_eq!(seen.header("x-frontend-request"), Some("integration-tests"));
    assert_eq!(seen.header("x-requested-with"), Some("XMLHttpRequest"));
    assert!(seen.header("x-request-id").is_some());
    assert_eq!(seen.header("authorization"), None);
    assert!(seen.body.contains("\"email\":\"nope\""));
}

#[tokio::test]
async fn test_sign_in_then_authorized_listing() {
    let (addr, mut requests) = start_programmable_backend(|req| async move {
        match (req.method.as_str(), req.path.as_str()) {
            ("POST", "/auth/login") => (
                200,
                r#"{"accessToken":"tok-abc","tokenType":"Bearer","user":{"id":"u-1","email":"ana@example.com","name":"Ana"}}"#
                    .to_string(),
            ),
            ("GET", "/users") => (
                200,
                r#"{"content":[{"id":"u-1","email":"ana@example.com","name":"Ana","status":"ACTIVE","roles":[]}],
                    "totalElements":1,"totalPages":1,"number":0,"size":20,"first":true,"last":true}"#
                    .to_string(),
            ),
            _ => (404, String::new()),
        }
    })
    .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = http_client(addr, tokens.clone());

    let response = client
        .auth()
        .sign_in(&SignInRequest {
            email: "ana@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.access_token, "tok-abc");
    assert_eq!(tokens.get().unwrap().as_str(), "tok-abc");

    let page = client.users().list().await.unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].status, Some(UserStatus::Active));

    let login = requests.recv().await.unwrap();
    assert_eq!(login.header("authorization"), None);
    assert!(login.body.contains("\"password\":\"secret\""));

    let listing = requests.recv().await.unwrap();
    assert_eq!(listing.header("authorization"), Some("Bearer tok-abc"));
}

#[tokio::test]
async fn test_unauthorized_clears_durable_credential() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = Arc::new(FileTokenStore::open(&path, "accessToken"));
    store.set(Credential::new("expired"));

    let (addr, _requests) = start_programmable_backend(|_req| async {
        (
            401,
            r#"{"error":"UNAUTHORIZED","message":"Token expired","status":401}"#.to_string(),
        )
    })
    .await;

    let client = http_client(addr, store.clone());
    let mut events = client.session_events();

    let err = client.get("/users").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert!(store.get().is_none());

    let reopened = FileTokenStore::open(&path, "accessToken");
    assert!(reopened.get().is_none());

    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        event,
        SessionEvent::SignInRequired {
            sign_in_path: "/auth/jwt/sign-in".into()
        }
    );
}

#[tokio::test]
async fn test_forbidden_keeps_credential() {
    let (addr, _requests) = start_programmable_backend(|_req| async {
        (403, "Access denied".to_string())
    })
    .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    tokens.set(Credential::new("still-good"));
    let client = http_client(addr, tokens.clone());

    let err = client.delete("/roles/r-1").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert_eq!(err.status_code, Some(403));
    assert!(tokens.get().is_some());
}

#[tokio::test]
async fn test_server_fault_without_body() {
    let (addr, _requests) = start_programmable_backend(|_req| async {
        (502, String::new())
    })
    .await;

    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));
    let err = client.get("/actuator/health").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::ServerFault);
    assert_eq!(err.status_code, Some(502));
    assert!(!err.human_message.is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_network() {
    let addr = closed_port().await;
    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));

    let err = client.get("/users").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.status_code, None);
}

#[tokio::test]
async fn test_slow_backend_times_out_as_network() {
    let (addr, _requests) = start_programmable_backend(|_req| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, "{}".to_string())
    })
    .await;

    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));
    let request = RequestDescriptor::get("/users").with_timeout(Duration::from_millis(200));

    let err = client.send(request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}

#[tokio::test]
async fn test_delete_with_empty_body() {
    let (addr, mut requests) = start_programmable_backend(|_req| async {
        (204, String::new())
    })
    .await;

    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));
    client.users().delete("u-42").await.unwrap();

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.path, "/users/u-42");
}

#[tokio::test]
async fn test_refresh_not_implemented_keeps_token() {
    let (addr, _requests) = start_programmable_backend(|_req| async {
        (
            501,
            r#"{"error":"NOT_IMPLEMENTED","message":"Token refresh is not implemented yet","status":501}"#
                .to_string(),
        )
    })
    .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    tokens.set(Credential::new("current"));
    let client = http_client(addr, tokens.clone());

    let err = client.auth().refresh().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServerFault);
    assert_eq!(err.status_code, Some(501));
    assert_eq!(err.human_message, "Token refresh is not implemented yet");
    assert_eq!(tokens.get().unwrap().as_str(), "current");
}

#[tokio::test]
async fn test_sign_out_clears_even_when_backend_fails() {
    let (addr, mut requests) = start_programmable_backend(|_req| async {
        (500, String::new())
    })
    .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    tokens.set(Credential::new("bye"));
    let client = http_client(addr, tokens.clone());

    client.auth().sign_out().await;
    assert!(tokens.get().is_none());

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.path, "/auth/logout");
    assert_eq!(seen.header("authorization"), Some("Bearer bye"));
}

#[tokio::test]
async fn test_set_status_sends_query_parameter() {
    let (addr, mut requests) = start_programmable_backend(|_req| async {
        (
            200,
            r#"{"id":"u-1","email":"ana@example.com","name":"Ana","status":"SUSPENDED","roles":[]}"#
                .to_string(),
        )
    })
    .await;

    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));
    let user = client
        .users()
        .set_status("u-1", UserStatus::Suspended)
        .await
        .unwrap();
    assert_eq!(user.status, Some(UserStatus::Suspended));

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "PATCH");
    assert_eq!(seen.path, "/users/u-1/status?status=SUSPENDED");
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn test_id_with_separators_stays_on_user_resource() {
    let (addr, mut requests) = start_programmable_backend(|_req| async {
        (204, String::new())
    })
    .await;

    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));
    client.users().delete("../roles/r-9").await.unwrap();

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.path, "/users/..%2Froles%2Fr-9");

    let err = client.users().delete("..").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unknown);
}

#[tokio::test]
async fn test_connectivity_rejection_counts_as_reachable() {
    let (addr, mut requests) = start_programmable_backend(|_req| async {
        (
            400,
            r#"{"error":"Bad Request","message":"Validation failed","status":400,
                "validationErrors":[{"field":"email","message":"must not be blank"}]}"#
                .to_string(),
        )
    })
    .await;

    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));
    let report = client.check_connectivity().await;

    assert!(report.reachable);
    assert_eq!(report.status_code, Some(400));
    assert_eq!(report.base_url, format!("http://{}", addr));
    assert_eq!(report.client_name, "integration-tests");
    assert!(!report.authenticated);
    assert_eq!(report.error.map(|e| e.kind), Some(ErrorKind::Validation));

    let seen = requests.recv().await.unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/auth/register");
    assert_eq!(seen.body, "{}");
}

#[tokio::test]
async fn test_connectivity_without_backend() {
    let addr = closed_port().await;
    let client = http_client(addr, Arc::new(MemoryTokenStore::new()));

    let report = client.check_connectivity().await;
    assert!(!report.reachable);
    assert_eq!(report.status_code, None);
    assert_eq!(report.error.map(|e| e.kind), Some(ErrorKind::Network));
}
