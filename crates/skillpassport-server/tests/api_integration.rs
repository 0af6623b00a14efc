//! Integration tests for the passport API.
//!
//! These drive the full router over the in-memory store, so no database
//! is needed.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use skillpassport_chain::CredentialSubject;
use skillpassport_server::auth::{RoleCapabilities, SesskeyIssuer, SESSKEY_HEADER, USER_ID_HEADER};
use skillpassport_server::directory::StaticDirectory;
use skillpassport_server::store::MemoryStore;
use skillpassport_server::{create_router, AppState, PassportSettings};
use tower::ServiceExt;

const MANAGER: i64 = 1;
const TEACHER: i64 = 2;
const LEARNER: i64 = 3;
const OTHER_LEARNER: i64 = 4;

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

fn test_app(settings: PassportSettings) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let directory = StaticDirectory::new()
        .with_user(MANAGER, "Mary Manager")
        .with_user(TEACHER, "Tom Teacher")
        .with_user(LEARNER, "Ada Lovelace")
        .with_user(OTHER_LEARNER, "Alan Turing")
        .with_subject(CredentialSubject::Course(10), "Rust Fundamentals")
        .with_subject(CredentialSubject::Activity(20), "Ownership Quiz")
        .with_subject(CredentialSubject::Badge(42), "Borrow Checker Tamer");
    let state = AppState::new(
        store.clone(),
        Arc::new(directory),
        Arc::new(RoleCapabilities::new([MANAGER], [TEACHER])),
        SesskeyIssuer::new("integration-test-secret").expect("valid secret"),
        settings,
    );
    TestApp {
        router: create_router(state),
        store,
    }
}

/// Helper to parse JSON response body.
async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Failed to parse JSON response")
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<i64>,
        sesskey: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        if let Some(sesskey) = sesskey {
            builder = builder.header(SESSKEY_HEADER, sesskey);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    async fn sesskey(&self, user: i64) -> String {
        let (status, body) = self
            .send(Method::GET, "/api/v1/session/sesskey", Some(user), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body["sesskey"].as_str().unwrap().to_string()
    }

    async fn issue(&self, user: i64, form: Value) -> (StatusCode, Value) {
        let sesskey = self.sesskey(user).await;
        self.send(Method::POST, "/api/v1/credentials", Some(user), Some(&sesskey), Some(form))
            .await
    }

    async fn mint(&self, user: i64, credential_id: i64) -> (StatusCode, Value) {
        let sesskey = self.sesskey(user).await;
        let uri = format!("/api/v1/credentials/{}/nft", credential_id);
        self.send(Method::POST, &uri, Some(user), Some(&sesskey), None).await
    }
}

#[tokio::test]
async fn test_health() {
    let app = test_app(PassportSettings::default());
    let (status, body) = app.send(Method::GET, "/api/v1/health", None, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

/// Issue a badge without a hash, then mint an NFT for it.
#[tokio::test]
async fn test_issue_then_mint_badge() {
    let app = test_app(PassportSettings::default());

    let (status, credential) = app
        .issue(
            TEACHER,
            json!({"userid": LEARNER, "credentialtype": "badge", "badgeid": 42, "courseid": 10}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", credential);
    assert_eq!(credential["user_id"], LEARNER);
    assert_eq!(credential["subject"], json!({"kind": "badge", "id": 42}));
    let hash = credential["blockchain_txhash"].as_str().unwrap();
    assert!(hash.starts_with("0x"));
    assert_eq!(hash.len(), 66);

    let credential_id = credential["id"].as_i64().unwrap();
    let (status, nft) = app.mint(TEACHER, credential_id).await;
    assert_eq!(status, StatusCode::CREATED, "{}", nft);
    assert_eq!(nft["credential_id"], credential_id);
    assert!(nft["token_id"].as_str().unwrap().starts_with("DEMO_TOKEN_"));
    assert_eq!(nft["contract_address"], "0xDEMO_CONTRACT_ADDRESS");
    let name = nft["nft_metadata"]["name"].as_str().unwrap();
    assert!(name.contains("Borrow Checker Tamer"));
    assert!(name.contains("Ada Lovelace"));

    let nft_id = nft["id"].as_i64().unwrap();
    let (status, view) = app
        .send(Method::GET, &format!("/api/v1/nfts/{}", nft_id), Some(LEARNER), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["tokenId"], nft["token_id"]);
    assert!(view["metadataPretty"].as_str().unwrap().contains("\n  \"name\""));
}

#[tokio::test]
async fn test_supplied_hash_is_kept() {
    let app = test_app(PassportSettings::default());
    let (status, credential) = app
        .issue(
            MANAGER,
            json!({"userid": LEARNER, "credentialtype": "course", "courseid": 10,
                   "blockchain_txhash": "0xfeedbeef"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(credential["blockchain_txhash"], "0xfeedbeef");
}

#[tokio::test]
async fn test_issue_validation_errors() {
    let app = test_app(PassportSettings::default());

    let (status, body) = app
        .issue(TEACHER, json!({"userid": LEARNER, "credentialtype": "activity", "courseid": 10}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing activity ID.");

    let (status, body) = app
        .issue(TEACHER, json!({"userid": LEARNER, "credentialtype": "diploma", "courseid": 10}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid credential type.");

    let (status, body) = app.issue(TEACHER, json!({"credentialtype": "badge", "badgeid": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing user ID or credential type.");

    assert_eq!(app.store.credential_count(), 0);
}

#[tokio::test]
async fn test_writes_require_capability_and_sesskey() {
    let app = test_app(PassportSettings::default());
    let form = json!({"userid": LEARNER, "credentialtype": "badge", "badgeid": 42});

    let (status, _) = app
        .send(Method::POST, "/api/v1/credentials", None, None, Some(form.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.issue(LEARNER, form.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::POST, "/api/v1/credentials", Some(TEACHER), None, Some(form.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid sesskey");

    // Someone else's token does not work either.
    let stolen = app.sesskey(MANAGER).await;
    let (status, _) = app
        .send(Method::POST, "/api/v1/credentials", Some(TEACHER), Some(&stolen), Some(form))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.store.credential_count(), 0);
}

#[tokio::test]
async fn test_mint_unknown_credential() {
    let app = test_app(PassportSettings::default());
    let (status, body) = app.mint(TEACHER, 999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Credential not found.");
}

/// Minting twice is allowed and yields two records; the passport shows the first.
#[tokio::test]
async fn test_duplicate_mint_creates_second_record() {
    let app = test_app(PassportSettings::default());
    let (_, credential) = app
        .issue(TEACHER, json!({"userid": LEARNER, "credentialtype": "badge", "badgeid": 42}))
        .await;
    let credential_id = credential["id"].as_i64().unwrap();

    let (_, first) = app.mint(TEACHER, credential_id).await;
    let (status, second) = app.mint(TEACHER, credential_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(first["id"], second["id"]);
    assert_eq!(app.store.nft_count(), 2);

    let (_, passport) = app
        .send(Method::GET, "/api/v1/passport", Some(LEARNER), None, None)
        .await;
    assert_eq!(passport["credentials"][0]["nftId"], first["id"]);
}

#[tokio::test]
async fn test_passport_filters_and_access() {
    let settings = PassportSettings {
        show_course_completions: false,
        ..PassportSettings::default()
    };
    let app = test_app(settings);
    for form in [
        json!({"userid": LEARNER, "credentialtype": "course", "courseid": 10}),
        json!({"userid": LEARNER, "credentialtype": "activity", "cmid": 20}),
        json!({"userid": LEARNER, "credentialtype": "badge", "badgeid": 42}),
    ] {
        let (status, _) = app.issue(TEACHER, form).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, passport) = app
        .send(Method::GET, "/api/v1/passport", Some(LEARNER), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(passport["username"], "Ada Lovelace");
    assert_eq!(passport["hasCredentials"], true);
    assert_eq!(passport["canIssue"], false);
    let kinds: Vec<&str> = passport["credentials"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds.len(), 2);
    assert!(!kinds.contains(&"course"));
    let entry = &passport["credentials"][0];
    assert!(entry["verifyUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://sepolia.etherscan.io/tx/0x"));
    assert_eq!(entry["hasNft"], false);

    let uri = format!("/api/v1/passport?userid={}", LEARNER);
    let (status, _) = app.send(Method::GET, &uri, Some(OTHER_LEARNER), None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, passport) = app.send(Method::GET, &uri, Some(MANAGER), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(passport["userId"], LEARNER);
    assert_eq!(passport["canIssue"], true);

    let (status, _) = app.send(Method::GET, "/api/v1/passport", None, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_nft_view_not_found() {
    let app = test_app(PassportSettings::default());
    let (status, body) = app
        .send(Method::GET, "/api/v1/nfts/77", Some(LEARNER), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NFT not found.");
}

#[tokio::test]
async fn test_privacy_export_and_erasure() {
    let app = test_app(PassportSettings::default());
    let (_, course) = app
        .issue(TEACHER, json!({"userid": LEARNER, "credentialtype": "course", "courseid": 10}))
        .await;
    let (_, badge) = app
        .issue(TEACHER, json!({"userid": LEARNER, "credentialtype": "badge", "badgeid": 42}))
        .await;
    app.mint(TEACHER, badge["id"].as_i64().unwrap()).await;
    app.issue(TEACHER, json!({"userid": OTHER_LEARNER, "credentialtype": "badge", "badgeid": 42}))
        .await;

    let uri = format!("/api/v1/privacy/users/{}?scope=system", LEARNER);

    let (status, _) = app.send(Method::GET, &uri, Some(TEACHER), None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, export) = app.send(Method::GET, &uri, Some(MANAGER), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["contexts"], json!(["system"]));
    let course_key = format!("credentials_{}", course["id"]);
    let badge_key = format!("credentials_{}", badge["id"]);
    assert_eq!(export["credentials"][&course_key]["course"], "Rust Fundamentals");
    assert!(export["credentials"][&badge_key]["nft_data"]["tokenid"].is_string());

    let course_scope = format!("/api/v1/privacy/users/{}?scope=course:10", LEARNER);
    let (status, body) = app.send(Method::GET, &course_scope, Some(MANAGER), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Non-system context encountered during data export/deletion.");

    let (status, _) = app.send(Method::DELETE, &uri, Some(MANAGER), None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let sesskey = app.sesskey(MANAGER).await;
    let (status, body) = app
        .send(Method::DELETE, &uri, Some(MANAGER), Some(&sesskey), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!({"credentials": 2, "nfts": 1}));
    assert_eq!(app.store.credential_count(), 1);
    assert_eq!(app.store.nft_count(), 0);

    // Erasing again is a successful no-op.
    let (status, body) = app
        .send(Method::DELETE, &uri, Some(MANAGER), Some(&sesskey), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!({"credentials": 0, "nfts": 0}));

    let (_, export) = app.send(Method::GET, &uri, Some(MANAGER), None, None).await;
    assert_eq!(export["contexts"], json!([]));
}

#[tokio::test]
async fn test_issue_rejects_unknown_learner_and_long_hash() {
    let app = test_app(PassportSettings::default());

    let (status, body) = app
        .issue(TEACHER, json!({"userid": 9999, "credentialtype": "badge", "badgeid": 42}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID.");

    let long_hash = format!("0x{}", "f".repeat(300));
    let (status, _) = app
        .issue(
            TEACHER,
            json!({"userid": LEARNER, "credentialtype": "badge", "badgeid": 42,
                   "blockchain_txhash": long_hash}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.store.credential_count(), 0);
}
