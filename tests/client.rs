//! Client plumbing against a mock Egnyte server.
//!
//! The client is blocking, so every call runs inside `spawn_blocking`.

use egnyte_client::{
    AuthStrategy, Config, EgnyteClient, EgnyteError, FailureKind, LinkAccessibility, LinkKind,
    NewLink,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> Config {
    Config {
        base_url: Some(server.uri()),
        access_token: Some("t0k".into()),
        ..Default::default()
    }
}

async fn with_client<T, F>(config: Config, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(EgnyteClient) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = EgnyteClient::new(&config).unwrap();
        f(client)
    })
    .await
    .unwrap()
}

fn detail_values(err: &EgnyteError) -> Vec<Value> {
    err.details().iter().map(|d| d.as_value().clone()).collect()
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn missing_domain_is_rejected_before_any_request() {
    let err = EgnyteClient::new(&Config::default()).err().unwrap();
    assert_eq!(err.kind(), Some(FailureKind::DomainRequired));
}

#[test]
fn unusable_token_is_invalid_parameters() {
    let config = Config {
        domain: Some("acme".into()),
        access_token: Some("bad\ntoken".into()),
        ..Default::default()
    };
    let err = EgnyteClient::new(&config).err().unwrap();
    assert_eq!(err.kind(), Some(FailureKind::InvalidParameters));
}

// ---------------------------------------------------------------------------
// File system
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn folder_info_sends_token_and_parses_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pubapi/v1/fs/Shared/Team%20Docs"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Team Docs",
            "path": "/Shared/Team Docs",
            "folder_id": "f-1",
            "is_folder": true,
            "folders": [{"name": "Old", "path": "/Shared/Team Docs/Old"}],
            "files": [{"name": "a.txt", "path": "/Shared/Team Docs/a.txt", "size": 3}],
        })))
        .mount(&server)
        .await;

    let folder = with_client(config(&server), |c| c.files().folder_info("/Shared/Team Docs"))
        .await
        .unwrap();
    assert_eq!(folder.folder_id.as_deref(), Some("f-1"));
    assert_eq!(folder.folders[0].path, "/Shared/Team Docs/Old");
    assert_eq!(folder.files[0].size, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn file_info_on_folder_is_file_expected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pubapi/v1/fs/Shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Shared",
            "path": "/Shared",
            "is_folder": true,
        })))
        .mount(&server)
        .await;

    let err = with_client(config(&server), |c| c.files().file_info("/Shared"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(FailureKind::FileExpected));
    assert_eq!(detail_values(&err), vec![json!({"path": "/Shared"})]);
}

#[tokio::test(flavor = "multi_thread")]
async fn file_info_with_garbage_body_is_json_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pubapi/v1/fs/Shared/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = with_client(config(&server), |c| c.files().file_info("/Shared/a.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(FailureKind::JsonParseError));
    assert_eq!(
        detail_values(&err),
        vec![json!({"http response": "<html>maintenance</html>"})]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn create_folder_expects_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pubapi/v1/fs/Shared/new"))
        .and(body_json(json!({"action": "add_folder"})))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    with_client(config(&server), |c| c.files().create_folder("/Shared/new"))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn create_folder_ok_status_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pubapi/v1/fs/Shared/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = with_client(config(&server), |c| c.files().create_folder("/Shared/new"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(FailureKind::RequestError));
    assert_eq!(err.status(), Some(200));
}

#[tokio::test(flavor = "multi_thread")]
async fn forbidden_delete_carries_extracted_records() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/pubapi/v1/fs/Private"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": {"inputErrors": [
                {"code": "NOT_ALLOWED", "msg": "cannot delete"},
                {"code": "LOCKED"},
            ]}
        })))
        .mount(&server)
        .await;

    let err = with_client(config(&server), |c| c.files().delete("/Private"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(FailureKind::InsufficientPermissions));
    assert_eq!(
        detail_values(&err),
        vec![
            json!({"code": "NOT_ALLOWED", "msg": "cannot delete"}),
            json!({"code": "LOCKED"}),
            json!({"http status": 403}),
        ]
    );
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn link_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pubapi/v1/links"))
        .and(body_json(json!({
            "path": "/Shared/dupes",
            "type": "folder",
            "accessibility": "anyone",
            "sendEmail": false,
            "recipients": ["test1@example.com", "test2@example.com"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path": "/Shared/dupes",
            "type": "folder",
            "accessibility": "anyone",
            "links": [
                {"id": "one", "url": "https://acme.egnyte.com/fl/one", "recipients": ["test1@example.com"]},
                {"id": "two", "url": "https://acme.egnyte.com/fl/two", "recipients": ["test2@example.com"]},
            ],
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/pubapi/v1/links/one"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pubapi/v1/links/one"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Link not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pubapi/v1/links/two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path": "/Shared/dupes",
            "type": "folder",
            "accessibility": "anyone",
            "url": "https://acme.egnyte.com/fl/two",
            "recipients": ["test2@example.com"],
        })))
        .mount(&server)
        .await;

    let (created, second, gone) = with_client(config(&server), |c| {
        let created = c
            .links()
            .create(&NewLink {
                path: "/Shared/dupes".into(),
                kind: LinkKind::Folder,
                accessibility: LinkAccessibility::Anyone,
                send_email: false,
                recipients: vec!["test1@example.com".into(), "test2@example.com".into()],
            })
            .unwrap();
        c.links().delete("one").unwrap();
        let second = c.links().get("two").unwrap();
        let gone = c.links().get("one").unwrap_err();
        (created, second, gone)
    })
    .await;

    assert_eq!(created.links.len(), 2);
    assert_eq!(created.links[0].recipients, vec!["test1@example.com"]);
    assert_ne!(created.links[0].id, created.links[1].id);
    assert_eq!(second.path, created.path);
    assert_eq!(gone.kind(), Some(FailureKind::NotFound));
    assert_eq!(
        detail_values(&gone),
        vec![json!({"http response": "Link not found"}), json!({"http status": 404})]
    );
}

// ---------------------------------------------------------------------------
// OAuth
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn password_grant_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/puboauth/token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "token_type": "bearer",
            "expires_in": -1,
        })))
        .mount(&server)
        .await;

    let config = Config {
        api_key: Some("key".into()),
        username: Some("jane".into()),
        password: Some("secret".into()),
        access_token: None,
        ..config(&server)
    };
    let token = with_client(config, |c| {
        c.request_access_token(AuthStrategy::ResourceOwnerPassword)
    })
    .await
    .unwrap();
    assert_eq!(token.access_token, "fresh");
    assert_eq!(token.expires_in, Some(-1));
}

#[tokio::test(flavor = "multi_thread")]
async fn token_preconditions_checked_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (unsupported, no_client_id) = with_client(config(&server), |c| {
        (
            c.request_access_token(AuthStrategy::Implicit).unwrap_err(),
            c.request_access_token(AuthStrategy::ResourceOwnerPassword)
                .unwrap_err(),
        )
    })
    .await;
    assert_eq!(unsupported.kind(), Some(FailureKind::UnsupportedAuthStrategy));
    assert_eq!(no_client_id.kind(), Some(FailureKind::ClientIdRequired));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_credentials_are_not_authorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/puboauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{"code": "invalid_grant", "description": "bad password"}]
        })))
        .mount(&server)
        .await;

    let config = Config {
        api_key: Some("key".into()),
        username: Some("jane".into()),
        password: Some("wrong".into()),
        ..config(&server)
    };
    let err = with_client(config, |c| {
        c.request_access_token(AuthStrategy::ResourceOwnerPassword)
    })
    .await
    .unwrap_err();
    assert_eq!(err.kind(), Some(FailureKind::NotAuthorized));
    assert_eq!(
        detail_values(&err),
        vec![
            json!({"code": "invalid_grant", "description": "bad password"}),
            json!({"http status": 401}),
        ]
    );
}
