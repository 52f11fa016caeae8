use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use console_web::{
    GraphqlAccessClient,
    auth::Token,
    error::AccessError,
    organization::{OrganizationAccess, OrganizationAccessSource},
    roles::Role,
};
use serde_json::{Value, json};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

/// What the stand-in console API saw on its last request.
#[derive(Default)]
struct Recorded {
    authorization: Option<String>,
    body: Option<Value>,
}

type RecordedState = Arc<Mutex<Recorded>>;

async fn graphql_endpoint(
    State(recorded): State<RecordedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    {
        let mut recorded = recorded.lock().unwrap();
        recorded.authorization = authorization.clone();
        recorded.body = Some(body.clone());
    }

    if authorization.as_deref() != Some("Bearer good") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let id = body["variables"]["id"].clone();
    Json(json!({ "data": { "organization": { "id": id, "access": "operator" } } }))
        .into_response()
}

/// Serves the stand-in API on an ephemeral local port.
async fn spawn_api() -> (SocketAddr, RecordedState) {
    let recorded = RecordedState::default();
    let app = Router::new()
        .route("/graphql", post(graphql_endpoint))
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, recorded)
}

fn client(addr: SocketAddr) -> GraphqlAccessClient {
    GraphqlAccessClient::new(&format!("http://{}/graphql", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_client_sends_bearer_token_and_organization_id() {
    let (addr, recorded) = spawn_api().await;
    let token = Token::new("good").unwrap();

    let access = client(addr)
        .fetch_organization_access("org-1", &token)
        .await
        .unwrap();

    assert_eq!(
        access,
        OrganizationAccess {
            organization_id: "org-1".to_string(),
            access_role: Some(Role::Operator),
        }
    );

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer good"));
    let body = recorded.body.as_ref().unwrap();
    assert_eq!(body["variables"]["id"], "org-1");
    assert!(body["query"].as_str().unwrap().contains("organization"));
}

#[tokio::test]
async fn test_client_maps_http_failure_to_status_error() {
    let (addr, recorded) = spawn_api().await;
    let token = Token::new("expired").unwrap();

    let result = client(addr).fetch_organization_access("org-1", &token).await;

    assert!(matches!(result, Err(AccessError::Status(401))));
    assert_eq!(
        recorded.lock().unwrap().authorization.as_deref(),
        Some("Bearer expired")
    );
}

#[tokio::test]
async fn test_client_reports_unreachable_api_as_transport_error() {
    // Bind then drop to get a local port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let token = Token::new("good").unwrap();

    let result = client(addr).fetch_organization_access("org-1", &token).await;

    assert!(matches!(result, Err(AccessError::Transport(_))));
}
