use crate::{
    AppState,
    auth::{Session, TOKEN_COOKIE, Token},
    guard::Navigation,
};
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- Request / Response Schemas ---

/// NavigationQuery
///
/// Query parameters of `GET /api/navigation`: the path the client router is
/// about to transition to.
#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    pub path: String,
}

/// NavigationResponse
///
/// The guard's verdict as seen by the client router. `location` is the
/// redirect target reversed into a concrete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum NavigationResponse {
    Allow,
    Redirect {
        name: String,
        params: BTreeMap<String, String>,
        location: Option<String>,
    },
}

/// CreateSessionRequest
///
/// Input payload for `POST /api/session`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// --- Handlers ---

/// check_navigation
///
/// [Public Route] Runs the navigation guard for a path without performing the
/// transition. The client-side router calls this before every route change and
/// follows the returned redirect, if any.
///
/// Responds 404 when the path names no console view.
pub async fn check_navigation(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<NavigationQuery>,
) -> Response {
    let Some(destination) = state.routes.resolve(&query.path) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no console view at {}", query.path),
            }),
        )
            .into_response();
    };

    let response = match state.guard.before_each(&destination, &session).await {
        Navigation::Allow => NavigationResponse::Allow,
        Navigation::Redirect(target) => NavigationResponse::Redirect {
            location: state.routes.href(target.name, &target.params),
            name: target.name.to_string(),
            params: target.params,
        },
    };

    Json(response).into_response()
}

/// create_session
///
/// [Public Route] Login: persists the token as an HttpOnly cookie so later page
/// loads carry the principal.
///
/// Responds 400 for a blank token or one that cannot be carried in a cookie.
pub async fn create_session(Json(payload): Json<CreateSessionRequest>) -> Response {
    let Some(token) = Token::new(payload.token).filter(|t| cookie_safe(t.as_str())) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "token must be a non-empty cookie-safe string".to_string(),
            }),
        )
            .into_response();
    };

    tracing::info!("session created");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        TOKEN_COOKIE,
        token.as_str()
    );
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response()
}

/// delete_session
///
/// [Public Route] Logout: expires the token cookie. Idempotent.
pub async fn delete_session() -> Response {
    tracing::info!("session removed");

    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        TOKEN_COOKIE
    );
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response()
}

// RFC 6265 cookie-octet: visible ASCII minus whitespace, DQUOTE, comma, semicolon, backslash.
fn cookie_safe(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}
