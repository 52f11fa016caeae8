use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderName, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use std::{path::PathBuf, sync::Arc};

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access control core.
pub mod access;
pub mod guard;
pub mod roles;

// Capabilities the guard consumes.
pub mod auth;
pub mod graphql;
pub mod organization;

// Application services and components.
pub mod config;
pub mod error;
pub mod handlers;

// Declarative table of console views and their requirements.
pub mod routes;

use auth::Session;
use guard::{Navigation, NavigationGuard};
use routes::RouteTable;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use graphql::GraphqlAccessClient;
pub use organization::{AccessState, MemoryAccessSource};

/// AppState
///
/// Single, immutable container holding everything a request needs. Shared
/// across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// The navigation guard, constructed with the organization access source.
    pub guard: NavigationGuard,
    /// The console views and what each of them requires.
    pub routes: Arc<RouteTable>,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    pub fn new(access: AccessState, routes: RouteTable, config: AppConfig) -> Self {
        Self {
            guard: NavigationGuard::new(access),
            routes: Arc::new(routes),
            config,
        }
    }
}

/// navigation_guard
///
/// Middleware in front of every console page. Resolves the requested path in the
/// route table, runs the guard with the request's session, and either lets the
/// request through to the console shell or answers with a `303 See Other` to
/// the fallback view.
async fn navigation_guard(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let Some(destination) = state.routes.resolve(request.uri().path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.guard.before_each(&destination, &session).await {
        Navigation::Allow => next.run(request).await,
        Navigation::Redirect(target) => match state.routes.href(target.name, &target.params) {
            Some(location) => Redirect::to(&location).into_response(),
            None => {
                tracing::error!(route = target.name, "redirect target missing from route table");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
    }
}

/// axum_path
///
/// Converts a route-table path (`/organizations/:oid`) into axum's capture
/// syntax (`/organizations/{oid}`).
fn axum_path(path: &str) -> String {
    if path == "/" {
        return path.to_string();
    }
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(param) => format!("{{{}}}", param),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// create_router
///
/// Assembles the routing structure, applies the guard and observability
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let static_dir = PathBuf::from(&state.config.static_dir);
    let shell = ServeFile::new(static_dir.join("index.html"));

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 1. Console Pages: every view in the route table serves the SPA shell,
    //    guarded by the navigation guard.
    let pages = state
        .routes
        .routes()
        .iter()
        .fold(Router::<AppState>::new(), |router, route| {
            router.route_service(&axum_path(route.path), shell.clone())
        })
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            navigation_guard,
        ));

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Health check for load balancers.
        .route("/health", get(|| async { "ok" }))
        // Navigation check for the client-side router.
        .route("/api/navigation", get(handlers::check_navigation))
        // Login / logout.
        .route(
            "/api/session",
            post(handlers::create_session).delete(handlers::delete_session),
        )
        .merge(pages)
        // Static assets of the console build. Not guarded: they carry no data.
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Builds the per-request tracing span, carrying the `x-request-id` so every log
/// line of one request (guard decisions included) can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
