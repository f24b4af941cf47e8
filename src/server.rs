use crate::{auth::LoginRedirector, config::LoginConfig, handler};
use axum::{
    extract::FromRef,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::{net::SocketAddr, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::Span;

/// Correlation cookie consumed by the companion callback handler.
pub const COOKIE_NAME: &str = "authstate";

pub async fn start_server(config: LoginConfig) -> anyhow::Result<()> {
    let app = app(LoginRedirector::new(config));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
    tracing::debug!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

// State is published into the router before `serve` runs, so every request
// observes a fully-initialized config.
pub fn app(redirector: LoginRedirector) -> Router {
    Router::new()
        .route("/login", get(handler::login))
        .with_state(AppState { redirector })
        .layer(
            TraceLayer::new_for_http()
                .on_request(|request: &Request<_>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri());
                })
                .on_response(|response: &Response, latency: Duration, _span: &Span| {
                    tracing::info!("{} {:?}", response.status(), latency);
                }),
        )
}

#[derive(Clone)]
struct AppState {
    redirector: LoginRedirector,
}

impl FromRef<AppState> for LoginRedirector {
    fn from_ref(state: &AppState) -> Self {
        state.redirector.clone()
    }
}

/// Maps any handler failure to a 500 without leaking detail to the user
/// agent; the cause goes to the diagnostic stream.
pub struct InternalError(anyhow::Error);

impl IntoResponse for InternalError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    }
}

impl<E> From<E> for InternalError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
