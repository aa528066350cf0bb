use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use crate::storage::UPLOADS_ROUTE;
use crate::{applications, auth, jobs, users};

pub fn build_app(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_root);
    Router::new()
        .merge(auth::router())
        .merge(jobs::router())
        .merge(users::router())
        .merge(applications::router())
        .route("/health", get(|| async { "ok" }))
        .nest_service(UPLOADS_ROUTE, uploads)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        let elapsed_ms = latency.as_millis() as u64;
                        span.record("status", tracing::field::display(status));
                        match status.as_u16() {
                            500..=u16::MAX => tracing::error!(%status, elapsed_ms, "page failed"),
                            400..=499 => tracing::warn!(%status, elapsed_ms, "page rejected"),
                            _ => tracing::debug!(%status, elapsed_ms, "page served"),
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
