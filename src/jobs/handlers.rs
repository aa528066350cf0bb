use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{info, instrument};

use crate::{
    auth::session::SessionUser,
    error::AppError,
    jobs::filter::listings_for_role,
    state::AppState,
    users::handlers::load_owned_user,
    views::{render, DashboardPage},
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/:id", get(dashboard))
}

#[instrument(skip(state, session))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user = load_owned_user(&state.db, &session, id).await?;

    let jobs = listings_for_role(state.jobs.as_ref(), user.role.as_deref())
        .await
        .map_err(|e| AppError::Upstream(format!("{e:#}")))?;
    info!(user_id = user.id, listings = jobs.len(), "listings matched");

    Ok(render(&DashboardPage {
        user: &user,
        jobs: &jobs,
    })?
    .into_response())
}
