use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    applications::{
        funnel::Funnel,
        repo::{Application, NewApplication},
    },
    auth::session::SessionUser,
    error::AppError,
    state::AppState,
    users::{handlers::load_owned_user, repo::User},
    views::{render, ApplicationsPage},
};

/// Listing fields carried on the dashboard's apply link.
#[derive(Debug, Deserialize)]
pub struct ApplyQuery {
    pub title: Option<String>,
    pub company: Option<String>,
    pub job: Option<String>,
}

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/auto_apply/:id", get(auto_apply))
        .route("/applications/:id", get(applications))
}

#[instrument(skip(state, session))]
pub async fn auto_apply(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<i64>,
    Query(q): Query<ApplyQuery>,
) -> Result<Response, AppError> {
    let user = load_owned_user(&state.db, &session, id).await?;
    let new = NewApplication {
        job_title: q.title,
        company: q.company,
        job_url: q.job,
    };

    let mut tx = state.db.begin().await?;
    let app = Application::insert(&mut tx, user.id, &new).await?;
    User::increment_applied(&mut tx, user.id).await?;
    tx.commit().await?;

    info!(user_id = user.id, application_id = app.id, "application recorded");
    Ok(Redirect::to(&format!("/applications/{}", user.id)).into_response())
}

#[instrument(skip(state, session))]
pub async fn applications(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user = load_owned_user(&state.db, &session, id).await?;
    let apps = Application::list_by_user(&state.db, user.id).await?;
    let funnel = Funnel::from_counts(user.stage_counts());

    Ok(render(&ApplicationsPage {
        user: &user,
        apps: &apps,
        funnel,
    })?
    .into_response())
}
