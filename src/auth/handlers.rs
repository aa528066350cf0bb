use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        session::{clear_cookie, SessionKeys},
    },
    db::is_unique_violation,
    error::AppError,
    state::AppState,
    users::repo::User,
    views::{render, LandingPage, LoginPage, SignupPage},
};

const EMAIL_TAKEN: &str = "Email already registered. Please log in.";
const EMAIL_EXISTS: &str = "Email already exists.";
const BAD_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

pub async fn home() -> Result<Response, AppError> {
    Ok(render(&LandingPage {})?.into_response())
}

pub async fn signup_page() -> Result<Response, AppError> {
    Ok(render(&SignupPage { error: "" })?.into_response())
}

fn signup_rejected(message: &str) -> Result<Response, AppError> {
    Ok((StatusCode::CONFLICT, render(&SignupPage { error: message })?).into_response())
}

#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let email = form.email.trim();

    if User::find_by_email(&state.db, email).await?.is_some() {
        warn!("email already registered");
        return signup_rejected(EMAIL_TAKEN);
    }

    let hash = hash_password(&form.password)?;

    let mut tx = state.db.begin().await?;
    let user = match User::create(&mut tx, form.name.trim(), email, &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!("email claimed concurrently");
            return signup_rejected(EMAIL_EXISTS);
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };
    tx.commit().await?;

    info!(user_id = user.id, "user registered");
    Ok(Redirect::to("/login").into_response())
}

pub async fn login_page() -> Result<Response, AppError> {
    Ok(render(&LoginPage { error: "" })?.into_response())
}

#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = match User::find_by_email(&state.db, form.email.trim()).await? {
        Some(u) => u,
        None => {
            warn!("login unknown email");
            return login_rejected();
        }
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return login_rejected();
    }

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok((
        [(header::SET_COOKIE, keys.cookie(&token))],
        Redirect::to(&format!("/dashboard/{}", user.id)),
    )
        .into_response())
}

fn login_rejected() -> Result<Response, AppError> {
    Ok((
        StatusCode::UNAUTHORIZED,
        render(&LoginPage {
            error: BAD_CREDENTIALS,
        })?,
    )
        .into_response())
}

pub async fn logout() -> Response {
    ([(header::SET_COOKIE, clear_cookie())], Redirect::to("/login")).into_response()
}
