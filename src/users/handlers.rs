use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use crate::{
    auth::session::SessionUser,
    error::AppError,
    state::AppState,
    storage::{secure_filename, AssetKind},
    users::{
        dto::{non_blank, Experience, ProfileForm, UploadedFile},
        repo::{self, ProfileUpdate, User},
    },
    views::{render, EditProfilePage, ProfilePage},
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile/:id", get(profile))
        .route(
            "/editprofile/:id",
            get(edit_profile_page).post(edit_profile),
        )
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// Load the account addressed by the URL, then check the session owns it.
pub async fn load_owned_user(
    db: &SqlitePool,
    session: &SessionUser,
    id: i64,
) -> Result<User, AppError> {
    let user = User::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::user_not_found(id))?;
    session.ensure_owner(user.id)?;
    Ok(user)
}

#[instrument(skip(state, session))]
pub async fn profile(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user = load_owned_user(&state.db, &session, id).await?;
    let experiences = repo::list_experiences(&state.db, id).await?;
    Ok(render(&ProfilePage {
        user: &user,
        experiences: &experiences,
    })?
    .into_response())
}

#[instrument(skip(state, session))]
pub async fn edit_profile_page(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user = load_owned_user(&state.db, &session, id).await?;
    let experiences = repo::list_experiences(&state.db, id).await?;
    Ok(render(&EditProfilePage {
        user: &user,
        experiences: &experiences,
    })?
    .into_response())
}

async fn read_profile_form(mut mp: Multipart) -> Result<ProfileForm, AppError> {
    let mut form = ProfileForm::default();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed form: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "photo" | "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable upload: {e}")))?;
                // Browsers send an empty part when no file was picked.
                if file_name.is_empty() {
                    continue;
                }
                let upload = Some(UploadedFile { file_name, body });
                if name == "photo" {
                    form.photo = upload;
                } else {
                    form.resume = upload;
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable field {name}: {e}")))?;
                form.push_text(&name, value);
            }
        }
    }
    Ok(form)
}

/// Public paths of the files written for one profile edit.
#[derive(Debug, Default)]
struct StoredUploads {
    image: Option<String>,
    resume: Option<String>,
}

async fn store_uploads(
    state: &AppState,
    user: &User,
    photo: Option<UploadedFile>,
    resume: Option<UploadedFile>,
) -> Result<StoredUploads, AppError> {
    let mut stored = StoredUploads::default();
    for (kind, upload) in [(AssetKind::ProfileImage, photo), (AssetKind::Resume, resume)] {
        let Some(upload) = upload else { continue };
        match state
            .storage
            .save(kind, user.id, &upload.file_name, upload.body)
            .await
        {
            Ok(url) if kind == AssetKind::ProfileImage => stored.image = Some(url),
            Ok(url) => stored.resume = Some(url),
            Err(e) => {
                discard_uploads(state, user, &stored).await;
                return Err(e.into());
            }
        }
    }
    Ok(stored)
}

/// Remove files written for a failed edit. A re-upload under the name the row
/// already points at replaced that file in place, so it is left alone.
async fn discard_uploads(state: &AppState, user: &User, stored: &StoredUploads) {
    let current = [Some(user.image.as_str()), user.resume.as_deref()];
    for url in [&stored.image, &stored.resume].into_iter().flatten() {
        if current.contains(&Some(url.as_str())) {
            continue;
        }
        if let Err(e) = state.storage.delete(url).await {
            warn!(error = %format!("{e:#}"), url = %url, "could not remove orphaned upload");
        }
    }
}

async fn persist_profile(
    db: &SqlitePool,
    user_id: i64,
    update: &ProfileUpdate,
    experiences: &[Experience],
    stored: &StoredUploads,
) -> Result<(), AppError> {
    let mut tx = db.begin().await?;
    User::update_profile(&mut tx, user_id, update).await?;
    repo::replace_experiences(&mut tx, user_id, experiences).await?;
    if let Some(image) = &stored.image {
        User::set_image(&mut tx, user_id, image).await?;
    }
    if let Some(resume) = &stored.resume {
        User::set_resume(&mut tx, user_id, resume).await?;
    }
    tx.commit().await?;
    Ok(())
}

#[instrument(skip(state, session, mp))]
pub async fn edit_profile(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<i64>,
    mp: Multipart,
) -> Result<Response, AppError> {
    let user = load_owned_user(&state.db, &session, id).await?;
    let form = read_profile_form(mp).await?;

    let experiences = form.experiences().map_err(|msg| {
        warn!(user_id = id, "{msg}");
        AppError::Validation(msg)
    })?;
    for upload in [&form.photo, &form.resume].into_iter().flatten() {
        if secure_filename(&upload.file_name).is_none() {
            return Err(AppError::Validation(format!(
                "file name {:?} cannot be stored",
                upload.file_name
            )));
        }
    }

    let update = ProfileUpdate {
        name: form.name.clone().map(|n| n.trim().to_string()).unwrap_or_default(),
        role: non_blank(form.role.clone()),
        address: non_blank(form.address.clone()),
        linkedin: non_blank(form.linkedin.clone()),
        about: non_blank(form.about.clone()),
    };

    let stored = store_uploads(&state, &user, form.photo, form.resume).await?;
    if let Err(e) = persist_profile(&state.db, user.id, &update, &experiences, &stored).await {
        discard_uploads(&state, &user, &stored).await;
        return Err(e);
    }

    info!(
        user_id = user.id,
        experiences = experiences.len(),
        "profile updated"
    );
    Ok(Redirect::to(&format!("/profile/{}", user.id)).into_response())
}
