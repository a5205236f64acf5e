//!
//! # User Routes
//!
//! The user lifecycle: register, login, logout (one session or all), profile
//! read/update, self-deletion with its task cascade, and the avatar
//! endpoints. Everything except register and login runs behind
//! `AuthMiddleware` and receives the resolved identity through the
//! [`AuthSession`] extractor.

use crate::{
    auth::{AuthSession, LoginRequest},
    email,
    error::AppError,
    images::MAX_AVATAR_BYTES,
    models::{User, UserInput, UserUpdate},
    state::AppState,
};
use actix_multipart::Multipart;
use actix_web::{delete, get, http::header, patch, post, web, HttpResponse, Responder};
use futures::TryStreamExt;
use serde_json::{json, Value};

const USER_UPDATE_FIELDS: [&str; 4] = ["name", "email", "age", "password"];

/// Register a new user.
///
/// Validates the payload, stores the hashed-password record, fires the welcome
/// email (best-effort), and returns the redacted user together with the first
/// session token.
#[post("")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    let mut user = User::create(payload.into_inner())?;
    state.store.insert_user(user.clone()).await?;

    email::spawn_welcome_email(state.mailer.clone(), user.email.clone(), user.name.clone());

    let token = state.tokens.issue(&mut user)?;
    let user = state.store.save_user(user).await?;

    Ok(HttpResponse::Created().json(json!({ "user": user, "token": token })))
}

/// Authenticate and issue a new session token.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let mut user =
        User::find_by_credentials(state.store.as_ref(), &payload.email, &payload.password).await?;

    let token = state.tokens.issue(&mut user)?;
    let user = state.store.save_user(user).await?;

    Ok(HttpResponse::Ok().json(json!({ "user": user, "token": token })))
}

/// Revoke exactly the session token this request authenticated with.
#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let mut user = session.user;
    user.tokens.retain(|t| t != &session.token);
    state.store.save_user(user).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Revoke every session token issued to this user.
#[post("/logoutAll")]
pub async fn logout_all(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let mut user = session.user;
    user.tokens.clear();
    state.store.save_user(user).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Fetch the authenticated user's own profile, redacted.
#[get("/me")]
pub async fn me(session: AuthSession) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(session.user))
}

/// Update the authenticated user's own profile.
///
/// The raw key set is checked against the allow-list first: any unknown key
/// rejects the whole request before anything is applied.
#[patch("/me")]
pub async fn update_me(
    state: web::Data<AppState>,
    session: AuthSession,
    payload: web::Json<Value>,
) -> Result<impl Responder, AppError> {
    let body = payload.into_inner();
    let fields = body.as_object().ok_or(AppError::InvalidOperation)?;
    if fields
        .keys()
        .any(|key| !USER_UPDATE_FIELDS.contains(&key.as_str()))
    {
        return Err(AppError::InvalidOperation);
    }

    let update: UserUpdate =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;

    let mut user = session.user;
    user.apply_update(update)?;
    let user = state.store.save_user(user).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Delete the authenticated user and cascade to their tasks.
///
/// The two writes are sequential, tasks first, so no orphaned task can
/// survive a failure between them. The cancellation email is best-effort.
#[delete("/me")]
pub async fn delete_me(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let user = session.user;

    let removed = state.store.delete_tasks_by_owner(user.id).await?;
    log::debug!("cascade removed {} task(s) for user {}", removed, user.id);
    state.store.delete_user(user.id).await?;

    email::spawn_cancellation_email(state.mailer.clone(), user.email.clone(), user.name.clone());

    Ok(HttpResponse::Ok().json(user))
}

/// Reads the `avatar` field out of a multipart body, enforcing the declared
/// mime family and the size ceiling while streaming.
async fn read_avatar_field(mut payload: Multipart) -> Result<(Vec<u8>, String), AppError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::InvalidUpload(e.to_string()))?
    {
        if field.name() != "avatar" {
            // Drain unrelated fields so the stream can continue.
            while field
                .try_next()
                .await
                .map_err(|e| AppError::InvalidUpload(e.to_string()))?
                .is_some()
            {}
            continue;
        }

        let mime_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_default();
        if !mime_type.starts_with("image/") {
            return Err(AppError::InvalidUpload("Please upload an image file".into()));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::InvalidUpload(e.to_string()))?
        {
            if data.len() + chunk.len() > MAX_AVATAR_BYTES {
                return Err(AppError::InvalidUpload("File too large".into()));
            }
            data.extend_from_slice(&chunk);
        }
        return Ok((data, mime_type));
    }

    Err(AppError::InvalidUpload("Please upload an image file".into()))
}

/// Upload an avatar (multipart field `avatar`, image only, at most 1MB).
///
/// The bytes are normalized to a 250x250 PNG; the mime type declared by the
/// client is stored alongside them.
#[post("/me/avatar")]
pub async fn upload_avatar(
    state: web::Data<AppState>,
    session: AuthSession,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let (bytes, mime_type) = read_avatar_field(payload).await?;
    let normalized = state.images.normalize(&bytes)?;

    let mut user = session.user;
    user.set_avatar(normalized, mime_type);
    state.store.save_user(user).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Clear the stored avatar.
#[delete("/me/avatar")]
pub async fn delete_avatar(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let mut user = session.user;
    user.clear_avatar();
    state.store.save_user(user).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Fetch the avatar bytes. The content type is pinned to the image family and
/// `nosniff` keeps browsers from second-guessing it.
#[get("/me/avatar")]
pub async fn get_avatar(session: AuthSession) -> Result<impl Responder, AppError> {
    let avatar = session
        .user
        .avatar
        .ok_or_else(|| AppError::NotFound("Avatar not found".into()))?;

    Ok(HttpResponse::Ok()
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .content_type("image/*")
        .body(avatar))
}
