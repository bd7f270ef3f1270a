//! Comment handlers, nested under a post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use yatube_shared::dto::CommentRequest;

use crate::middleware::auth::MaybeIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Decode a comment payload once its post is known to exist, so a missing
/// post is a 404 whatever the body holds.
async fn comment_body(state: &AppState, post_id: Uuid, body: &[u8]) -> AppResult<CommentRequest> {
    state.services.comments.post(post_id).await?;
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Json deserialize error: {e}")))
}

/// GET /api/v1/posts/{post_id}/comments/
pub async fn list(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state
        .services
        .comments
        .list(identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/v1/posts/{post_id}/comments/
pub async fn create(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let input = comment_body(&state, post_id, &body).await?;
    let comment = state
        .services
        .comments
        .create(identity.actor(), post_id, input)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// GET /api/v1/posts/{post_id}/comments/{comment_id}/
pub async fn retrieve(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .services
        .comments
        .retrieve(identity.actor(), post_id, comment_id)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

async fn write(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Bytes,
    partial: bool,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let input = comment_body(&state, post_id, &body).await?;
    let comment = state
        .services
        .comments
        .update(identity.actor(), post_id, comment_id, input, partial)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// PUT /api/v1/posts/{post_id}/comments/{comment_id}/
pub async fn update(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    write(state, identity, path, body, false).await
}

/// PATCH /api/v1/posts/{post_id}/comments/{comment_id}/
pub async fn partial_update(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    write(state, identity, path, body, true).await
}

/// DELETE /api/v1/posts/{post_id}/comments/{comment_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .services
        .comments
        .delete(identity.actor(), post_id, comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
