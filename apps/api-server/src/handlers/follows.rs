//! Follow handlers. Always scoped to the caller.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use yatube_shared::dto::FollowRequest;

use crate::middleware::auth::MaybeIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FollowListParams {
    search: Option<String>,
}

/// GET /api/v1/follow/?search=<username fragment>
pub async fn list(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    params: web::Query<FollowListParams>,
) -> AppResult<HttpResponse> {
    let follows = state
        .services
        .follows
        .list(identity.actor(), params.search.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(follows))
}

/// POST /api/v1/follow/
pub async fn create(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    body: web::Json<FollowRequest>,
) -> AppResult<HttpResponse> {
    let follow = state
        .services
        .follows
        .create(identity.actor(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(follow))
}

/// GET /api/v1/follow/{follow_id}/
pub async fn retrieve(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let follow = state
        .services
        .follows
        .retrieve(identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(follow))
}

/// DELETE /api/v1/follow/{follow_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .services
        .follows
        .delete(identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
