//! Post handlers.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use yatube_core::services::PostQuery;
use yatube_shared::dto::PostRequest;

use super::pagination::listing_response;
use crate::middleware::auth::MaybeIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostListParams {
    search: Option<String>,
    author: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

/// GET /api/v1/posts/
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    params: web::Query<PostListParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let query = PostQuery {
        search: params.search,
        author: params.author,
        limit: params.limit,
        offset: params.offset,
    };

    let listing = state.services.posts.list(identity.actor(), query).await?;
    Ok(listing_response(&req, listing))
}

/// POST /api/v1/posts/
pub async fn create(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .services
        .posts
        .create(identity.actor(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/v1/posts/{post_id}/
pub async fn retrieve(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .services
        .posts
        .retrieve(identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/v1/posts/{post_id}/
pub async fn update(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .services
        .posts
        .update(identity.actor(), path.into_inner(), body.into_inner(), false)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PATCH /api/v1/posts/{post_id}/
pub async fn partial_update(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .services
        .posts
        .update(identity.actor(), path.into_inner(), body.into_inner(), true)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/v1/posts/{post_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .services
        .posts
        .delete(identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
