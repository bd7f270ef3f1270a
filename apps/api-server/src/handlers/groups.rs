use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::middleware::auth::MaybeIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/groups/
pub async fn list(state: web::Data<AppState>, identity: MaybeIdentity) -> AppResult<HttpResponse> {
    let groups = state.services.groups.list(identity.actor()).await?;
    Ok(HttpResponse::Ok().json(groups))
}

/// GET /api/v1/groups/{group_id}/
pub async fn retrieve(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let group = state
        .services
        .groups
        .retrieve(identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(group))
}
