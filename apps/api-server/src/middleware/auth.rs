//! Authentication extractors.
//!
//! The caller is resolved once per request from the `Authorization` header,
//! checked against the user store and handed to the services as an explicit
//! [`Actor`].

use std::future::Future;
use std::pin::Pin;

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use uuid::Uuid;
use yatube_core::Actor;
use yatube_core::ports::TokenKind;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated caller. Rejects the request with 401 when there is none.
///
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.0.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub Actor);

/// Caller if one is present. A missing header means anonymous; a header that
/// carries a bad, expired or non-access token is still a 401.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Actor>);

impl MaybeIdentity {
    pub fn actor(&self) -> Option<&Actor> {
        self.0.as_ref()
    }
}

type ExtractFuture<T> = Pin<Box<dyn Future<Output = Result<T, AppError>>>>;

/// Validated bearer token claims, before the user lookup.
struct BearerClaims {
    state: web::Data<AppState>,
    user_id: Uuid,
}

fn bearer_claims(req: &HttpRequest) -> Result<Option<BearerClaims>, AppError> {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let state = req.app_data::<web::Data<AppState>>().cloned().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("Server configuration error".to_string())
    })?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    // Parse "Bearer <token>"
    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = state.tokens.validate_token(token, TokenKind::Access)?;
    Ok(Some(BearerClaims {
        state,
        user_id: claims.user_id,
    }))
}

/// A token only names a caller while its user still exists.
async fn resolve(claims: Option<BearerClaims>) -> Result<Option<Actor>, AppError> {
    let Some(BearerClaims { state, user_id }) = claims else {
        return Ok(None);
    };

    match state.repos.users.find_by_id(user_id).await? {
        Some(user) => Ok(Some(Actor::new(user.id, user.username))),
        None => {
            tracing::debug!(user_id = %user_id, "Token for unknown user rejected");
            Err(AppError::Unauthorized("User not found".to_string()))
        }
    }
}

impl FromRequest for MaybeIdentity {
    type Error = AppError;
    type Future = ExtractFuture<Self>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = bearer_claims(req);
        Box::pin(async move { resolve(claims?).await.map(MaybeIdentity) })
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = ExtractFuture<Self>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = bearer_claims(req);
        Box::pin(async move {
            resolve(claims?).await?.map(Identity).ok_or_else(|| {
                AppError::Unauthorized("Authentication credentials were not provided.".to_string())
            })
        })
    }
}
