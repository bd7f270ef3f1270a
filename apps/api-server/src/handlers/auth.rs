//! Account and token handlers.

use actix_web::{HttpResponse, web};

use yatube_core::domain::User;
use yatube_core::ports::{AuthError, TokenKind};
use yatube_shared::dto::{
    AccessTokenResponse, RegisterUserRequest, TokenObtainRequest, TokenPairResponse,
    TokenRefreshRequest, TokenVerifyRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/users/
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let new_user = state.services.users.parse(body.into_inner()).await?;

    let password_hash = state.passwords.hash(&new_user.password)?;
    let user = User::new(
        new_user.username,
        new_user.email,
        password_hash,
        new_user.first_name,
        new_user.last_name,
    );
    let saved_user = state.repos.users.insert(user).await?;
    tracing::info!(user_id = %saved_user.id, username = %saved_user.username, "User registered");

    Ok(HttpResponse::Created().json(state.services.users.render(saved_user)))
}

/// GET /api/v1/users/me/ - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .repos
        .users
        .find_by_id(identity.0.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(state.services.users.render(user)))
}

/// POST /api/v1/jwt/create/
pub async fn create_token(
    state: web::Data<AppState>,
    body: web::Json<TokenObtainRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .repos
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "Rejected token request: bad password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let refresh = state
        .tokens
        .generate_token(user.id, &user.username, TokenKind::Refresh)?;
    let access = state
        .tokens
        .generate_token(user.id, &user.username, TokenKind::Access)?;

    Ok(HttpResponse::Ok().json(TokenPairResponse { refresh, access }))
}

/// POST /api/v1/jwt/refresh/
pub async fn refresh_token(
    state: web::Data<AppState>,
    body: web::Json<TokenRefreshRequest>,
) -> AppResult<HttpResponse> {
    let claims = state
        .tokens
        .validate_token(&body.refresh, TokenKind::Refresh)?;

    // Accounts deleted since the refresh token was issued get nothing.
    let user = state
        .repos
        .users
        .find_by_id(claims.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let access = state
        .tokens
        .generate_token(user.id, &user.username, TokenKind::Access)?;

    Ok(HttpResponse::Ok().json(AccessTokenResponse { access }))
}

/// POST /api/v1/jwt/verify/
pub async fn verify_token(
    state: web::Data<AppState>,
    body: web::Json<TokenVerifyRequest>,
) -> AppResult<HttpResponse> {
    state.tokens.decode_token(&body.token)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}
