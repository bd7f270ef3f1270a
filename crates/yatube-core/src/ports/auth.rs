//! Authentication ports: bearer tokens and password hashing.

use std::fmt;

use uuid::Uuid;

/// Which of the two issued tokens a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, sent as `Authorization: Bearer`.
    Access,
    /// Long-lived, exchanged for a fresh access token.
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "access" => Some(TokenKind::Access),
            "refresh" => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by a decoded token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub kind: TokenKind,
    pub exp: i64,
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue a token of the given kind for a user.
    fn generate_token(
        &self,
        user_id: Uuid,
        username: &str,
        kind: TokenKind,
    ) -> Result<String, AuthError>;

    /// Verify signature, issuer and expiry; accept either kind.
    fn decode_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Decode a token and require it to be of `kind`.
    fn validate_token(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, AuthError> {
        let claims = self.decode_token(token)?;
        if claims.kind != kind {
            return Err(AuthError::InvalidToken(format!(
                "expected {} token, got {}",
                kind, claims.kind
            )));
        }
        Ok(claims)
    }
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
