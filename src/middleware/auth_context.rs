use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::auth;
use crate::error::ApiError;
use crate::models::{AppState, Role};

/// Identity extracted from the bearer token. Verification is purely local
/// (signature + expiry); no session row is kept server-side.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub id: i64,
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            // Extract Authorization: Bearer <token>
            let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::Unauthorized("No token".into()))?;

            let claims = auth::verify_token(authz.token(), &state.jwt)
                .map_err(|_| ApiError::Unauthorized("Invalid token".into()))?;

            Ok(AuthContext {
                id: claims.id,
                role: claims.role,
            })
        }
    }
}
