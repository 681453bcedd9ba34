//! Middleware de autenticación
//!
//! Extrae el token Bearer del header Authorization, lo valida y deja el
//! `AuthUser` en las extensiones del request para que los handlers apliquen
//! sus políticas de autorización.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::validate_token;

/// Middleware de autenticación
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Expected Bearer token".to_string()))?;

    let auth_user = validate_token(token, &state.config.jwt_secret)?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}
