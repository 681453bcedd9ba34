//! Utilidades JWT
//!
//! Este módulo valida los tokens emitidos por el servicio de identidad
//! externo. Aquí no se emiten tokens; solo se decodifican los claims que
//! necesita la capa de autorización (id de usuario y roles).

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // user_id
    pub roles: Vec<String>, // roles del usuario
    pub exp: usize,         // expiration timestamp
    pub iat: usize,         // issued at timestamp
}

/// Usuario autenticado extraído del token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_staff(&self) -> bool {
        self.has_role(crate::models::user::ROLE_ADMIN)
            || self.has_role(crate::models::user::ROLE_EMPLOYEE)
    }
}

/// Validar un token y extraer el usuario autenticado
pub fn validate_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    let id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid subject in token".to_string()))?;

    Ok(AuthUser {
        id,
        roles: token_data.claims.roles,
    })
}
