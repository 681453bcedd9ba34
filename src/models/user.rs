//! Modelo de User
//!
//! Usuarios del sistema (clientes y personal). El core de alquileres solo
//! lee id, tier de fidelidad y roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol requerido para poder mantener un alquiler
pub const ROLE_CUSTOMER: &str = "customer";
/// Roles de personal con permisos de gestión
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EMPLOYEE: &str = "employee";

/// Tier de fidelidad del cliente - mapea al ENUM customer_tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "customer_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerTier {
    Standard,
    Silver,
    Gold,
    Platinum,
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub tier: CustomerTier,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_customer(&self) -> bool {
        self.has_role(ROLE_CUSTOMER)
    }

    pub fn is_staff(&self) -> bool {
        self.has_role(ROLE_ADMIN) || self.has_role(ROLE_EMPLOYEE)
    }
}
