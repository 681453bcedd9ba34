//! Repositorio de usuarios sobre PostgreSQL
//!
//! Implementación del `UserDirectory`. La gestión de cuentas vive en el
//! servicio de identidad externo; aquí solo se lee.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;
use crate::services::rental_service::UserDirectory;
use crate::utils::errors::AppResult;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
