//! Repositorio de vehículos sobre PostgreSQL
//!
//! CRUD de la flota más la implementación del `VehicleStore` que consume el
//! servicio de alquileres.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleCategory, VehicleStatus};
use crate::services::rental_service::VehicleStore;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        brand: String,
        model: String,
        registration_number: String,
        year: i32,
        category: VehicleCategory,
        daily_rate: Decimal,
        mileage: i32,
        fuel_type: Option<String>,
        seating_capacity: i32,
    ) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, brand, model, registration_number, year, category,
                                  daily_rate, status, mileage, fuel_type, seating_capacity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'available', $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(brand)
        .bind(model)
        .bind(registration_number)
        .bind(year)
        .bind(category)
        .bind(daily_rate)
        .bind(mileage)
        .bind(fuel_type)
        .bind(seating_capacity)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict("Registration number already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_all(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE ($1::vehicle_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        brand: Option<String>,
        model: Option<String>,
        year: Option<i32>,
        category: Option<VehicleCategory>,
        daily_rate: Option<Decimal>,
        status: Option<VehicleStatus>,
        mileage: Option<i32>,
        fuel_type: Option<String>,
        seating_capacity: Option<i32>,
    ) -> AppResult<Vehicle> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET brand = $2, model = $3, year = $4, category = $5, daily_rate = $6,
                status = $7, mileage = $8, fuel_type = $9, seating_capacity = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(brand.unwrap_or(current.brand))
        .bind(model.unwrap_or(current.model))
        .bind(year.unwrap_or(current.year))
        .bind(category.unwrap_or(current.category))
        .bind(daily_rate.unwrap_or(current.daily_rate))
        .bind(status.unwrap_or(current.status))
        .bind(mileage.unwrap_or(current.mileage))
        .bind(fuel_type.or(current.fuel_type))
        .bind(seating_capacity.unwrap_or(current.seating_capacity))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl VehicleStore for VehicleRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        self.find_by_id(id).await
    }
}
