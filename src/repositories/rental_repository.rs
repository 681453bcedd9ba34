//! Repositorio de alquileres sobre PostgreSQL
//!
//! Implementación del `RentalStore`. Los métodos compuestos
//! (`insert_with_vehicle` / `save_with_vehicle`) son la frontera de la
//! unidad de trabajo: una transacción por operación del ciclo de vida.
//!
//! La tabla rentals lleva una constraint de exclusión (vehicle_id +
//! daterange, excluyendo cancelados); si dos creates concurrentes pasan el
//! chequeo optimista, el perdedor recibe aquí el mismo Conflict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::rental::Rental;
use crate::models::user::User;
use crate::models::vehicle::Vehicle;
use crate::services::rental_service::{RentalDetails, RentalFilter, RentalStore};
use crate::utils::errors::{AppError, AppResult};

pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Violaciones de constraint de exclusión/unicidad significan que otro
/// booking ganó la carrera por las mismas fechas; una violación de CHECK
/// (orden de fechas, montos) es entrada inválida del cliente
fn map_write_err(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        match db.code().as_deref() {
            Some("23P01") | Some("23505") => {
                return AppError::Conflict(
                    "Vehicle is not available for the selected dates".to_string(),
                );
            }
            Some("23514") => {
                return AppError::BadRequest(
                    "Rental dates or amounts are out of range".to_string(),
                );
            }
            _ => {}
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl RentalStore for RentalRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rental)
    }

    async fn get_with_details(&self, id: Uuid) -> AppResult<Option<RentalDetails>> {
        let rental = match self.get_by_id(id).await? {
            Some(r) => r,
            None => return Ok(None),
        };

        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(rental.vehicle_id)
            .fetch_one(&self.pool)
            .await?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(rental.user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Some(RentalDetails {
            rental,
            vehicle,
            user,
        }))
    }

    async fn get_all(&self) -> AppResult<Vec<Rental>> {
        let rentals =
            sqlx::query_as::<_, Rental>("SELECT * FROM rentals ORDER BY start_date DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rentals)
    }

    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            "SELECT * FROM rentals WHERE user_id = $1 ORDER BY start_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    async fn search(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT * FROM rentals
            WHERE ($1::rental_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR vehicle_id = $2)
              AND ($3::uuid IS NULL OR user_id = $3)
              AND ($4::timestamptz IS NULL OR end_date > $4)
              AND ($5::timestamptz IS NULL OR start_date < $5)
            ORDER BY start_date DESC
            "#,
        )
        .bind(filter.status)
        .bind(filter.vehicle_id)
        .bind(filter.user_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    async fn is_vehicle_available(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<bool> {
        // Solapamiento en intervalo abierto; los cancelados nunca bloquean
        let (available,): (bool,) = sqlx::query_as(
            r#"
            SELECT NOT EXISTS(
                SELECT 1 FROM rentals
                WHERE vehicle_id = $1
                  AND status <> 'cancelled'
                  AND start_date < $3
                  AND end_date > $2
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(available)
    }

    async fn insert_with_vehicle(&self, rental: &Rental, vehicle: &Vehicle) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO rentals (id, user_id, vehicle_id, start_date, end_date,
                                 actual_return_date, total_cost, status,
                                 start_mileage, end_mileage, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(rental.id)
        .bind(rental.user_id)
        .bind(rental.vehicle_id)
        .bind(rental.start_date)
        .bind(rental.end_date)
        .bind(rental.actual_return_date)
        .bind(rental.total_cost)
        .bind(rental.status)
        .bind(rental.start_mileage)
        .bind(rental.end_mileage)
        .bind(rental.notes.as_deref())
        .bind(rental.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_err)?;

        let updated = sqlx::query("UPDATE vehicles SET status = $2, mileage = $3 WHERE id = $1")
            .bind(vehicle.id)
            .bind(vehicle.status)
            .bind(vehicle.mileage)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(inserted.rows_affected() + updated.rows_affected())
    }

    async fn save_with_vehicle(&self, rental: &Rental, vehicle: &Vehicle) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let rental_rows = sqlx::query(
            r#"
            UPDATE rentals
            SET status = $2, actual_return_date = $3, end_mileage = $4, notes = $5
            WHERE id = $1
            "#,
        )
        .bind(rental.id)
        .bind(rental.status)
        .bind(rental.actual_return_date)
        .bind(rental.end_mileage)
        .bind(rental.notes.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(map_write_err)?;

        let vehicle_rows =
            sqlx::query("UPDATE vehicles SET status = $2, mileage = $3 WHERE id = $1")
                .bind(vehicle.id)
                .bind(vehicle.status)
                .bind(vehicle.mileage)
                .execute(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(rental_rows.rows_affected() + vehicle_rows.rows_affected())
    }
}
