//! Modelo de Rental
//!
//! Este módulo contiene la entidad Rental, el enum de estados del ciclo de
//! vida y el predicado canónico de solapamiento de fechas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use uuid::Uuid;

/// Estado del alquiler - mapea al ENUM rental_status
///
/// Máquina de estados: `Reserved -> Active -> Completed`,
/// `Reserved -> Cancelled`. `Completed` y `Cancelled` son terminales.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "rental_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Reserved,
    Active,
    Completed,
    Cancelled,
}

impl RentalStatus {
    /// Un estado terminal no admite más transiciones por las operaciones
    /// dedicadas (complete/cancel)
    pub fn is_terminal(&self) -> bool {
        matches!(self, RentalStatus::Completed | RentalStatus::Cancelled)
    }
}

impl FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reserved" => Ok(RentalStatus::Reserved),
            "active" => Ok(RentalStatus::Active),
            "completed" => Ok(RentalStatus::Completed),
            "cancelled" => Ok(RentalStatus::Cancelled),
            other => Err(format!("Invalid rental status: '{}'", other)),
        }
    }
}

/// Rental principal - mapea exactamente a la tabla rentals
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rental {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub total_cost: Decimal,
    pub status: RentalStatus,
    pub start_mileage: Option<i32>,
    pub end_mileage: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Predicado de solapamiento en intervalo abierto: dos rangos chocan si
/// `existing.start < new_end && existing.end > new_start`. Rangos que solo
/// se tocan (uno termina exactamente cuando el otro empieza) NO solapan.
pub fn ranges_overlap(
    existing_start: DateTime<Utc>,
    existing_end: DateTime<Utc>,
    new_start: DateTime<Utc>,
    new_end: DateTime<Utc>,
) -> bool {
    existing_start < new_end && existing_end > new_start
}

impl Rental {
    /// ¿Este alquiler bloquea el rango solicitado? Los cancelados nunca
    /// bloquean una reserva nueva.
    pub fn blocks(&self, new_start: DateTime<Utc>, new_end: DateTime<Utc>) -> bool {
        self.status != RentalStatus::Cancelled
            && ranges_overlap(self.start_date, self.end_date, new_start, new_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Reserved".parse::<RentalStatus>(), Ok(RentalStatus::Reserved));
        assert_eq!("ACTIVE".parse::<RentalStatus>(), Ok(RentalStatus::Active));
        assert_eq!("completed".parse::<RentalStatus>(), Ok(RentalStatus::Completed));
        assert_eq!(" cancelled ".parse::<RentalStatus>(), Ok(RentalStatus::Cancelled));
        assert!("returned".parse::<RentalStatus>().is_err());
        assert!("".parse::<RentalStatus>().is_err());
    }

    #[test]
    fn overlapping_ranges_collide() {
        assert!(ranges_overlap(
            date(2024, 3, 10),
            date(2024, 3, 15),
            date(2024, 3, 14),
            date(2024, 3, 20),
        ));
        // Rango contenido dentro de otro
        assert!(ranges_overlap(
            date(2024, 3, 10),
            date(2024, 3, 20),
            date(2024, 3, 12),
            date(2024, 3, 14),
        ));
    }

    #[test]
    fn touching_ranges_do_not_collide() {
        // Uno termina exactamente cuando empieza el otro
        assert!(!ranges_overlap(
            date(2024, 3, 10),
            date(2024, 3, 15),
            date(2024, 3, 15),
            date(2024, 3, 20),
        ));
        assert!(!ranges_overlap(
            date(2024, 3, 15),
            date(2024, 3, 20),
            date(2024, 3, 10),
            date(2024, 3, 15),
        ));
    }

    #[test]
    fn cancelled_rental_never_blocks() {
        let rental = Rental {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            start_date: date(2024, 3, 10),
            end_date: date(2024, 3, 15),
            actual_return_date: None,
            total_cost: Decimal::ZERO,
            status: RentalStatus::Cancelled,
            start_mileage: None,
            end_mileage: None,
            notes: None,
            created_at: Utc::now(),
        };
        assert!(!rental.blocks(date(2024, 3, 10), date(2024, 3, 15)));
    }
}
