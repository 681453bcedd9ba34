//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus enums asociados.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Rented,
    Maintenance,
    Retired,
}

/// Categoría del vehículo - mapea al ENUM vehicle_category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Economy,
    Compact,
    Midsize,
    Suv,
    Luxury,
    Van,
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub registration_number: String,
    pub year: i32,
    pub category: VehicleCategory,
    pub daily_rate: Decimal,
    pub status: VehicleStatus,
    pub mileage: i32,
    pub fuel_type: Option<String>,
    pub seating_capacity: i32,
    pub created_at: DateTime<Utc>,
}
