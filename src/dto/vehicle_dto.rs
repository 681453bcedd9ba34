//! DTOs de vehículos

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::vehicle::{VehicleCategory, VehicleStatus};

/// Request para crear un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(min = 3, max = 50))]
    pub registration_number: String,

    #[validate(range(min = 1980, max = 2030))]
    pub year: i32,

    pub category: VehicleCategory,

    pub daily_rate: Decimal,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: Option<String>,

    #[validate(range(min = 1, max = 9))]
    pub seating_capacity: i32,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1980, max = 2030))]
    pub year: Option<i32>,

    pub category: Option<VehicleCategory>,

    pub daily_rate: Option<Decimal>,

    pub status: Option<VehicleStatus>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: Option<String>,

    #[validate(range(min = 1, max = 9))]
    pub seating_capacity: Option<i32>,
}

/// Filtros para búsqueda de vehículos
#[derive(Debug, Deserialize)]
pub struct VehicleFilters {
    pub status: Option<VehicleStatus>,
}

/// Rango de fechas para el chequeo de disponibilidad
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}
