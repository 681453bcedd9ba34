//! DTOs de alquileres

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Request para crear un alquiler
///
/// El core fija los días en mínimo 1 y no rechaza rangos invertidos; la
/// prevención de rangos invertidos vive en esta capa.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_rental_dates"))]
pub struct CreateRentalRequest {
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Nombre de estrategia; desconocido o ausente cae en "standard"
    pub pricing_strategy: Option<String>,
}

fn validate_rental_dates(request: &CreateRentalRequest) -> Result<(), ValidationError> {
    if request.end_date <= request.start_date {
        return Err(ValidationError::new("end_date_not_after_start_date"));
    }
    Ok(())
}

/// Request para cotizar un alquiler
#[derive(Debug, Deserialize, Validate)]
pub struct CalculatePriceRequest {
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pricing_strategy: Option<String>,
}

/// Request para completar un alquiler
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteRentalRequest {
    #[validate(range(min = 0))]
    pub end_mileage: i32,
}

/// Request para forzar el estado de un alquiler (solo personal)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRentalStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

/// Parámetros de la consulta de gestión
#[derive(Debug, Deserialize)]
pub struct RentalSearchQuery {
    pub status: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Respuesta de cotización
#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub price: Decimal,
    pub pricing_strategy: String,
}

/// Respuesta del endpoint de descubrimiento de estrategias
#[derive(Debug, Serialize)]
pub struct StrategiesResponse {
    pub strategies: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_request(start: DateTime<Utc>, end: DateTime<Utc>) -> CreateRentalRequest {
        CreateRentalRequest {
            user_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            start_date: start,
            end_date: end,
            pricing_strategy: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn create_request_accepts_ordered_dates() {
        let request = create_request(date(2024, 3, 10), date(2024, 3, 13));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn create_request_rejects_inverted_dates() {
        let request = create_request(date(2024, 3, 13), date(2024, 3, 10));
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_equal_dates() {
        let request = create_request(date(2024, 3, 10), date(2024, 3, 10));
        assert!(request.validate().is_err());
    }
}
