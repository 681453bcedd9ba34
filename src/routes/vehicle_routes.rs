//! Rutas de vehículos
//!
//! CRUD de la flota (solo personal para las mutaciones) y chequeo de
//! disponibilidad por rango de fechas.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    AvailabilityQuery, CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters,
};
use crate::dto::ApiResponse;
use crate::models::vehicle::Vehicle;
use crate::repositories::{RentalRepository, VehicleRepository};
use crate::services::rental_service::RentalStore;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::AuthUser;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
        .route("/:id/availability", get(check_availability))
}

fn require_staff(auth: &AuthUser) -> AppResult<()> {
    if !auth.is_staff() {
        return Err(AppError::Forbidden(
            "This operation requires a staff role".to_string(),
        ));
    }
    Ok(())
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    require_staff(&auth)?;
    request.validate()?;

    let repository = VehicleRepository::new(state.pool.clone());
    let vehicle = repository
        .create(
            request.brand,
            request.model,
            request.registration_number,
            request.year,
            request.category,
            request.daily_rate,
            request.mileage.unwrap_or(0),
            request.fuel_type,
            request.seating_capacity,
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        vehicle,
        "Vehicle created".to_string(),
    )))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let repository = VehicleRepository::new(state.pool.clone());
    let vehicles = repository.find_all(filters.status).await?;
    Ok(Json(vehicles))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    let repository = VehicleRepository::new(state.pool.clone());
    let vehicle = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;
    Ok(Json(vehicle))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    require_staff(&auth)?;
    request.validate()?;

    let repository = VehicleRepository::new(state.pool.clone());
    let vehicle = repository
        .update(
            id,
            request.brand,
            request.model,
            request.year,
            request.category,
            request.daily_rate,
            request.status,
            request.mileage,
            request.fuel_type,
            request.seating_capacity,
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        vehicle,
        "Vehicle updated".to_string(),
    )))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_staff(&auth)?;

    let repository = VehicleRepository::new(state.pool.clone());
    repository.delete(id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Vehicle deleted"
    })))
}

async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let rentals = RentalRepository::new(state.pool.clone());
    let available = rentals
        .is_vehicle_available(id, query.start_date, query.end_date)
        .await?;

    Ok(Json(json!({
        "vehicle_id": id,
        "start_date": query.start_date,
        "end_date": query.end_date,
        "available": available
    })))
}
