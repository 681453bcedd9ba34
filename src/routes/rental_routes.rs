//! Rutas de alquileres
//!
//! Handlers REST sobre el RentalService. Las políticas de autorización del
//! lado del caller viven aquí: las rutas de gestión exigen personal, y un
//! cliente solo puede cancelar sus propios alquileres en estado Reserved.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::rental_dto::{
    CalculatePriceRequest, CompleteRentalRequest, CreateRentalRequest, PriceResponse,
    RentalSearchQuery, StrategiesResponse, UpdateRentalStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::rental::{Rental, RentalStatus};
use crate::repositories::{RentalRepository, UserRepository, VehicleRepository};
use crate::services::rental_service::{RentalDetails, RentalFilter, RentalService};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::AuthUser;

pub fn create_rental_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_rental))
        .route("/", get(list_rentals))
        .route("/search", get(search_rentals))
        .route("/strategies", get(list_strategies))
        .route("/calculate-price", post(calculate_price))
        .route("/customer/:user_id", get(rentals_by_customer))
        .route("/:id", get(get_rental))
        .route("/:id/complete", put(complete_rental))
        .route("/:id/cancel", put(cancel_rental))
        .route("/:id/status", put(update_rental_status))
}

fn rental_service(state: &AppState) -> RentalService {
    RentalService::new(
        Arc::new(RentalRepository::new(state.pool.clone())),
        Arc::new(VehicleRepository::new(state.pool.clone())),
        Arc::new(UserRepository::new(state.pool.clone())),
        state.pricing.clone(),
    )
}

fn require_staff(auth: &AuthUser) -> AppResult<()> {
    if !auth.is_staff() {
        return Err(AppError::Forbidden(
            "This operation requires a staff role".to_string(),
        ));
    }
    Ok(())
}

async fn create_rental(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateRentalRequest>,
) -> Result<Json<ApiResponse<Rental>>, AppError> {
    request.validate()?;

    // Un cliente solo puede reservar a su propio nombre
    if !auth.is_staff() && request.user_id != auth.id {
        return Err(AppError::Forbidden(
            "Customers can only create their own rentals".to_string(),
        ));
    }

    let strategy = request.pricing_strategy.as_deref().unwrap_or("standard");
    let rental = rental_service(&state)
        .create_rental(
            request.user_id,
            request.vehicle_id,
            request.start_date,
            request.end_date,
            strategy,
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        rental,
        "Rental created".to_string(),
    )))
}

async fn list_rentals(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Rental>>, AppError> {
    require_staff(&auth)?;
    let rentals = rental_service(&state).list_rentals().await?;
    Ok(Json(rentals))
}

async fn search_rentals(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RentalSearchQuery>,
) -> Result<Json<Vec<Rental>>, AppError> {
    require_staff(&auth)?;

    let status = match query.status.as_deref() {
        Some(s) => Some(
            s.parse::<RentalStatus>()
                .map_err(|e| AppError::BadRequest(e))?,
        ),
        None => None,
    };

    let filter = RentalFilter {
        status,
        vehicle_id: query.vehicle_id,
        user_id: query.user_id,
        from: query.from,
        to: query.to,
    };

    let rentals = rental_service(&state).search_rentals(&filter).await?;
    Ok(Json(rentals))
}

async fn list_strategies(State(state): State<AppState>) -> Json<StrategiesResponse> {
    Json(StrategiesResponse {
        strategies: state.pricing.available_strategies(),
    })
}

async fn calculate_price(
    State(state): State<AppState>,
    Json(request): Json<CalculatePriceRequest>,
) -> Result<Json<PriceResponse>, AppError> {
    request.validate()?;

    let strategy = request.pricing_strategy.as_deref().unwrap_or("standard");
    let price = rental_service(&state)
        .calculate_price(
            request.vehicle_id,
            request.user_id,
            request.start_date,
            request.end_date,
            strategy,
        )
        .await?;

    Ok(Json(PriceResponse {
        price,
        pricing_strategy: state.pricing.resolve(strategy).name().to_string(),
    }))
}

async fn rentals_by_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Rental>>, AppError> {
    // Un cliente solo ve su propio historial
    if !auth.is_staff() && user_id != auth.id {
        return Err(AppError::Forbidden(
            "Customers can only list their own rentals".to_string(),
        ));
    }

    let rentals = rental_service(&state).rentals_by_user(user_id).await?;
    Ok(Json(rentals))
}

async fn get_rental(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<RentalDetails>, AppError> {
    let details = rental_service(&state).get_rental(id).await?;

    if !auth.is_staff() && details.rental.user_id != auth.id {
        return Err(AppError::Forbidden(
            "Customers can only view their own rentals".to_string(),
        ));
    }

    Ok(Json(details))
}

async fn complete_rental(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteRentalRequest>,
) -> Result<Json<Rental>, AppError> {
    require_staff(&auth)?;
    request.validate()?;

    let rental = rental_service(&state)
        .complete_rental(id, request.end_mileage)
        .await?;
    Ok(Json(rental))
}

/// Política del caller para cancelaciones: un cliente solo cancela lo suyo
/// y solo mientras sigue en Reserved; el personal cancela en cualquier estado
fn authorize_cancel(auth: &AuthUser, rental: &Rental) -> AppResult<()> {
    if auth.is_staff() {
        return Ok(());
    }
    if rental.user_id != auth.id {
        return Err(AppError::Forbidden(
            "Customers can only cancel their own rentals".to_string(),
        ));
    }
    if rental.status != RentalStatus::Reserved {
        return Err(AppError::Forbidden(
            "Customers can only cancel rentals that are still reserved".to_string(),
        ));
    }
    Ok(())
}

async fn cancel_rental(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Rental>, AppError> {
    let service = rental_service(&state);

    if !auth.is_staff() {
        let details = service.get_rental(id).await?;
        authorize_cancel(&auth, &details.rental)?;
    }

    let rental = service.cancel_rental(id).await?;
    Ok(Json(rental))
}

async fn update_rental_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRentalStatusRequest>,
) -> Result<Json<Rental>, AppError> {
    require_staff(&auth)?;
    request.validate()?;

    let rental = rental_service(&state)
        .update_rental_status(id, &request.status)
        .await?;
    Ok(Json(rental))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn rental_for(user_id: Uuid, status: RentalStatus) -> Rental {
        Rental {
            id: Uuid::new_v4(),
            user_id,
            vehicle_id: Uuid::new_v4(),
            start_date: Utc::now(),
            end_date: Utc::now(),
            actual_return_date: None,
            total_cost: Decimal::from(150),
            status,
            start_mileage: Some(10_000),
            end_mileage: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn customer_auth(id: Uuid) -> AuthUser {
        AuthUser {
            id,
            roles: vec!["customer".to_string()],
        }
    }

    fn staff_auth() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            roles: vec!["employee".to_string()],
        }
    }

    #[test]
    fn customer_may_cancel_own_reserved_rental() {
        let auth = customer_auth(Uuid::new_v4());
        let rental = rental_for(auth.id, RentalStatus::Reserved);

        assert!(authorize_cancel(&auth, &rental).is_ok());
    }

    #[test]
    fn customer_may_not_cancel_someone_elses_rental() {
        let auth = customer_auth(Uuid::new_v4());
        let rental = rental_for(Uuid::new_v4(), RentalStatus::Reserved);

        let err = authorize_cancel(&auth, &rental).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn customer_may_not_cancel_once_rental_is_active() {
        let auth = customer_auth(Uuid::new_v4());
        let rental = rental_for(auth.id, RentalStatus::Active);

        let err = authorize_cancel(&auth, &rental).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn staff_may_cancel_any_rental_at_any_status() {
        let auth = staff_auth();

        for status in [
            RentalStatus::Reserved,
            RentalStatus::Active,
            RentalStatus::Completed,
            RentalStatus::Cancelled,
        ] {
            let rental = rental_for(Uuid::new_v4(), status);
            assert!(authorize_cancel(&auth, &rental).is_ok());
        }
    }
}
