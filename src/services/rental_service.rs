//! Servicio de alquileres
//!
//! Este módulo es el dueño de la máquina de estados del alquiler y de las
//! transiciones pareadas de estado del vehículo. Es el único mutador de
//! Rental y del subconjunto de Vehicle relevante para alquileres.
//!
//! Máquina de estados: `Reserved -> Active -> Completed` y
//! `Reserved -> Cancelled`. `update_rental_status` es la excepción
//! privilegiada (solo personal) que fuerza cualquier valor sin pasar por la
//! máquina.
//!
//! Atomicidad: cada operación mutadora hace exactamente un commit a través
//! de los métodos compuestos del `RentalStore` (`insert_with_vehicle` /
//! `save_with_vehicle`), que la implementación Postgres envuelve en una
//! transacción.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::rental::{Rental, RentalStatus};
use crate::models::user::User;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::pricing::PricingEngine;
use crate::utils::errors::{AppError, AppResult};

/// Vista detallada de un alquiler con sus filas relacionadas, cargadas bajo
/// demanda (claves foráneas planas, sin back-references vivas)
#[derive(Debug, Clone, serde::Serialize)]
pub struct RentalDetails {
    pub rental: Rental,
    pub vehicle: Vehicle,
    pub user: User,
}

/// Filtro de la consulta de gestión de alquileres
#[derive(Debug, Clone, Default)]
pub struct RentalFilter {
    pub status: Option<RentalStatus>,
    pub vehicle_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Almacén de alquileres
#[async_trait]
pub trait RentalStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Rental>>;
    async fn get_with_details(&self, id: Uuid) -> AppResult<Option<RentalDetails>>;
    async fn get_all(&self) -> AppResult<Vec<Rental>>;
    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Vec<Rental>>;
    async fn search(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>>;

    /// Chequeo optimista de disponibilidad: ¿hay algún alquiler no cancelado
    /// del vehículo cuyo rango abierto intersecte `[start, end)`?
    async fn is_vehicle_available(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Inserta el alquiler y actualiza el vehículo en una unidad atómica.
    /// Devuelve el número de filas afectadas.
    async fn insert_with_vehicle(&self, rental: &Rental, vehicle: &Vehicle) -> AppResult<u64>;

    /// Guarda alquiler y vehículo existentes en una unidad atómica.
    /// Devuelve el número de filas afectadas.
    async fn save_with_vehicle(&self, rental: &Rental, vehicle: &Vehicle) -> AppResult<u64>;
}

/// Almacén de vehículos (el servicio solo lee; las escrituras van en la
/// unidad atómica del RentalStore)
#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
}

/// Directorio de usuarios/identidad
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
}

/// Servicio del ciclo de vida de alquileres
pub struct RentalService {
    rentals: Arc<dyn RentalStore>,
    vehicles: Arc<dyn VehicleStore>,
    users: Arc<dyn UserDirectory>,
    pricing: PricingEngine,
}

impl RentalService {
    pub fn new(
        rentals: Arc<dyn RentalStore>,
        vehicles: Arc<dyn VehicleStore>,
        users: Arc<dyn UserDirectory>,
        pricing: PricingEngine,
    ) -> Self {
        Self {
            rentals,
            vehicles,
            users,
            pricing,
        }
    }

    /// Crear un alquiler en estado `Reserved` y marcar el vehículo como
    /// `Rented`, en un solo commit
    pub async fn create_rental(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        pricing_strategy: &str,
    ) -> AppResult<Rental> {
        // Chequeo optimista; la constraint de exclusión en la tabla cubre la
        // carrera entre dos creates concurrentes
        let available = self
            .rentals
            .is_vehicle_available(vehicle_id, start_date, end_date)
            .await?;
        if !available {
            return Err(AppError::Conflict(
                "Vehicle is not available for the selected dates".to_string(),
            ));
        }

        let mut vehicle = self
            .vehicles
            .get_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.is_customer() {
            return Err(AppError::BadRequest(
                "User does not hold the customer role".to_string(),
            ));
        }

        let total_cost = self
            .pricing
            .quote(pricing_strategy, &vehicle, start_date, end_date, &user);

        let rental = Rental {
            id: Uuid::new_v4(),
            user_id,
            vehicle_id,
            start_date,
            end_date,
            actual_return_date: None,
            total_cost,
            status: RentalStatus::Reserved,
            start_mileage: Some(vehicle.mileage),
            end_mileage: None,
            notes: None,
            created_at: Utc::now(),
        };

        vehicle.status = VehicleStatus::Rented;

        self.rentals.insert_with_vehicle(&rental, &vehicle).await?;

        info!(
            rental_id = %rental.id,
            vehicle_id = %vehicle_id,
            strategy = pricing_strategy,
            "Rental created"
        );
        Ok(rental)
    }

    /// Completar un alquiler activo: fija fecha real de devolución y
    /// kilometraje, y devuelve el vehículo a `Available`
    pub async fn complete_rental(&self, rental_id: Uuid, end_mileage: i32) -> AppResult<Rental> {
        let mut rental = self
            .rentals
            .get_by_id(rental_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rental not found".to_string()))?;

        if rental.status != RentalStatus::Active {
            return Err(AppError::Conflict(
                "Only an active rental can be completed".to_string(),
            ));
        }

        let mut vehicle = self
            .vehicles
            .get_by_id(rental.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        rental.status = RentalStatus::Completed;
        rental.actual_return_date = Some(Utc::now());
        rental.end_mileage = Some(end_mileage);

        vehicle.status = VehicleStatus::Available;
        vehicle.mileage = end_mileage;

        self.rentals.save_with_vehicle(&rental, &vehicle).await?;

        info!(rental_id = %rental.id, end_mileage, "Rental completed");
        Ok(rental)
    }

    /// Cancelar un alquiler. Un alquiler ya terminal (completado o
    /// cancelado) no se puede volver a cancelar.
    ///
    /// El vehículo solo se revierte a `Available` si estaba en `Rented`:
    /// un vehículo en mantenimiento no se toca.
    pub async fn cancel_rental(&self, rental_id: Uuid) -> AppResult<Rental> {
        let mut rental = self
            .rentals
            .get_by_id(rental_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rental not found".to_string()))?;

        if rental.status.is_terminal() {
            return Err(AppError::Conflict(
                "Rental is already completed or cancelled".to_string(),
            ));
        }

        let mut vehicle = self
            .vehicles
            .get_by_id(rental.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        rental.status = RentalStatus::Cancelled;

        if vehicle.status == VehicleStatus::Rented {
            vehicle.status = VehicleStatus::Available;
        }

        self.rentals.save_with_vehicle(&rental, &vehicle).await?;

        info!(rental_id = %rental.id, "Rental cancelled");
        Ok(rental)
    }

    /// Forzar el estado de un alquiler sin pasar por la máquina de estados.
    /// Operación privilegiada de personal para correcciones; el estado del
    /// vehículo se deriva del nuevo estado del alquiler.
    pub async fn update_rental_status(
        &self,
        rental_id: Uuid,
        status_name: &str,
    ) -> AppResult<Rental> {
        let status: RentalStatus = status_name
            .parse()
            .map_err(|e: String| AppError::BadRequest(e))?;

        let mut rental = self
            .rentals
            .get_by_id(rental_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rental not found".to_string()))?;

        let mut vehicle = self
            .vehicles
            .get_by_id(rental.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        rental.status = status;

        vehicle.status = match status {
            RentalStatus::Active | RentalStatus::Reserved => VehicleStatus::Rented,
            RentalStatus::Completed | RentalStatus::Cancelled => VehicleStatus::Available,
        };

        self.rentals.save_with_vehicle(&rental, &vehicle).await?;

        info!(rental_id = %rental.id, status = ?status, "Rental status forced");
        Ok(rental)
    }

    /// Cotizar un alquiler sin crear nada
    pub async fn calculate_price(
        &self,
        vehicle_id: Uuid,
        user_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        pricing_strategy: &str,
    ) -> AppResult<Decimal> {
        let vehicle = self
            .vehicles
            .get_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(self
            .pricing
            .quote(pricing_strategy, &vehicle, start_date, end_date, &user))
    }

    /// Vista detallada de un alquiler
    pub async fn get_rental(&self, rental_id: Uuid) -> AppResult<RentalDetails> {
        self.rentals
            .get_with_details(rental_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rental not found".to_string()))
    }

    pub async fn list_rentals(&self) -> AppResult<Vec<Rental>> {
        self.rentals.get_all().await
    }

    pub async fn rentals_by_user(&self, user_id: Uuid) -> AppResult<Vec<Rental>> {
        self.rentals.get_by_user(user_id).await
    }

    pub async fn search_rentals(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>> {
        self.rentals.search(filter).await
    }

    /// Nombres de estrategias de precios disponibles
    pub fn pricing_strategies(&self) -> Vec<&'static str> {
        self.pricing.available_strategies()
    }
}
