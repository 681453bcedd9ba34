//! Servicios de negocio

pub mod rental_service;

pub use rental_service::{
    RentalDetails, RentalFilter, RentalService, RentalStore, UserDirectory, VehicleStore,
};
