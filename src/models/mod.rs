//! Modelos de datos del sistema de alquiler

pub mod rental;
pub mod user;
pub mod vehicle;

pub use rental::{Rental, RentalStatus};
pub use user::{CustomerTier, User};
pub use vehicle::{Vehicle, VehicleCategory, VehicleStatus};
