//! Rutas de la API

pub mod rental_routes;
pub mod vehicle_routes;

pub use rental_routes::create_rental_router;
pub use vehicle_routes::create_vehicle_router;
