//! Implementaciones Postgres de los almacenes

pub mod rental_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use rental_repository::RentalRepository;
pub use user_repository::UserRepository;
pub use vehicle_repository::VehicleRepository;
