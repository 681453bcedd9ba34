//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::pricing::PricingEngine;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub pricing: PricingEngine,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            // El registro de estrategias se construye una sola vez al arrancar
            pricing: PricingEngine::new(),
        }
    }
}
