mod config;
mod database;
mod dto;
mod middleware;
mod models;
mod pricing;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::EnvironmentConfig;
use middleware::auth::auth_middleware;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Car Rental Backend");
    info!("=====================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Database error: {}", e));
        }
    };

    database::run_migrations(&pool).await?;
    info!("✅ Migraciones aplicadas");

    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest(
            "/api/rentals",
            routes::create_rental_router()
                .layer(from_fn_with_state(app_state.clone(), auth_middleware)),
        )
        .nest(
            "/api/vehicles",
            routes::create_vehicle_router()
                .layer(from_fn_with_state(app_state.clone(), auth_middleware)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📋 Endpoints - Rentals:");
    info!("   POST /api/rentals - Crear alquiler");
    info!("   GET  /api/rentals - Listar alquileres (staff)");
    info!("   GET  /api/rentals/search - Consulta filtrada (staff)");
    info!("   GET  /api/rentals/strategies - Estrategias de precios");
    info!("   POST /api/rentals/calculate-price - Cotizar alquiler");
    info!("   GET  /api/rentals/customer/:user_id - Alquileres de un cliente");
    info!("   GET  /api/rentals/:id - Detalle de alquiler");
    info!("   PUT  /api/rentals/:id/complete - Completar alquiler (staff)");
    info!("   PUT  /api/rentals/:id/cancel - Cancelar alquiler");
    info!("   PUT  /api/rentals/:id/status - Forzar estado (staff)");
    info!("🚗 Endpoints - Vehicles:");
    info!("   POST /api/vehicles - Crear vehículo (staff)");
    info!("   GET  /api/vehicles - Listar vehículos");
    info!("   GET  /api/vehicles/:id - Obtener vehículo");
    info!("   PUT  /api/vehicles/:id - Actualizar vehículo (staff)");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo (staff)");
    info!("   GET  /api/vehicles/:id/availability - Chequear disponibilidad");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "car-rental-backend",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
