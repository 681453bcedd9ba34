//! Motor de precios
//!
//! Este módulo implementa el cálculo del precio total de un alquiler como un
//! conjunto cerrado de estrategias {Standard, Loyalty, Seasonal, Weekend}
//! seleccionables por nombre. El registro es inmutable, se construye una vez
//! al arrancar y se inyecta en el RentalService.
//!
//! Regla de días compartida por todas las estrategias:
//! `days = end.date - start.date` en días enteros; si el resultado es menor
//! que 1 se fija en 1. Un rango del mismo día factura siempre un día.
//!
//! Toda la aritmética usa `Decimal`; las estrategias no redondean.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use rust_decimal::Decimal;

use crate::models::user::CustomerTier;
use crate::models::User;
use crate::models::Vehicle;

/// Estrategia de precios: unión cerrada con un único punto de despacho
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingStrategy {
    /// `daily_rate * days`
    Standard,
    /// Descuento por tier: 0% Standard, 5% Silver, 10% Gold, 15% Platinum
    Loyalty,
    /// Recargo del 25% si el mes de inicio es temporada alta (jun-ago, dic)
    Seasonal,
    /// Recargo del 15% de la tarifa diaria por cada sábado/domingo en [start, end)
    Weekend,
}

/// Días facturables entre dos fechas, en días de calendario enteros.
/// Nunca menor que 1.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let days = (end.date_naive() - start.date_naive()).num_days();
    days.max(1)
}

/// Sábados y domingos dentro de `[start, end)`, inclusivo al inicio y
/// exclusivo al final
fn weekend_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let mut count = 0;
    let mut day = start.date_naive();
    let last = end.date_naive();
    while day < last {
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        day = day + Duration::days(1);
    }
    count
}

impl PricingStrategy {
    /// Calcula el precio total para el vehículo, rango de fechas y usuario.
    /// El resultado nunca es negativo.
    pub fn calculate(
        &self,
        vehicle: &Vehicle,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user: &User,
    ) -> Decimal {
        let days = Decimal::from(rental_days(start, end));
        let base = vehicle.daily_rate * days;

        match self {
            PricingStrategy::Standard => base,

            PricingStrategy::Loyalty => {
                let discount = match user.tier {
                    CustomerTier::Standard => Decimal::ZERO,
                    CustomerTier::Silver => Decimal::new(5, 2),
                    CustomerTier::Gold => Decimal::new(10, 2),
                    CustomerTier::Platinum => Decimal::new(15, 2),
                };
                base * (Decimal::ONE - discount)
            }

            PricingStrategy::Seasonal => {
                // Temporada alta decidida solo por el mes de inicio
                let month = start.date_naive().month();
                let high_season = (6..=8).contains(&month) || month == 12;
                if high_season {
                    base * Decimal::new(125, 2)
                } else {
                    base
                }
            }

            PricingStrategy::Weekend => {
                let surcharge = vehicle.daily_rate
                    * Decimal::from(weekend_days(start, end))
                    * Decimal::new(15, 2);
                base + surcharge
            }
        }
    }

    /// Nombre canónico con el que se registra la estrategia
    pub fn name(&self) -> &'static str {
        match self {
            PricingStrategy::Standard => "standard",
            PricingStrategy::Loyalty => "loyalty",
            PricingStrategy::Seasonal => "seasonal",
            PricingStrategy::Weekend => "weekend",
        }
    }
}

/// Registro inmutable de estrategias de precios
///
/// La resolución por nombre es case-insensitive y los nombres desconocidos o
/// vacíos caen en `Standard`. Es una política de fallback deliberada, no un
/// camino de error.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    strategies: &'static [PricingStrategy],
}

impl PricingEngine {
    pub fn new() -> Self {
        Self {
            strategies: &[
                PricingStrategy::Standard,
                PricingStrategy::Loyalty,
                PricingStrategy::Seasonal,
                PricingStrategy::Weekend,
            ],
        }
    }

    /// Resuelve una estrategia por nombre; nunca falla
    pub fn resolve(&self, name: &str) -> PricingStrategy {
        let wanted = name.trim().to_lowercase();
        self.strategies
            .iter()
            .copied()
            .find(|s| s.name() == wanted)
            .unwrap_or(PricingStrategy::Standard)
    }

    /// Cotiza un alquiler con la estrategia indicada
    pub fn quote(
        &self,
        strategy_name: &str,
        vehicle: &Vehicle,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user: &User,
    ) -> Decimal {
        self.resolve(strategy_name).calculate(vehicle, start, end, user)
    }

    /// Nombres de estrategias disponibles (para el endpoint de descubrimiento)
    pub fn available_strategies(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::{VehicleCategory, VehicleStatus};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn vehicle(daily_rate: Decimal) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            registration_number: "ABC-123".to_string(),
            year: 2022,
            category: VehicleCategory::Compact,
            daily_rate,
            status: VehicleStatus::Available,
            mileage: 42_000,
            fuel_type: Some("petrol".to_string()),
            seating_capacity: 5,
            created_at: Utc::now(),
        }
    }

    fn user(tier: CustomerTier) -> User {
        User {
            id: Uuid::new_v4(),
            email: "client@example.com".to_string(),
            full_name: "Test Client".to_string(),
            tier,
            roles: vec!["customer".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn day_count_clamps_to_one() {
        // Mismo día: siempre factura un día
        assert_eq!(rental_days(date(2024, 1, 10), date(2024, 1, 10)), 1);
        // Rango invertido: también 1 (lo rechaza una capa superior si molesta)
        assert_eq!(rental_days(date(2024, 1, 12), date(2024, 1, 10)), 1);
        assert_eq!(rental_days(date(2024, 1, 10), date(2024, 1, 13)), 3);
    }

    #[test]
    fn standard_pricing() {
        let v = vehicle(Decimal::from(50));
        let u = user(CustomerTier::Standard);
        let price = PricingStrategy::Standard.calculate(&v, date(2024, 1, 10), date(2024, 1, 13), &u);
        assert_eq!(price, Decimal::from(150));
    }

    #[test]
    fn loyalty_discount_by_tier() {
        let v = vehicle(Decimal::from(100));
        let start = date(2024, 1, 10);
        let end = date(2024, 1, 12);

        let gold = PricingStrategy::Loyalty.calculate(&v, start, end, &user(CustomerTier::Gold));
        assert_eq!(gold, Decimal::new(18000, 2)); // 200 * 0.90 = 180.00

        let standard =
            PricingStrategy::Loyalty.calculate(&v, start, end, &user(CustomerTier::Standard));
        assert_eq!(standard, Decimal::from(200));

        let silver = PricingStrategy::Loyalty.calculate(&v, start, end, &user(CustomerTier::Silver));
        assert_eq!(silver, Decimal::new(19000, 2));

        let platinum =
            PricingStrategy::Loyalty.calculate(&v, start, end, &user(CustomerTier::Platinum));
        assert_eq!(platinum, Decimal::new(17000, 2));
    }

    #[test]
    fn seasonal_surcharge_only_in_high_season() {
        let v = vehicle(Decimal::from(40));
        let u = user(CustomerTier::Standard);

        // Julio: temporada alta, 200 * 1.25 = 250
        let july = PricingStrategy::Seasonal.calculate(&v, date(2024, 7, 1), date(2024, 7, 6), &u);
        assert_eq!(july, Decimal::new(25000, 2));

        // Marzo: sin recargo
        let march = PricingStrategy::Seasonal.calculate(&v, date(2024, 3, 1), date(2024, 3, 6), &u);
        assert_eq!(march, Decimal::from(200));

        // Diciembre también es temporada alta
        let december =
            PricingStrategy::Seasonal.calculate(&v, date(2024, 12, 1), date(2024, 12, 6), &u);
        assert_eq!(december, Decimal::new(25000, 2));
    }

    #[test]
    fn weekend_surcharge_counts_saturdays_and_sundays() {
        let v = vehicle(Decimal::from(60));
        let u = user(CustomerTier::Standard);

        // 2024-01-12 es viernes, 2024-01-15 lunes: 3 días, 2 de fin de semana
        let price = PricingStrategy::Weekend.calculate(&v, date(2024, 1, 12), date(2024, 1, 15), &u);
        // base 180 + 60 * 2 * 0.15 = 198.00
        assert_eq!(price, Decimal::new(19800, 2));

        // Martes a jueves: sin días de fin de semana, solo base
        let midweek =
            PricingStrategy::Weekend.calculate(&v, date(2024, 1, 9), date(2024, 1, 11), &u);
        assert_eq!(midweek, Decimal::from(120));
    }

    #[test]
    fn unknown_strategy_falls_back_to_standard() {
        let engine = PricingEngine::new();
        assert_eq!(engine.resolve("platinum-special"), PricingStrategy::Standard);
        assert_eq!(engine.resolve(""), PricingStrategy::Standard);
        assert_eq!(engine.resolve("WEEKEND"), PricingStrategy::Weekend);
        assert_eq!(engine.resolve("Loyalty"), PricingStrategy::Loyalty);
    }

    #[test]
    fn engine_quote_matches_strategy() {
        let engine = PricingEngine::new();
        let v = vehicle(Decimal::from(50));
        let u = user(CustomerTier::Standard);
        let price = engine.quote("standard", &v, date(2024, 1, 10), date(2024, 1, 13), &u);
        assert_eq!(price, Decimal::from(150));
    }

    #[test]
    fn lists_registered_strategies() {
        let engine = PricingEngine::new();
        assert_eq!(
            engine.available_strategies(),
            vec!["standard", "loyalty", "seasonal", "weekend"]
        );
    }
}
