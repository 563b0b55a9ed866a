//! Modelo de Driver
//!
//! Conductor regular de la flota. La renta diaria depende de si la compañía
//! le provee alojamiento o no; son las dos únicas tarifas fijas por día.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Renta diaria para conductores con alojamiento provisto
pub const DAILY_RENT_WITH_ACCOMMODATION: i64 = 600;

/// Renta diaria para conductores sin alojamiento
pub const DAILY_RENT_WITHOUT_ACCOMMODATION: i64 = 500;

/// Driver principal - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub has_accommodation: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    /// Renta diaria que debe el conductor por cada día trabajado
    pub fn daily_rent(&self) -> Decimal {
        if self.has_accommodation {
            Decimal::from(DAILY_RENT_WITH_ACCOMMODATION)
        } else {
            Decimal::from(DAILY_RENT_WITHOUT_ACCOMMODATION)
        }
    }
}
