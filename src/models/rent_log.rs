//! Modelo de RentLog
//!
//! Un registro de renta por (conductor, vehículo, fecha, turno). Es la fuente
//! primaria de actividad semanal: viajes realizados y renta adeudada por el
//! conductor para ese turno.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Turno de trabajo - mapea al ENUM work_shift
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "work_shift", rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
}

/// Clave compuesta de actividad: como máximo un registro por
/// (conductor, fecha, turno)
pub type ActivityKey = (Uuid, NaiveDate, Shift);

/// RentLog principal - mapea exactamente a la tabla rent_logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RentLog {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub log_date: NaiveDate,
    pub shift: Shift,
    pub trip_count: i32,
    pub rent_amount: Decimal,
    pub cash_collected: Option<Decimal>,
    pub fuel_expense: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl RentLog {
    /// Clave tipada usada para deduplicar en la agregación
    pub fn activity_key(&self) -> ActivityKey {
        (self.driver_id, self.log_date, self.shift)
    }
}
