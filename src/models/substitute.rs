//! Modelo de SubstituteShift
//!
//! Conductor suplente que cubre un turno puntual. Cobra una tarifa plana
//! según la duración del turno; sus viajes se cuentan aparte y sí afectan
//! el tramo tarifario de la compañía.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::rent_log::Shift;

/// Duración del turno cubierto - mapea al ENUM shift_length
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "shift_length", rename_all = "lowercase")]
pub enum ShiftLength {
    Short,
    Medium,
    Long,
}

impl ShiftLength {
    /// Tarifa plana por duración del turno, independiente de los viajes
    pub fn default_charge(&self) -> Decimal {
        match self {
            ShiftLength::Short => Decimal::from(250),
            ShiftLength::Medium => Decimal::from(350),
            ShiftLength::Long => Decimal::from(500),
        }
    }
}

/// SubstituteShift principal - mapea exactamente a la tabla substitute_shifts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubstituteShift {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub name: String,
    pub work_date: NaiveDate,
    pub shift: Shift,
    pub shift_length: ShiftLength,
    pub charge: Decimal,
    pub trip_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl SubstituteShift {
    /// Viajes del suplente; si no se registraron, se asume 1
    pub fn trips(&self) -> i64 {
        i64::from(self.trip_count.unwrap_or(1))
    }
}
