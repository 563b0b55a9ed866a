//! Modelo de liquidación semanal
//!
//! La liquidación es un cálculo puro sobre los registros de la semana; la fila
//! persistida es una materialización explícita, nunca la fuente de verdad.
//! Se guarda una fila por (alcance, semana) y recalcular la sobreescribe.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::week::WeekWindow;

/// Alcance de una liquidación: un vehículo o la flota completa
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SettlementScope {
    Fleet,
    Vehicle(Uuid),
}

impl SettlementScope {
    pub fn vehicle_id(&self) -> Option<Uuid> {
        match self {
            SettlementScope::Fleet => None,
            SettlementScope::Vehicle(id) => Some(*id),
        }
    }
}

impl std::fmt::Display for SettlementScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementScope::Fleet => write!(f, "fleet"),
            SettlementScope::Vehicle(id) => write!(f, "vehicle {}", id),
        }
    }
}

/// Fila persistida - mapea exactamente a la tabla weekly_settlements.
/// `vehicle_id` NULL representa la fila de flota; `daily_rate` NULL aparece
/// solo en filas de flota, donde no existe un único tramo tarifario.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklySettlement {
    pub id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_trips: i64,
    pub daily_rate: Option<Decimal>,
    pub company_rent: Decimal,
    pub total_income: Decimal,
    pub profit: Decimal,
    pub processed_at: DateTime<Utc>,
}

/// Renta semanal de un conductor: días con actividad por tarifa diaria
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverRentSummary {
    pub driver_id: Uuid,
    pub driver_name: String,
    pub days_worked: u32,
    pub daily_rent: Decimal,
    pub total_rent: Decimal,
}

/// Resultado completo del cálculo semanal para un alcance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySettlementResult {
    pub scope: SettlementScope,
    pub week: WeekWindow,
    pub regular_trips: i64,
    pub substitute_trips: i64,
    pub total_trips: i64,
    pub daily_rate: Option<Decimal>,
    pub company_rent: Decimal,
    pub driver_rents: Vec<DriverRentSummary>,
    pub substitute_charge: Decimal,
    pub total_income: Decimal,
    pub profit: Decimal,
}

impl WeeklySettlementResult {
    /// Materializar el resultado como fila persistible
    pub fn to_row(&self) -> WeeklySettlement {
        WeeklySettlement {
            id: Uuid::new_v4(),
            vehicle_id: self.scope.vehicle_id(),
            week_start: self.week.start(),
            week_end: self.week.end(),
            total_trips: self.total_trips,
            daily_rate: self.daily_rate,
            company_rent: self.company_rent,
            total_income: self.total_income,
            profit: self.profit,
            processed_at: Utc::now(),
        }
    }
}

/// Fallo aislado de un vehículo dentro del procesamiento por lotes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementFailure {
    pub vehicle_id: Uuid,
    pub license_plate: String,
    pub error: String,
}

/// Reporte del procesamiento por lotes de una semana completa
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettlementReport {
    pub week: WeekWindow,
    pub processed: Vec<WeeklySettlementResult>,
    pub failures: Vec<SettlementFailure>,
}

impl BatchSettlementReport {
    pub fn total_vehicles(&self) -> usize {
        self.processed.len() + self.failures.len()
    }
}
