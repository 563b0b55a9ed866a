//! Agregación semanal de actividad
//!
//! Pliegue puro sobre los registros ya leídos de una semana: deduplica por
//! clave tipada (conductor, fecha, turno), suma viajes, calcula la renta de
//! cada conductor por días realmente trabajados y suma cargos de suplentes.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::rent_log::{ActivityKey, RentLog};
use crate::models::settlement::DriverRentSummary;
use crate::models::substitute::SubstituteShift;
use crate::models::week::WeekWindow;
use crate::utils::errors::{not_found_error, AppResult};

/// Actividad agregada de una semana, lista para liquidar
#[derive(Debug, Clone)]
pub struct WeeklyActivity {
    pub regular_trips: i64,
    pub substitute_trips: i64,
    pub total_trips: i64,
    pub driver_rents: Vec<DriverRentSummary>,
    pub substitute_charge: Decimal,
    pub total_income: Decimal,
}

/// Deduplicar registros por la clave compuesta (conductor, fecha, turno).
///
/// La clave es única en todo el sistema, no por vehículo: el mismo conductor
/// no puede cubrir el mismo turno dos veces aunque los registros apunten a
/// vehículos distintos. Gana el primero; el resto se descarta con warning.
pub fn dedup_rent_logs(week: &WeekWindow, logs: &[RentLog]) -> Vec<RentLog> {
    let mut seen: HashSet<ActivityKey> = HashSet::new();
    let mut kept: Vec<RentLog> = Vec::with_capacity(logs.len());

    for log in logs {
        if seen.insert(log.activity_key()) {
            kept.push(log.clone());
        } else {
            warn!(
                "⚠️ Registro duplicado descartado: driver {} fecha {} turno {:?} (semana {})",
                log.driver_id, log.log_date, log.shift, week
            );
        }
    }

    kept
}

/// Agregar la actividad de una semana.
///
/// `drivers` es el maestro de conductores referenciados por los registros;
/// un conductor ausente aborta el cálculo con NotFound. Los registros
/// duplicados por (conductor, fecha, turno) se descartan con un warning:
/// gana el primero.
pub fn aggregate_week(
    week: &WeekWindow,
    logs: &[RentLog],
    substitutes: &[SubstituteShift],
    drivers: &HashMap<Uuid, Driver>,
) -> AppResult<WeeklyActivity> {
    // 1. Deduplicar por clave compuesta tipada
    let kept = dedup_rent_logs(week, logs);

    // 2. Viajes regulares y días trabajados por conductor
    let regular_trips: i64 = kept.iter().map(|log| i64::from(log.trip_count)).sum();

    let mut days_by_driver: HashMap<Uuid, BTreeSet<NaiveDate>> = HashMap::new();
    for log in &kept {
        days_by_driver
            .entry(log.driver_id)
            .or_default()
            .insert(log.log_date);
    }

    // 3. Renta por conductor: tarifa diaria por días con actividad
    let mut driver_rents = Vec::with_capacity(days_by_driver.len());
    for (driver_id, days) in days_by_driver {
        let driver = drivers
            .get(&driver_id)
            .ok_or_else(|| not_found_error("Driver", &driver_id.to_string()))?;

        let days_worked = days.len() as u32;
        let daily_rent = driver.daily_rent();
        driver_rents.push(DriverRentSummary {
            driver_id,
            driver_name: driver.name.clone(),
            days_worked,
            daily_rent,
            total_rent: daily_rent * Decimal::from(days_worked),
        });
    }
    // Orden estable para salida determinista
    driver_rents.sort_by(|a, b| a.driver_name.cmp(&b.driver_name));

    // 4. Suplentes: cargo plano por turno, viajes contados aparte
    let substitute_trips: i64 = substitutes.iter().map(|sub| sub.trips()).sum();
    let substitute_charge: Decimal = substitutes.iter().map(|sub| sub.charge).sum();

    let driver_rent_total: Decimal = driver_rents.iter().map(|d| d.total_rent).sum();

    Ok(WeeklyActivity {
        regular_trips,
        substitute_trips,
        total_trips: regular_trips + substitute_trips,
        driver_rents,
        substitute_charge,
        total_income: driver_rent_total + substitute_charge,
    })
}
