//! Servicio de liquidación semanal
//!
//! Combina la agregación semanal con el tramo tarifario de la compañía para
//! producir la ganancia o pérdida de la semana. El cálculo es un pliegue puro
//! sobre el snapshot del repositorio; persistir es un paso explícito que
//! sobreescribe la fila anterior de (alcance, semana).

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::rent_log::RentLog;
use crate::models::settlement::{
    BatchSettlementReport, SettlementFailure, SettlementScope, WeeklySettlement,
    WeeklySettlementResult,
};
use crate::models::substitute::SubstituteShift;
use crate::models::vehicle::Vehicle;
use crate::models::week::WeekWindow;
use crate::repositories::FleetRepository;
use crate::services::aggregation_service::{aggregate_week, dedup_rent_logs};
use crate::services::rate_service::get_rental_rate;
use crate::utils::errors::{not_found_error, AppResult};

pub struct SettlementService<R: FleetRepository> {
    repository: R,
}

impl<R: FleetRepository> SettlementService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Calcular la liquidación de una semana sin persistir nada.
    ///
    /// Volver a llamar con los mismos datos fuente produce el mismo
    /// resultado: no hay estado acumulado entre llamadas.
    pub async fn compute_weekly_settlement(
        &self,
        scope: SettlementScope,
        week: WeekWindow,
    ) -> AppResult<WeeklySettlementResult> {
        match scope {
            SettlementScope::Vehicle(vehicle_id) => {
                let vehicle = self
                    .repository
                    .find_vehicle(vehicle_id)
                    .await?
                    .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;
                self.compute_vehicle(&vehicle, &week).await
            }
            SettlementScope::Fleet => self.compute_fleet(&week).await,
        }
    }

    /// Calcular y materializar la fila de (alcance, semana).
    /// Reprocesar siempre sobreescribe: última escritura gana.
    pub async fn process_settlement(
        &self,
        scope: SettlementScope,
        week: WeekWindow,
    ) -> AppResult<WeeklySettlementResult> {
        let result = self.compute_weekly_settlement(scope, week).await?;
        self.repository.upsert_settlement(&result.to_row()).await?;
        info!(
            "💾 Liquidación guardada: {} semana {} → ganancia {}",
            result.scope, result.week, result.profit
        );
        Ok(result)
    }

    /// Procesar todos los vehículos de la flota para una semana.
    ///
    /// El fallo de un vehículo se registra y no aborta el lote: el reporte
    /// lista los procesados y los fallidos por separado.
    pub async fn process_all_settlements(
        &self,
        week: WeekWindow,
    ) -> AppResult<BatchSettlementReport> {
        let vehicles = self.repository.list_vehicles().await?;
        info!(
            "🔄 Procesando liquidaciones de {} vehículos para la semana {}",
            vehicles.len(),
            week
        );

        let mut processed = Vec::new();
        let mut failures = Vec::new();

        for vehicle in vehicles {
            match self.process_vehicle(&vehicle, &week).await {
                Ok(result) => processed.push(result),
                Err(e) => {
                    error!(
                        "❌ Error liquidando vehículo {} ({}): {}",
                        vehicle.license_plate, vehicle.id, e
                    );
                    failures.push(SettlementFailure {
                        vehicle_id: vehicle.id,
                        license_plate: vehicle.license_plate.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "✅ Lote completado: {} procesados, {} fallidos",
            processed.len(),
            failures.len()
        );

        Ok(BatchSettlementReport {
            week,
            processed,
            failures,
        })
    }

    /// Fila persistida de (alcance, semana), si la semana ya fue procesada
    pub async fn find_stored_settlement(
        &self,
        scope: SettlementScope,
        week: WeekWindow,
    ) -> AppResult<Option<WeeklySettlement>> {
        self.repository.find_settlement(&scope, &week).await
    }

    async fn process_vehicle(
        &self,
        vehicle: &Vehicle,
        week: &WeekWindow,
    ) -> AppResult<WeeklySettlementResult> {
        let result = self.compute_vehicle(vehicle, week).await?;
        self.repository.upsert_settlement(&result.to_row()).await?;
        Ok(result)
    }

    async fn compute_vehicle(
        &self,
        vehicle: &Vehicle,
        week: &WeekWindow,
    ) -> AppResult<WeeklySettlementResult> {
        let logs = self
            .repository
            .rent_logs_in_window(Some(vehicle.id), week)
            .await?;
        let substitutes = self
            .repository
            .substitutes_in_window(Some(vehicle.id), week)
            .await?;

        let mut driver_ids: Vec<Uuid> = logs.iter().map(|log| log.driver_id).collect();
        driver_ids.sort();
        driver_ids.dedup();
        let drivers = self.repository.find_drivers(&driver_ids).await?;

        let activity = aggregate_week(week, &logs, &substitutes, &drivers)?;

        let daily_rate = get_rental_rate(vehicle.company, activity.total_trips);
        let company_rent = daily_rate * Decimal::from(7);

        Ok(WeeklySettlementResult {
            scope: SettlementScope::Vehicle(vehicle.id),
            week: *week,
            regular_trips: activity.regular_trips,
            substitute_trips: activity.substitute_trips,
            total_trips: activity.total_trips,
            daily_rate: Some(daily_rate),
            company_rent,
            driver_rents: activity.driver_rents,
            substitute_charge: activity.substitute_charge,
            total_income: activity.total_income,
            profit: activity.total_income - company_rent,
        })
    }

    /// La liquidación de flota agrega la actividad de toda la flota de una
    /// sola vez: la deduplicación por (conductor, fecha, turno) y los días
    /// trabajados por conductor son globales, no por vehículo. Solo la renta
    /// de compañía se resuelve vehículo por vehículo, porque cada uno cae en
    /// el tramo de su propia compañía con sus propios viajes; por eso la fila
    /// de flota no tiene una tarifa diaria única.
    ///
    /// Un vehículo con registros irresolubles (conductor inexistente,
    /// vehículo fuera del maestro) se excluye con un error registrado y no
    /// aborta la liquidación del resto de la flota.
    async fn compute_fleet(&self, week: &WeekWindow) -> AppResult<WeeklySettlementResult> {
        let vehicles = self.repository.list_vehicles().await?;
        let logs = self.repository.rent_logs_in_window(None, week).await?;
        let substitutes = self.repository.substitutes_in_window(None, week).await?;

        let deduped = dedup_rent_logs(week, &logs);

        let mut driver_ids: Vec<Uuid> = deduped.iter().map(|log| log.driver_id).collect();
        driver_ids.sort();
        driver_ids.dedup();
        let drivers = self.repository.find_drivers(&driver_ids).await?;

        let fleet_ids: HashSet<Uuid> = vehicles.iter().map(|v| v.id).collect();

        // Excluir vehículos con registros irresolubles sin abortar el resto
        let mut excluded: HashSet<Uuid> = HashSet::new();
        for log in &deduped {
            if !fleet_ids.contains(&log.vehicle_id) {
                if excluded.insert(log.vehicle_id) {
                    error!(
                        "❌ Registros de un vehículo fuera del maestro ({}): excluido de la semana {}",
                        log.vehicle_id, week
                    );
                }
            } else if !drivers.contains_key(&log.driver_id) {
                if excluded.insert(log.vehicle_id) {
                    error!(
                        "❌ Vehículo {} referencia al conductor inexistente {}: excluido de la semana {}",
                        log.vehicle_id, log.driver_id, week
                    );
                }
            }
        }

        let kept_logs: Vec<RentLog> = deduped
            .into_iter()
            .filter(|log| !excluded.contains(&log.vehicle_id))
            .collect();
        let kept_subs: Vec<SubstituteShift> = substitutes
            .into_iter()
            .filter(|sub| fleet_ids.contains(&sub.vehicle_id) && !excluded.contains(&sub.vehicle_id))
            .collect();

        let activity = aggregate_week(week, &kept_logs, &kept_subs, &drivers)?;

        // Viajes por vehículo, solo para resolver el tramo de cada compañía
        let mut trips_by_vehicle: HashMap<Uuid, i64> = HashMap::new();
        for log in &kept_logs {
            *trips_by_vehicle.entry(log.vehicle_id).or_default() += i64::from(log.trip_count);
        }
        for sub in &kept_subs {
            *trips_by_vehicle.entry(sub.vehicle_id).or_default() += sub.trips();
        }

        let mut company_rent = Decimal::ZERO;
        for vehicle in vehicles.iter().filter(|v| !excluded.contains(&v.id)) {
            let trips = trips_by_vehicle.get(&vehicle.id).copied().unwrap_or(0);
            company_rent += get_rental_rate(vehicle.company, trips) * Decimal::from(7);
        }

        Ok(WeeklySettlementResult {
            scope: SettlementScope::Fleet,
            week: *week,
            regular_trips: activity.regular_trips,
            substitute_trips: activity.substitute_trips,
            total_trips: activity.total_trips,
            daily_rate: None,
            company_rent,
            driver_rents: activity.driver_rents,
            substitute_charge: activity.substitute_charge,
            total_income: activity.total_income,
            profit: activity.total_income - company_rent,
        })
    }
}
