//! Repositorio en memoria
//!
//! Implementación respaldada por HashMap bajo RwLock, usada por la suite de
//! tests de integración y disponible para embebidos sin PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::rent_log::RentLog;
use crate::models::settlement::{SettlementScope, WeeklySettlement};
use crate::models::substitute::SubstituteShift;
use crate::models::vehicle::Vehicle;
use crate::models::week::WeekWindow;
use crate::repositories::FleetRepository;
use crate::utils::errors::AppResult;

#[derive(Default)]
struct Store {
    vehicles: HashMap<Uuid, Vehicle>,
    drivers: HashMap<Uuid, Driver>,
    rent_logs: Vec<RentLog>,
    substitutes: Vec<SubstituteShift>,
    settlements: HashMap<(Option<Uuid>, NaiveDate), WeeklySettlement>,
}

#[derive(Clone, Default)]
pub struct InMemoryFleetRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryFleetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_vehicle(&self, vehicle: Vehicle) {
        self.store.write().await.vehicles.insert(vehicle.id, vehicle);
    }

    pub async fn remove_vehicle(&self, id: Uuid) {
        self.store.write().await.vehicles.remove(&id);
    }

    pub async fn add_driver(&self, driver: Driver) {
        self.store.write().await.drivers.insert(driver.id, driver);
    }

    pub async fn add_rent_log(&self, log: RentLog) {
        self.store.write().await.rent_logs.push(log);
    }

    pub async fn add_substitute(&self, substitute: SubstituteShift) {
        self.store.write().await.substitutes.push(substitute);
    }

    pub async fn settlement_count(&self) -> usize {
        self.store.read().await.settlements.len()
    }
}

#[async_trait]
impl FleetRepository for InMemoryFleetRepository {
    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.store.read().await.vehicles.get(&id).cloned())
    }

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> =
            self.store.read().await.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| a.license_plate.cmp(&b.license_plate));
        Ok(vehicles)
    }

    async fn find_drivers(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Driver>> {
        let store = self.store.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| store.drivers.get(id).map(|d| (*id, d.clone())))
            .collect())
    }

    async fn rent_logs_in_window(
        &self,
        vehicle_id: Option<Uuid>,
        week: &WeekWindow,
    ) -> AppResult<Vec<RentLog>> {
        let store = self.store.read().await;
        Ok(store
            .rent_logs
            .iter()
            .filter(|log| week.contains(log.log_date))
            .filter(|log| vehicle_id.map_or(true, |id| log.vehicle_id == id))
            .cloned()
            .collect())
    }

    async fn substitutes_in_window(
        &self,
        vehicle_id: Option<Uuid>,
        week: &WeekWindow,
    ) -> AppResult<Vec<SubstituteShift>> {
        let store = self.store.read().await;
        Ok(store
            .substitutes
            .iter()
            .filter(|sub| week.contains(sub.work_date))
            .filter(|sub| vehicle_id.map_or(true, |id| sub.vehicle_id == id))
            .cloned()
            .collect())
    }

    async fn find_settlement(
        &self,
        scope: &SettlementScope,
        week: &WeekWindow,
    ) -> AppResult<Option<WeeklySettlement>> {
        let key = (scope.vehicle_id(), week.start());
        Ok(self.store.read().await.settlements.get(&key).cloned())
    }

    async fn upsert_settlement(&self, row: &WeeklySettlement) -> AppResult<WeeklySettlement> {
        let key = (row.vehicle_id, row.week_start);
        self.store
            .write()
            .await
            .settlements
            .insert(key, row.clone());
        Ok(row.clone())
    }
}
