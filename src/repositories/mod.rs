//! Repositorios de datos
//!
//! El motor lee y escribe a través del trait `FleetRepository`: la capa CRUD
//! HTTP y el almacenamiento concreto son colaboradores externos. Se incluye
//! la implementación PostgreSQL y una en memoria para tests y embebido.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::rent_log::RentLog;
use crate::models::settlement::{SettlementScope, WeeklySettlement};
use crate::models::substitute::SubstituteShift;
use crate::models::vehicle::Vehicle;
use crate::models::week::WeekWindow;
use crate::utils::errors::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryFleetRepository;
pub use postgres::PgFleetRepository;

/// Contrato de acceso a datos que necesita el motor de liquidaciones
#[async_trait]
pub trait FleetRepository: Send + Sync {
    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>>;

    /// Maestro de conductores para los ids referenciados por la semana
    async fn find_drivers(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Driver>>;

    /// Registros de renta dentro de la ventana; `vehicle_id` None = toda la flota
    async fn rent_logs_in_window(
        &self,
        vehicle_id: Option<Uuid>,
        week: &WeekWindow,
    ) -> AppResult<Vec<RentLog>>;

    /// Turnos de suplentes dentro de la ventana; `vehicle_id` None = toda la flota
    async fn substitutes_in_window(
        &self,
        vehicle_id: Option<Uuid>,
        week: &WeekWindow,
    ) -> AppResult<Vec<SubstituteShift>>;

    async fn find_settlement(
        &self,
        scope: &SettlementScope,
        week: &WeekWindow,
    ) -> AppResult<Option<WeeklySettlement>>;

    /// Insertar o sobreescribir la fila de liquidación de (alcance, semana)
    async fn upsert_settlement(&self, row: &WeeklySettlement) -> AppResult<WeeklySettlement>;
}
