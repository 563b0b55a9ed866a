//! Implementación PostgreSQL del repositorio de flota

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::rent_log::RentLog;
use crate::models::settlement::{SettlementScope, WeeklySettlement};
use crate::models::substitute::SubstituteShift;
use crate::models::vehicle::Vehicle;
use crate::models::week::WeekWindow;
use crate::repositories::FleetRepository;
use crate::utils::errors::AppResult;

pub struct PgFleetRepository {
    pool: PgPool,
}

impl PgFleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FleetRepository for PgFleetRepository {
    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY license_plate")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    async fn find_drivers(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Driver>> {
        let drivers = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(drivers.into_iter().map(|d| (d.id, d)).collect())
    }

    async fn rent_logs_in_window(
        &self,
        vehicle_id: Option<Uuid>,
        week: &WeekWindow,
    ) -> AppResult<Vec<RentLog>> {
        let logs = sqlx::query_as::<_, RentLog>(
            r#"
            SELECT * FROM rent_logs
            WHERE log_date BETWEEN $1 AND $2
              AND ($3::uuid IS NULL OR vehicle_id = $3)
            ORDER BY log_date, shift
            "#,
        )
        .bind(week.start())
        .bind(week.end())
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    async fn substitutes_in_window(
        &self,
        vehicle_id: Option<Uuid>,
        week: &WeekWindow,
    ) -> AppResult<Vec<SubstituteShift>> {
        let substitutes = sqlx::query_as::<_, SubstituteShift>(
            r#"
            SELECT * FROM substitute_shifts
            WHERE work_date BETWEEN $1 AND $2
              AND ($3::uuid IS NULL OR vehicle_id = $3)
            ORDER BY work_date, shift
            "#,
        )
        .bind(week.start())
        .bind(week.end())
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(substitutes)
    }

    async fn find_settlement(
        &self,
        scope: &SettlementScope,
        week: &WeekWindow,
    ) -> AppResult<Option<WeeklySettlement>> {
        let settlement = sqlx::query_as::<_, WeeklySettlement>(
            r#"
            SELECT * FROM weekly_settlements
            WHERE vehicle_id IS NOT DISTINCT FROM $1 AND week_start = $2
            "#,
        )
        .bind(scope.vehicle_id())
        .bind(week.start())
        .fetch_optional(&self.pool)
        .await?;

        Ok(settlement)
    }

    async fn upsert_settlement(&self, row: &WeeklySettlement) -> AppResult<WeeklySettlement> {
        // La fila de flota tiene vehicle_id NULL, por eso el upsert va en dos
        // pasos con IS NOT DISTINCT FROM en lugar de ON CONFLICT
        let updated = sqlx::query_as::<_, WeeklySettlement>(
            r#"
            UPDATE weekly_settlements
            SET total_trips = $3, daily_rate = $4, company_rent = $5,
                total_income = $6, profit = $7, processed_at = $8
            WHERE vehicle_id IS NOT DISTINCT FROM $1 AND week_start = $2
            RETURNING *
            "#,
        )
        .bind(row.vehicle_id)
        .bind(row.week_start)
        .bind(row.total_trips)
        .bind(row.daily_rate)
        .bind(row.company_rent)
        .bind(row.total_income)
        .bind(row.profit)
        .bind(row.processed_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(settlement) = updated {
            return Ok(settlement);
        }

        let inserted = sqlx::query_as::<_, WeeklySettlement>(
            r#"
            INSERT INTO weekly_settlements
                (id, vehicle_id, week_start, week_end, total_trips, daily_rate,
                 company_rent, total_income, profit, processed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(row.vehicle_id)
        .bind(row.week_start)
        .bind(row.week_end)
        .bind(row.total_trips)
        .bind(row.daily_rate)
        .bind(row.company_rent)
        .bind(row.total_income)
        .bind(row.profit)
        .bind(row.processed_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }
}
