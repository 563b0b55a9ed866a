//! Worker de liquidaciones semanales
//!
//! Procesa la liquidación de una semana completa: todos los vehículos más la
//! fila de flota, o un solo vehículo si se pasa su id.
//!
//! Uso: fleet_settlement [fecha YYYY-MM-DD] [vehicle-uuid]

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use dotenvy::dotenv;
use tracing::{info, warn};
use uuid::Uuid;

use fleet_settlement::config::database::DatabaseConfig;
use fleet_settlement::config::environment::EnvironmentConfig;
use fleet_settlement::models::settlement::SettlementScope;
use fleet_settlement::models::week::WeekWindow;
use fleet_settlement::repositories::PgFleetRepository;
use fleet_settlement::services::SettlementService;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("🛺 Fleet Settlement - Worker de liquidaciones semanales");
    info!("======================================================");

    let pool = DatabaseConfig::new(config.database_url.clone())
        .create_pool()
        .await?;

    let mut args = std::env::args().skip(1);

    // Cualquier fecha de la semana sirve; se normaliza al lunes ISO
    let date = match args.next() {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?,
        None => Utc::now().date_naive(),
    };
    let week = WeekWindow::containing(date);
    if date != week.start() {
        warn!("📅 Fecha {} normalizada al lunes {}", date, week.start());
    }
    info!("📅 Semana a liquidar: {}", week);

    let service = SettlementService::new(PgFleetRepository::new(pool));

    match args.next() {
        Some(raw) => {
            let vehicle_id: Uuid = raw.parse()?;
            let result = service
                .process_settlement(SettlementScope::Vehicle(vehicle_id), week)
                .await?;
            info!(
                "🚗 Vehículo {}: {} viajes, renta compañía {}, ingreso {}, ganancia {}",
                vehicle_id,
                result.total_trips,
                result.company_rent,
                result.total_income,
                result.profit
            );
            // Resultado completo para consumo por scripts
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        None => {
            let report = service.process_all_settlements(week).await?;
            info!(
                "📊 {} de {} vehículos liquidados",
                report.processed.len(),
                report.total_vehicles()
            );
            for result in &report.processed {
                info!(
                    "🚗 {}: {} viajes, renta compañía {}, ganancia {}",
                    result.scope, result.total_trips, result.company_rent, result.profit
                );
            }
            for failure in &report.failures {
                warn!(
                    "⚠️ {} ({}): {}",
                    failure.license_plate, failure.vehicle_id, failure.error
                );
            }

            // Fila agregada de flota para la misma semana
            let fleet = service
                .process_settlement(SettlementScope::Fleet, week)
                .await?;
            info!(
                "🏁 Flota: {} viajes, renta {}, ingreso {}, ganancia {}",
                fleet.total_trips, fleet.company_rent, fleet.total_income, fleet.profit
            );
            // Reporte completo para consumo por scripts
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    info!("👋 Worker terminado");
    Ok(())
}
