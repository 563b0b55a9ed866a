//! Tests de integración del motor de liquidaciones sobre el repositorio
//! en memoria.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use fleet_settlement::models::company::Company;
use fleet_settlement::models::driver::Driver;
use fleet_settlement::models::rent_log::{RentLog, Shift};
use fleet_settlement::models::settlement::SettlementScope;
use fleet_settlement::models::substitute::{ShiftLength, SubstituteShift};
use fleet_settlement::models::vehicle::{Vehicle, VehicleStatus};
use fleet_settlement::models::week::WeekWindow;
use fleet_settlement::repositories::InMemoryFleetRepository;
use fleet_settlement::services::SettlementService;
use fleet_settlement::utils::errors::AppError;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn week() -> WeekWindow {
    // Lunes 2025-06-02
    WeekWindow::from_monday(date(2)).unwrap()
}

fn vehicle(company: Company, plate: &str) -> Vehicle {
    Vehicle {
        id: Uuid::new_v4(),
        company,
        license_plate: plate.to_string(),
        status: VehicleStatus::Active,
        created_at: Utc::now(),
    }
}

fn driver(name: &str, has_accommodation: bool) -> Driver {
    Driver {
        id: Uuid::new_v4(),
        name: name.to_string(),
        has_accommodation,
        active: true,
        created_at: Utc::now(),
    }
}

fn rent_log(vehicle_id: Uuid, driver_id: Uuid, day: u32, shift: Shift, trips: i32) -> RentLog {
    RentLog {
        id: Uuid::new_v4(),
        vehicle_id,
        driver_id,
        log_date: date(day),
        shift,
        trip_count: trips,
        rent_amount: Decimal::from(600),
        cash_collected: None,
        fuel_expense: None,
        created_at: Utc::now(),
    }
}

fn substitute(vehicle_id: Uuid, day: u32, length: ShiftLength, trips: Option<i32>) -> SubstituteShift {
    SubstituteShift {
        id: Uuid::new_v4(),
        vehicle_id,
        name: "Suplente".to_string(),
        work_date: date(day),
        shift: Shift::Evening,
        shift_length: length,
        charge: length.default_charge(),
        trip_count: trips,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn zero_trip_week_settles_at_worst_slab() {
    let repo = InMemoryFleetRepository::new();
    let v = vehicle(Company::Pmv, "KA-01-1234");
    let vehicle_id = v.id;
    repo.add_vehicle(v).await;

    let service = SettlementService::new(repo);
    let result = service
        .compute_weekly_settlement(SettlementScope::Vehicle(vehicle_id), week())
        .await
        .unwrap();

    // Sin viajes la tarifa cae al tramo más caro por diseño
    assert_eq!(result.total_trips, 0);
    assert_eq!(result.daily_rate, Some(Decimal::from(640)));
    assert_eq!(result.company_rent, Decimal::from(4480));
    assert_eq!(result.total_income, Decimal::ZERO);
    assert_eq!(result.profit, Decimal::from(-4480));
}

#[tokio::test]
async fn full_week_reaches_best_slab() {
    let repo = InMemoryFleetRepository::new();
    let v = vehicle(Company::Pmv, "KA-01-1234");
    let d = driver("Ramesh", true);
    let vehicle_id = v.id;
    repo.add_vehicle(v).await;
    repo.add_driver(d.clone()).await;

    // 5 días, dos turnos de 15 viajes → 150 viajes, tarifa 150/día
    for day in 2..7 {
        repo.add_rent_log(rent_log(vehicle_id, d.id, day, Shift::Morning, 15))
            .await;
        repo.add_rent_log(rent_log(vehicle_id, d.id, day, Shift::Evening, 15))
            .await;
    }

    let service = SettlementService::new(repo);
    let result = service
        .compute_weekly_settlement(SettlementScope::Vehicle(vehicle_id), week())
        .await
        .unwrap();

    assert_eq!(result.total_trips, 150);
    assert_eq!(result.daily_rate, Some(Decimal::from(150)));
    assert_eq!(result.company_rent, Decimal::from(1050));
    // 600 × 5 días, sin importar los turnos por día
    assert_eq!(result.total_income, Decimal::from(3000));
    assert_eq!(result.profit, Decimal::from(1950));
    assert_eq!(result.driver_rents[0].days_worked, 5);
}

#[tokio::test]
async fn substitute_trips_move_the_slab_but_charge_stays_flat() {
    let repo = InMemoryFleetRepository::new();
    let v = vehicle(Company::Pmv, "KA-02-7777");
    let d = driver("Suresh", false);
    let vehicle_id = v.id;
    repo.add_vehicle(v).await;
    repo.add_driver(d.clone()).await;

    // 118 viajes regulares: tramo 640. El suplente aporta 2 viajes → 120
    repo.add_rent_log(rent_log(vehicle_id, d.id, 2, Shift::Morning, 118))
        .await;
    repo.add_substitute(substitute(vehicle_id, 3, ShiftLength::Medium, Some(2)))
        .await;

    let service = SettlementService::new(repo);
    let result = service
        .compute_weekly_settlement(SettlementScope::Vehicle(vehicle_id), week())
        .await
        .unwrap();

    assert_eq!(result.total_trips, 120);
    assert_eq!(result.daily_rate, Some(Decimal::from(444)));
    // Renta del conductor (500 × 1) más cargo plano del suplente (350)
    assert_eq!(result.total_income, Decimal::from(850));
    assert_eq!(result.substitute_charge, Decimal::from(350));
}

#[tokio::test]
async fn compute_is_idempotent_over_unchanged_data() {
    let repo = InMemoryFleetRepository::new();
    let v = vehicle(Company::Ntc, "KA-03-0001");
    let d = driver("Anil", true);
    let vehicle_id = v.id;
    repo.add_vehicle(v).await;
    repo.add_driver(d.clone()).await;
    repo.add_rent_log(rent_log(vehicle_id, d.id, 4, Shift::Morning, 20))
        .await;

    let service = SettlementService::new(repo);
    let scope = SettlementScope::Vehicle(vehicle_id);
    let first = service.compute_weekly_settlement(scope, week()).await.unwrap();
    let second = service.compute_weekly_settlement(scope, week()).await.unwrap();

    assert_eq!(first.profit, second.profit);
    assert_eq!(first.total_trips, second.total_trips);
    assert_eq!(first.total_income, second.total_income);
}

#[tokio::test]
async fn reprocessing_overwrites_the_stored_row() {
    let repo = InMemoryFleetRepository::new();
    let v = vehicle(Company::Pmv, "KA-04-9999");
    let d = driver("Bala", false);
    let vehicle_id = v.id;
    repo.add_vehicle(v).await;
    repo.add_driver(d.clone()).await;
    repo.add_rent_log(rent_log(vehicle_id, d.id, 2, Shift::Morning, 10))
        .await;

    let service = SettlementService::new(repo.clone());
    let scope = SettlementScope::Vehicle(vehicle_id);

    let first = service.process_settlement(scope, week()).await.unwrap();
    let stored_first = service
        .find_stored_settlement(scope, week())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_first.profit, first.profit);

    // Llega un registro tardío y el usuario reprocesa la semana
    repo.add_rent_log(rent_log(vehicle_id, d.id, 3, Shift::Morning, 12))
        .await;
    let second = service.process_settlement(scope, week()).await.unwrap();
    let stored_second = service
        .find_stored_settlement(scope, week())
        .await
        .unwrap()
        .unwrap();

    assert_ne!(stored_second.profit, stored_first.profit);
    assert_eq!(stored_second.profit, second.profit);
    // Sigue habiendo una sola fila para (vehículo, semana)
    assert_eq!(repo.settlement_count().await, 1);
}

#[tokio::test]
async fn batch_continues_past_a_failing_vehicle() {
    let repo = InMemoryFleetRepository::new();
    let good = vehicle(Company::Pmv, "KA-05-1111");
    let bad = vehicle(Company::Pmv, "KA-05-2222");
    let d = driver("Ramesh", true);
    let good_id = good.id;
    let bad_id = bad.id;
    repo.add_vehicle(good).await;
    repo.add_vehicle(bad).await;
    repo.add_driver(d.clone()).await;
    repo.add_rent_log(rent_log(good_id, d.id, 2, Shift::Morning, 10))
        .await;
    // El vehículo malo referencia un conductor que ya no existe
    repo.add_rent_log(rent_log(bad_id, Uuid::new_v4(), 2, Shift::Morning, 5))
        .await;

    let service = SettlementService::new(repo.clone());
    let report = service.process_all_settlements(week()).await.unwrap();

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.total_vehicles(), 2);
    assert_eq!(report.failures[0].vehicle_id, bad_id);
    assert!(report.failures[0].error.contains("not found"));
    // El vehículo sano quedó liquidado
    assert_eq!(repo.settlement_count().await, 1);
}

#[tokio::test]
async fn fleet_scope_sums_per_vehicle_settlements() {
    let repo = InMemoryFleetRepository::new();
    let v1 = vehicle(Company::Pmv, "KA-06-0001");
    let v2 = vehicle(Company::Ntc, "KA-06-0002");
    let d1 = driver("Anil", true);
    let d2 = driver("Bala", false);
    let (id1, id2) = (v1.id, v2.id);
    repo.add_vehicle(v1).await;
    repo.add_vehicle(v2).await;
    repo.add_driver(d1.clone()).await;
    repo.add_driver(d2.clone()).await;
    repo.add_rent_log(rent_log(id1, d1.id, 2, Shift::Morning, 30)).await;
    repo.add_rent_log(rent_log(id2, d2.id, 2, Shift::Morning, 40)).await;

    let service = SettlementService::new(repo.clone());
    let fleet = service
        .compute_weekly_settlement(SettlementScope::Fleet, week())
        .await
        .unwrap();
    let r1 = service
        .compute_weekly_settlement(SettlementScope::Vehicle(id1), week())
        .await
        .unwrap();
    let r2 = service
        .compute_weekly_settlement(SettlementScope::Vehicle(id2), week())
        .await
        .unwrap();

    assert_eq!(fleet.total_trips, r1.total_trips + r2.total_trips);
    assert_eq!(fleet.company_rent, r1.company_rent + r2.company_rent);
    assert_eq!(fleet.total_income, r1.total_income + r2.total_income);
    assert_eq!(fleet.profit, r1.profit + r2.profit);
    assert!(fleet.daily_rate.is_none());

    // La fila de flota se guarda con vehicle_id NULL
    service
        .process_settlement(SettlementScope::Fleet, week())
        .await
        .unwrap();
    let stored = service
        .find_stored_settlement(SettlementScope::Fleet, week())
        .await
        .unwrap()
        .unwrap();
    assert!(stored.vehicle_id.is_none());
    assert_eq!(stored.profit, fleet.profit);
}

#[tokio::test]
async fn fleet_dedups_shifts_across_vehicles() {
    let repo = InMemoryFleetRepository::new();
    let v1 = vehicle(Company::Pmv, "KA-07-0001");
    let v2 = vehicle(Company::Pmv, "KA-07-0002");
    let d = driver("Mohan", true);
    let (id1, id2) = (v1.id, v2.id);
    repo.add_vehicle(v1).await;
    repo.add_vehicle(v2).await;
    repo.add_driver(d.clone()).await;

    // Mismo (conductor, fecha, turno) registrado contra dos vehículos:
    // un turno no puede cubrirse dos veces, el segundo registro se descarta
    repo.add_rent_log(rent_log(id1, d.id, 2, Shift::Morning, 10)).await;
    repo.add_rent_log(rent_log(id2, d.id, 2, Shift::Morning, 10)).await;

    let service = SettlementService::new(repo);
    let fleet = service
        .compute_weekly_settlement(SettlementScope::Fleet, week())
        .await
        .unwrap();

    assert_eq!(fleet.total_trips, 10);
    assert_eq!(fleet.driver_rents.len(), 1);
    assert_eq!(fleet.driver_rents[0].days_worked, 1);
    assert_eq!(fleet.total_income, Decimal::from(600));
    // Ambos vehículos siguen debiendo su renta semanal (tramo más caro)
    assert_eq!(fleet.company_rent, Decimal::from(2 * 640 * 7));
}

#[tokio::test]
async fn fleet_skips_failing_vehicle_without_aborting() {
    let repo = InMemoryFleetRepository::new();
    let good = vehicle(Company::Pmv, "KA-08-1111");
    let bad = vehicle(Company::Pmv, "KA-08-2222");
    let d = driver("Ramesh", true);
    let (good_id, bad_id) = (good.id, bad.id);
    repo.add_vehicle(good).await;
    repo.add_vehicle(bad).await;
    repo.add_driver(d.clone()).await;
    repo.add_rent_log(rent_log(good_id, d.id, 2, Shift::Morning, 30)).await;
    // Registro huérfano: el conductor ya no existe en el maestro
    repo.add_rent_log(rent_log(bad_id, Uuid::new_v4(), 2, Shift::Evening, 5)).await;

    let service = SettlementService::new(repo.clone());
    let fleet = service
        .compute_weekly_settlement(SettlementScope::Fleet, week())
        .await
        .unwrap();

    // El vehículo irresoluble queda fuera de los totales, ni viajes ni renta
    assert_eq!(fleet.total_trips, 30);
    assert_eq!(fleet.total_income, Decimal::from(600));
    assert_eq!(fleet.company_rent, Decimal::from(640 * 7));
    assert_eq!(fleet.profit, Decimal::from(600 - 640 * 7));

    // Y la fila de flota se materializa a pesar del vehículo roto
    service
        .process_settlement(SettlementScope::Fleet, week())
        .await
        .unwrap();
    let stored = service
        .find_stored_settlement(SettlementScope::Fleet, week())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.profit, fleet.profit);
}

#[tokio::test]
async fn missing_vehicle_is_reported_as_not_found() {
    let repo = InMemoryFleetRepository::new();
    let service = SettlementService::new(repo);

    let result = service
        .compute_weekly_settlement(SettlementScope::Vehicle(Uuid::new_v4()), week())
        .await;

    match result {
        Err(AppError::NotFound(msg)) => assert!(msg.contains("Vehicle")),
        other => panic!("expected NotFound, got {:?}", other.map(|r| r.profit)),
    }
}
