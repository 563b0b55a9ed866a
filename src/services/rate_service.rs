//! Resolución de tarifas por tramos
//!
//! Cada compañía tiene una tabla fija de tramos: rango de viajes semanales →
//! tarifa diaria. Más viajes nunca pagan más por día. Las tablas son
//! constantes de negocio, no configuración de usuario.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::company::Company;

/// Tramo tarifario: [min_trips, max_trips] → tarifa diaria.
/// `max_trips` None = sin tope superior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentalSlab {
    pub min_trips: u32,
    pub max_trips: Option<u32>,
    pub daily_rate: Decimal,
}

impl RentalSlab {
    fn new(min_trips: u32, max_trips: Option<u32>, daily_rate: i64) -> Self {
        Self {
            min_trips,
            max_trips,
            daily_rate: Decimal::from(daily_rate),
        }
    }

    /// Verificar si el conteo de viajes cae dentro del tramo
    pub fn contains(&self, trip_count: i64) -> bool {
        trip_count >= i64::from(self.min_trips)
            && self.max_trips.map_or(true, |max| trip_count <= i64::from(max))
    }
}

lazy_static! {
    /// Tabla PMV, ordenada por min_trips descendente (mejor tramo primero).
    /// Los tramos son contiguos y exactamente uno contiene cada conteo >= 0.
    static ref PMV_SLABS: Vec<RentalSlab> = vec![
        RentalSlab::new(140, None, 150),
        RentalSlab::new(130, Some(139), 300),
        RentalSlab::new(120, Some(129), 444),
        RentalSlab::new(0, Some(119), 640),
    ];

    /// Tabla NTC, mismo ordenamiento e invariantes que PMV
    static ref NTC_SLABS: Vec<RentalSlab> = vec![
        RentalSlab::new(150, None, 180),
        RentalSlab::new(135, Some(149), 320),
        RentalSlab::new(115, Some(134), 470),
        RentalSlab::new(0, Some(114), 700),
    ];
}

/// Tramo siguiente más barato alcanzable con más viajes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NextBetterSlab {
    pub daily_rate: Decimal,
    pub trips_needed: i64,
    pub weekly_savings: Decimal,
}

/// Información tarifaria completa para un conteo de viajes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalInfo {
    pub company: Company,
    pub trip_count: i64,
    pub current_rate: Decimal,
    pub weekly_cost: Decimal,
    pub next_better_slab: Option<NextBetterSlab>,
    pub optimization_tip: String,
}

fn slabs(company: Company) -> &'static [RentalSlab] {
    match company {
        Company::Pmv => &PMV_SLABS,
        Company::Ntc => &NTC_SLABS,
    }
}

/// Tarifa diaria para un conteo de viajes semanal.
///
/// Si ningún tramo contiene el conteo (conteo negativo o tabla malformada),
/// cae al tramo más caro (min_trips más bajo) en lugar de fallar: la política
/// es nunca bloquear el cobro por un problema de tarifas.
pub fn get_rental_rate(company: Company, trip_count: i64) -> Decimal {
    let table = slabs(company);
    table
        .iter()
        .find(|slab| slab.contains(trip_count))
        .or_else(|| table.iter().min_by_key(|slab| slab.min_trips))
        .map(|slab| slab.daily_rate)
        .unwrap_or_default()
}

/// Tarifa actual, costo semanal y el tramo más barato alcanzable.
///
/// El "siguiente tramo mejor" es el más cercano por encima del conteo actual
/// con tarifa menor, no el mejor absoluto: el mensaje de optimización debe
/// nombrar el salto inmediato que el dueño puede alcanzar esta semana.
pub fn get_rental_info(company: Company, trip_count: i64) -> RentalInfo {
    let current_rate = get_rental_rate(company, trip_count);
    let weekly_cost = current_rate * Decimal::from(7);

    let next_better_slab = slabs(company)
        .iter()
        .rev()
        .find(|slab| slab.daily_rate < current_rate && i64::from(slab.min_trips) > trip_count)
        .map(|slab| NextBetterSlab {
            daily_rate: slab.daily_rate,
            trips_needed: i64::from(slab.min_trips) - trip_count,
            weekly_savings: (current_rate - slab.daily_rate) * Decimal::from(7),
        });

    let optimization_tip = match &next_better_slab {
        Some(next) => format!(
            "Complete {} more trips to reach the {}/day slab and save {}/week",
            next.trips_needed, next.daily_rate, next.weekly_savings
        ),
        None => "Best rate slab already reached".to_string(),
    };

    RentalInfo {
        company,
        trip_count,
        current_rate,
        weekly_cost,
        next_better_slab,
        optimization_tip,
    }
}

/// Tabla completa de tramos de una compañía
pub fn get_all_slabs(company: Company) -> Vec<RentalSlab> {
    slabs(company).to_vec()
}
