//! Modelo de Company
//!
//! Las dos compañías arrendadoras de la flota. Cada compañía tiene su propia
//! tabla de tarifas por tramos (ver `services::rate_service`).

use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;

/// Compañía arrendadora - mapea al ENUM fleet_company
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "fleet_company", rename_all = "lowercase")]
pub enum Company {
    Pmv,
    Ntc,
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Company::Pmv => write!(f, "PMV"),
            Company::Ntc => write!(f, "NTC"),
        }
    }
}
