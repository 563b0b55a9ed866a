//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod company;
pub mod driver;
pub mod rent_log;
pub mod settlement;
pub mod substitute;
pub mod vehicle;
pub mod week;
