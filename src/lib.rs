//! Motor de liquidaciones de flota en renta
//!
//! Tarifas por tramos por compañía, agregación semanal de actividad
//! (viajes, renta por conductor, suplentes) y liquidación semanal
//! idempotente por (alcance, semana).

pub mod config;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
