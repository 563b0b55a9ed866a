//! Services module
//!
//! Este módulo contiene la lógica de negocio del motor: resolución de
//! tarifas por tramos, agregación semanal de actividad y liquidación.

pub mod aggregation_service;
pub mod rate_service;
pub mod settlement_service;

pub use rate_service::{get_all_slabs, get_rental_info, get_rental_rate};
pub use settlement_service::SettlementService;
