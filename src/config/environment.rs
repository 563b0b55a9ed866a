//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno para el worker
//! de liquidaciones semanales.

use std::env;

use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub database_url: String,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno
    pub fn from_env() -> AppResult<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Configuration("DATABASE_URL must be set".to_string()))?;

        Ok(Self {
            environment,
            database_url,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
