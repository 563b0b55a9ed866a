//! Ventana semanal ISO
//!
//! Toda la agregación y liquidación se hace sobre semanas ISO completas:
//! lunes a domingo del calendario civil local. Nunca sobre rangos arbitrarios.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::utils::errors::{validation_error, AppResult};

/// Ventana [lunes, domingo] de una semana ISO
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// Construir desde un lunes exacto. Rechaza cualquier otro día de la
    /// semana en lugar de calcular silenciosamente sobre una ventana corrida.
    pub fn from_monday(start: NaiveDate) -> AppResult<Self> {
        if start.weekday() != Weekday::Mon {
            return Err(validation_error(&format!(
                "week start {} is a {:?}, expected Monday",
                start,
                start.weekday()
            )));
        }
        Ok(Self { start })
    }

    /// Ventana de la semana ISO que contiene la fecha dada
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday();
        Self {
            start: date - Duration::days(i64::from(offset)),
        }
    }

    /// Lunes de la semana
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Domingo de la semana
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }
}

impl std::fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_monday_accepts_monday() {
        let week = WeekWindow::from_monday(date(2025, 6, 2)).unwrap();
        assert_eq!(week.start(), date(2025, 6, 2));
        assert_eq!(week.end(), date(2025, 6, 8));
    }

    #[test]
    fn test_from_monday_rejects_other_days() {
        assert!(WeekWindow::from_monday(date(2025, 6, 4)).is_err());
        assert!(WeekWindow::from_monday(date(2025, 6, 8)).is_err());
    }

    #[test]
    fn test_containing_normalizes_to_monday() {
        // Miércoles y domingo caen en la misma semana
        let wednesday = WeekWindow::containing(date(2025, 6, 4));
        let sunday = WeekWindow::containing(date(2025, 6, 8));
        assert_eq!(wednesday, sunday);
        assert_eq!(wednesday.start(), date(2025, 6, 2));
    }

    #[test]
    fn test_contains_bounds() {
        let week = WeekWindow::from_monday(date(2025, 6, 2)).unwrap();
        assert!(week.contains(date(2025, 6, 2)));
        assert!(week.contains(date(2025, 6, 8)));
        assert!(!week.contains(date(2025, 6, 1)));
        assert!(!week.contains(date(2025, 6, 9)));
    }
}
