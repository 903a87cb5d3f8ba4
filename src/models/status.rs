//! Conjunto de estados por clase de vehículo
//!
//! Cada despliegue declara una vez los estados válidos de cada clase; uno de
//! ellos cuenta como "disponible".

use serde::Serialize;

pub const DEFAULT_STATUSES: &[&str] = &["Available", "Busy"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSet {
    values: Vec<String>,
    available: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StatusSetError {
    #[error("status set is empty")]
    Empty,

    #[error("available status '{0}' is not part of the status set")]
    UnknownAvailable(String),
}

impl StatusSet {
    /// Crea el conjunto; sin estado disponible explícito se usa "Available"
    /// si existe y si no el primero de la lista.
    pub fn new(values: Vec<String>, available: Option<String>) -> Result<Self, StatusSetError> {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        let first = values.first().cloned().ok_or(StatusSetError::Empty)?;

        let available = match available.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) {
            Some(a) if values.contains(&a) => a,
            Some(a) => return Err(StatusSetError::UnknownAvailable(a)),
            None if values.iter().any(|v| v == "Available") => "Available".to_string(),
            None => first,
        };

        Ok(Self { values, available })
    }

    /// Parsea una lista separada por comas
    pub fn parse(list: &str, available: Option<String>) -> Result<Self, StatusSetError> {
        Self::new(list.split(',').map(str::to_string).collect(), available)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn available(&self) -> &str {
        &self.available
    }

    pub fn contains(&self, status: &str) -> bool {
        self.values.iter().any(|v| v == status)
    }

    pub fn is_available(&self, status: &str) -> bool {
        self.available == status
    }
}

impl Default for StatusSet {
    fn default() -> Self {
        Self {
            values: DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect(),
            available: "Available".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let set = StatusSet::default();
        assert!(set.contains("Busy"));
        assert!(set.is_available("Available"));
        assert!(!set.contains("available"));
    }

    #[test]
    fn test_alternative_set_defaults_to_first() {
        let set = StatusSet::parse("Idle, On Route,Working ,Completed", None).unwrap();
        assert_eq!(set.values().len(), 4);
        assert_eq!(set.available(), "Idle");
        assert!(set.contains("On Route"));
    }

    #[test]
    fn test_explicit_available_must_be_member() {
        let err = StatusSet::parse("Idle,Working", Some("Available".to_string())).unwrap_err();
        assert_eq!(err, StatusSetError::UnknownAvailable("Available".to_string()));
        assert_eq!(StatusSet::parse(" , ", None).unwrap_err(), StatusSetError::Empty);
    }
}
