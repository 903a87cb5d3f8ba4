//! Utilidades de validación
//!
//! Funciones helper para validar valores de entrada contra la configuración
//! del dashboard.

use validator::ValidationError;

use crate::models::StatusSet;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que el estado pertenezca al conjunto configurado
pub fn validate_status(value: &str, statuses: &StatusSet) -> Result<(), ValidationError> {
    if !statuses.contains(value) {
        let mut error = ValidationError::new("status");
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &statuses.values().to_vec());
        return Err(error);
    }
    Ok(())
}

/// Separa una lista de identificadores por comas, descartando los vacíos
pub fn parse_identifier_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
