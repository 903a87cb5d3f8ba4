//! Clases de vehículo
//!
//! Cada clase tiene su propia tabla, su columna identificadora y su contrato
//! de columnas obligatorias para la subida de horarios.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clase de vehículo gestionada por el dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Pickup,
    Tipper,
    Machinery,
}

const PICKUP_COLUMNS: &[&str] = &[
    "vehicle_id",
    "plate_no",
    "driver",
    "time_start",
    "time_end",
    "current_location",
    "status",
    "remarks",
];

const TIPPER_COLUMNS: &[&str] = &[
    "truck_id",
    "plate_no",
    "driver",
    "current_location",
    "status",
    "remarks",
];

const MACHINERY_COLUMNS: &[&str] = &[
    "machine_id",
    "machine_name",
    "operator",
    "current_location",
    "status",
    "remarks",
];

impl VehicleKind {
    pub const ALL: [VehicleKind; 3] = [VehicleKind::Pickup, VehicleKind::Tipper, VehicleKind::Machinery];

    pub fn slug(&self) -> &'static str {
        match self {
            VehicleKind::Pickup => "pickup",
            VehicleKind::Tipper => "tipper",
            VehicleKind::Machinery => "machinery",
        }
    }

    /// Nombre de la tabla en PostgreSQL
    pub fn table_name(&self) -> &'static str {
        match self {
            VehicleKind::Pickup => "pickup_schedule",
            VehicleKind::Tipper => "tipper_schedule",
            VehicleKind::Machinery => "machinery_schedule",
        }
    }

    /// Nombre legible para avisos
    pub fn display_name(&self) -> &'static str {
        match self {
            VehicleKind::Pickup => "pick-up lorry",
            VehicleKind::Tipper => "tipper truck",
            VehicleKind::Machinery => "machinery",
        }
    }

    /// Columna que identifica al vehículo o máquina
    pub fn id_column(&self) -> &'static str {
        match self {
            VehicleKind::Pickup => "vehicle_id",
            VehicleKind::Tipper => "truck_id",
            VehicleKind::Machinery => "machine_id",
        }
    }

    /// Columna descriptiva: matrícula o nombre de la máquina
    pub fn label_column(&self) -> &'static str {
        match self {
            VehicleKind::Pickup | VehicleKind::Tipper => "plate_no",
            VehicleKind::Machinery => "machine_name",
        }
    }

    /// Columna de la persona a cargo: conductor u operador
    pub fn crew_column(&self) -> &'static str {
        match self {
            VehicleKind::Pickup | VehicleKind::Tipper => "driver",
            VehicleKind::Machinery => "operator",
        }
    }

    /// Solo los pickups tienen franjas horarias
    pub fn is_time_boxed(&self) -> bool {
        matches!(self, VehicleKind::Pickup)
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            VehicleKind::Pickup => PICKUP_COLUMNS,
            VehicleKind::Tipper => TIPPER_COLUMNS,
            VehicleKind::Machinery => MACHINERY_COLUMNS,
        }
    }

    /// Columnas persistidas, en el orden en que se exportan
    pub fn stored_columns(&self) -> Vec<&'static str> {
        let mut columns = self.required_columns().to_vec();
        columns.push("last_updated");
        columns
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown vehicle class '{0}'")]
pub struct UnknownVehicleKind(pub String);

impl FromStr for VehicleKind {
    type Err = UnknownVehicleKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(VehicleKind::Pickup),
            "tipper" => Ok(VehicleKind::Tipper),
            "machinery" => Ok(VehicleKind::Machinery),
            other => Err(UnknownVehicleKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pickup_is_time_boxed() {
        assert!(VehicleKind::Pickup.is_time_boxed());
        assert!(!VehicleKind::Tipper.is_time_boxed());
        assert!(!VehicleKind::Machinery.is_time_boxed());
    }

    #[test]
    fn test_required_columns_start_with_identifier() {
        for kind in VehicleKind::ALL {
            assert_eq!(kind.required_columns()[0], kind.id_column());
            assert!(kind.required_columns().contains(&kind.label_column()));
            assert!(kind.required_columns().contains(&kind.crew_column()));
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("tipper".parse::<VehicleKind>().unwrap(), VehicleKind::Tipper);
        assert!("Tipper".parse::<VehicleKind>().is_err());
        let kind: VehicleKind = serde_json::from_str("\"machinery\"").unwrap();
        assert_eq!(kind, VehicleKind::Machinery);
    }
}
