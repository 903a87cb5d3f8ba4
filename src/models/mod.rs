//! Modelos de datos
//!
//! Clases de vehículo, filas de horario, conjuntos de estado y cuentas.

pub mod auth;
pub mod schedule_row;
pub mod status;
pub mod vehicle_kind;

pub use auth::{Operator, Session, SessionClaims};
pub use schedule_row::{ScheduleRow, WhereaboutsPatch};
pub use status::StatusSet;
pub use vehicle_kind::VehicleKind;
