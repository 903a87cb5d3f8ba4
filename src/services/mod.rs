//! Services module
//!
//! Lógica del dashboard: importación de horarios, edición de ubicación/estado,
//! vista de disponibilidad y autenticación de operadores.

pub mod auth_service;
pub mod authorization_service;
pub mod availability_view;
pub mod clock;
pub mod jwt_service;
pub mod schedule_exporter;
pub mod schedule_importer;
pub mod spreadsheet_reader;
pub mod status_editor;

pub use auth_service::{AuthError, AuthService};
pub use clock::{Clock, FixedClock, SystemClock};
pub use jwt_service::JwtService;
pub use schedule_importer::{ImportError, ImportMode, ScheduleImporter};
pub use status_editor::{StatusEditor, UpdateError, WhereaboutsUpdate};
