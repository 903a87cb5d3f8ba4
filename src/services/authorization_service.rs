//! Autorización de operaciones
//!
//! Solo la subida de horarios está restringida; el formulario de ubicación y
//! las vistas son abiertas.

use crate::models::Session;

/// ¿Puede esta sesión subir un horario?
pub fn can_upload(session: &Session) -> bool {
    session.can_upload
}
