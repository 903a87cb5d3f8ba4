//! Hora del despliegue
//!
//! Todas las comparaciones de franja usan la hora local del despliegue con
//! formato `HH:MM`; las marcas `last_updated` usan `YYYY-MM-DD HH:MM`.

use chrono::{DateTime, FixedOffset, Utc};

pub const SLOT_TIME_FORMAT: &str = "%H:%M";
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reloj del sistema con un desfase fijo respecto a UTC
#[derive(Debug, Clone)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Reloj detenido, para tests
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// `HH:MM` con ceros a la izquierda, comparable lexicográficamente
pub fn slot_time(now: &DateTime<FixedOffset>) -> String {
    now.format(SLOT_TIME_FORMAT).to_string()
}

pub fn stamp(now: &DateTime<FixedOffset>) -> String {
    now.format(STAMP_FORMAT).to_string()
}
