//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::models::{StatusSet, VehicleKind};
use crate::repositories::{AccountRepository, TableStore};
use crate::services::{AuthService, Clock, JwtService, ScheduleImporter, StatusEditor};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TableStore>,
    pub accounts: Arc<dyn AccountRepository>,
    pub config: Arc<EnvironmentConfig>,
    pub clock: Arc<dyn Clock>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TableStore>,
        accounts: Arc<dyn AccountRepository>,
        config: EnvironmentConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let jwt = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_expiration));
        Self {
            store,
            accounts,
            config: Arc::new(config),
            clock,
            jwt,
        }
    }

    pub fn statuses(&self, kind: VehicleKind) -> StatusSet {
        self.config.statuses(kind)
    }

    pub fn importer(&self) -> ScheduleImporter {
        ScheduleImporter::new(self.store.clone())
    }

    pub fn editor(&self) -> StatusEditor {
        StatusEditor::new(self.store.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.accounts.clone(), self.jwt.clone())
    }
}
