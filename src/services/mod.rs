//! Business logic services

pub mod clock;
pub mod controller;
pub mod identity;
pub mod sessions;

use chrono::Duration;
use std::sync::Arc;

use crate::{config::AppConfig, models::Session, remote::BackendConnector};

use self::{
    clock::Clock,
    controller::LibraryController,
    identity::IdentityService,
    sessions::{SessionStore, Workspace},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub identity: IdentityService,
    pub sessions: SessionStore,
    connector: Arc<dyn BackendConnector>,
    clock: Arc<dyn Clock>,
    notification_display: Duration,
}

impl Services {
    pub fn new(config: &AppConfig, connector: Arc<dyn BackendConnector>, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity: IdentityService::new(config),
            sessions: SessionStore::new(),
            connector,
            clock,
            notification_display: Duration::seconds(config.notifications.display_secs as i64),
        }
    }

    /// Bind a fresh client and controller to a signed-in session
    pub fn workspace_for(&self, session: Session) -> Workspace {
        let backend = self.connector.connect(&session);
        Workspace {
            session,
            controller: LibraryController::new(backend, self.clock.clone(), self.notification_display),
        }
    }
}
