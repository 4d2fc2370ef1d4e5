//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on
//! driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DriverAccounts, LoginService, ShuttleFleet, StopCatalog};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub drivers: Arc<dyn DriverAccounts>,
    pub stops: Arc<dyn StopCatalog>,
    pub shuttles: Arc<dyn ShuttleFleet>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        login: Arc<dyn LoginService>,
        drivers: Arc<dyn DriverAccounts>,
        stops: Arc<dyn StopCatalog>,
        shuttles: Arc<dyn ShuttleFleet>,
    ) -> Self {
        Self {
            login,
            drivers,
            stops,
            shuttles,
        }
    }
}
