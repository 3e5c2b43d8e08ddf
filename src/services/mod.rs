//! Client-side services

pub mod board;
pub mod checkouts;
pub mod directory;
pub mod poller;
pub mod profile;

use std::sync::Arc;

use crate::api::EquipmentApi;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub directory: directory::EquipmentDirectory,
    pub profile: profile::ProfileService,
    pub checkouts: checkouts::CheckoutLifecycleService,
    pub board: Arc<board::CheckoutBoard>,
}

impl Services {
    /// Create all services on top of the given API
    pub fn new(api: Arc<dyn EquipmentApi>) -> Self {
        let directory = directory::EquipmentDirectory::new(api.clone());
        let profile = profile::ProfileService::new(api.clone());
        let checkouts = checkouts::CheckoutLifecycleService::new(api, directory.clone(), profile.clone());
        let board = Arc::new(board::CheckoutBoard::new(checkouts.clone()));

        Self {
            directory,
            profile,
            checkouts,
            board,
        }
    }
}
