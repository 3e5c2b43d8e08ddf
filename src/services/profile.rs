//! Signed-in user profile service

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    api::EquipmentApi,
    error::{AppError, AppResult},
    models::Profile,
};

/// Holds the authenticated identity used to submit requests
#[derive(Clone)]
pub struct ProfileService {
    api: Arc<dyn EquipmentApi>,
    current: Arc<watch::Sender<Option<Profile>>>,
}

impl ProfileService {
    pub fn new(api: Arc<dyn EquipmentApi>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            api,
            current: Arc::new(current),
        }
    }

    /// Fetch the profile from the backend.
    ///
    /// Not being signed in is not an error: the identity is cleared and
    /// `None` returned.
    pub async fn load(&self) -> AppResult<Option<Profile>> {
        let profile = match self.api.current_profile().await {
            Ok(profile) => Some(profile),
            Err(AppError::Authentication(_) | AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        self.set(profile.clone());
        Ok(profile)
    }

    pub fn set(&self, profile: Option<Profile>) {
        self.current.send_replace(profile);
    }

    pub fn current(&self) -> Option<Profile> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.current.subscribe()
    }

    /// Record that the signed-in user accepted the equipment waiver
    pub async fn sign_waiver(&self) -> AppResult<Profile> {
        let profile = self
            .current()
            .ok_or_else(|| AppError::Validation("Only allowed for logged in users".to_string()))?;
        let updated = self.api.update_waiver(&profile).await?;
        tracing::info!(pid = updated.pid, "Equipment waiver signed");
        self.set(Some(updated.clone()));
        Ok(updated)
    }
}
