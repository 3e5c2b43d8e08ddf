//! In-process equipment backend.
//!
//! Keeps the same rules the real backend enforces: units of a model are
//! offered only while not checked out, a unit sits in at most one active
//! checkout, and returned checkouts stay in the history.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::EquipmentApi;
use crate::{
    error::{AppError, AppResult},
    models::{ActiveCheckout, CheckoutRequest, EquipmentItem, EquipmentType, Profile, StagedRequest},
};

#[derive(Default)]
struct Backend {
    items: Vec<EquipmentItem>,
    requests: Vec<CheckoutRequest>,
    staged: Vec<StagedRequest>,
    checkouts: Vec<ActiveCheckout>,
    profile: Option<Profile>,
    next_staged_id: i32,
    next_checkout_id: i32,
}

#[derive(Default)]
pub struct InMemoryApi {
    state: Mutex<Backend>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = EquipmentItem>) -> Self {
        let api = Self::new();
        if let Ok(mut state) = api.state.lock() {
            state.items.extend(items);
        }
        api
    }

    /// Sign in as `profile`, or sign out with `None`
    pub fn set_profile(&self, profile: Option<Profile>) -> AppResult<()> {
        self.lock()?.profile = profile;
        Ok(())
    }

    pub fn insert_item(&self, item: EquipmentItem) -> AppResult<()> {
        self.lock()?.items.push(item);
        Ok(())
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Backend>> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("In-memory backend lock poisoned".to_string()))
    }
}

#[async_trait]
impl EquipmentApi for InMemoryApi {
    async fn list_equipment(&self) -> AppResult<Vec<EquipmentItem>> {
        Ok(self.lock()?.items.clone())
    }

    async fn list_equipment_types(&self) -> AppResult<Vec<EquipmentType>> {
        let state = self.lock()?;
        let mut types: Vec<EquipmentType> = Vec::new();
        for item in &state.items {
            let available = i32::from(item.is_available());
            match types.iter_mut().find(|t| t.model == item.model) {
                Some(existing) => existing.num_available += available,
                None => types.push(EquipmentType {
                    model: item.model.clone(),
                    num_available: available,
                    equipment_image: item.equipment_image.clone(),
                }),
            }
        }
        Ok(types)
    }

    async fn available_for_model(&self, model: &str) -> AppResult<Vec<EquipmentItem>> {
        Ok(self
            .lock()?
            .items
            .iter()
            .filter(|item| item.model == model && item.is_available())
            .cloned()
            .collect())
    }

    async fn create_request(&self, request: &CheckoutRequest) -> AppResult<CheckoutRequest> {
        let mut state = self.lock()?;
        if state.requests.contains(request) {
            return Err(AppError::Conflict(format!(
                "User {} already requested a {}",
                request.pid, request.model
            )));
        }
        state.requests.push(request.clone());
        Ok(request.clone())
    }

    async fn delete_request(&self, request: &CheckoutRequest) -> AppResult<()> {
        let mut state = self.lock()?;
        let index = state
            .requests
            .iter()
            .position(|r| r == request)
            .ok_or_else(|| AppError::NotFound(format!("Request for {} by {} not found", request.model, request.pid)))?;
        state.requests.remove(index);
        Ok(())
    }

    async fn list_requests(&self) -> AppResult<Vec<CheckoutRequest>> {
        Ok(self.lock()?.requests.clone())
    }

    async fn create_staged_request(&self, staged: &StagedRequest) -> AppResult<StagedRequest> {
        let mut state = self.lock()?;
        state.next_staged_id += 1;
        let mut stored = staged.clone();
        stored.id = Some(state.next_staged_id);
        state.staged.push(stored.clone());
        Ok(stored)
    }

    async fn delete_staged_request(&self, staged: &StagedRequest) -> AppResult<()> {
        let mut state = self.lock()?;
        let index = state
            .staged
            .iter()
            .position(|s| s.same_record(staged))
            .ok_or_else(|| AppError::NotFound(format!("Staged request for {} by {} not found", staged.model, staged.pid)))?;
        state.staged.remove(index);
        Ok(())
    }

    async fn list_staged_requests(&self) -> AppResult<Vec<StagedRequest>> {
        Ok(self.lock()?.staged.clone())
    }

    async fn create_checkout(&self, checkout: &ActiveCheckout) -> AppResult<ActiveCheckout> {
        let mut state = self.lock()?;
        let equipment_id = checkout.equipment_id;
        if state
            .checkouts
            .iter()
            .any(|c| c.is_active && c.equipment_id == equipment_id)
        {
            return Err(AppError::Conflict(format!("Equipment {} is already checked out", equipment_id)));
        }
        let item = state
            .items
            .iter_mut()
            .find(|item| item.equipment_id == equipment_id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", equipment_id)))?;
        item.is_checked_out = true;

        state.next_checkout_id += 1;
        let mut stored = checkout.clone();
        stored.id = Some(state.next_checkout_id);
        state.checkouts.push(stored.clone());
        Ok(stored)
    }

    async fn list_active_checkouts(&self) -> AppResult<Vec<ActiveCheckout>> {
        Ok(self
            .lock()?
            .checkouts
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    async fn list_checkouts(&self) -> AppResult<Vec<ActiveCheckout>> {
        Ok(self.lock()?.checkouts.clone())
    }

    async fn return_checkout(&self, checkout: &ActiveCheckout) -> AppResult<ActiveCheckout> {
        let mut state = self.lock()?;
        let stored = state
            .checkouts
            .iter_mut()
            .find(|c| match checkout.id {
                Some(id) => c.id == Some(id),
                None => c.is_active && c.equipment_id == checkout.equipment_id,
            })
            .ok_or_else(|| AppError::NotFound(format!("Checkout of equipment {} not found", checkout.equipment_id)))?;
        stored.is_active = false;
        let returned = stored.clone();

        if let Some(item) = state
            .items
            .iter_mut()
            .find(|item| item.equipment_id == returned.equipment_id)
        {
            item.is_checked_out = false;
        }
        Ok(returned)
    }

    async fn current_profile(&self) -> AppResult<Profile> {
        self.lock()?
            .profile
            .clone()
            .ok_or_else(|| AppError::Authentication("Not signed in".to_string()))
    }

    async fn update_waiver(&self, profile: &Profile) -> AppResult<Profile> {
        let mut state = self.lock()?;
        match state.profile.as_mut() {
            Some(current) if current.pid == profile.pid => {
                current.waiver_signed = true;
                Ok(current.clone())
            }
            _ => Err(AppError::Authentication("Not signed in".to_string())),
        }
    }
}
