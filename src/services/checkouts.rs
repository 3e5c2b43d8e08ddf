//! Checkout lifecycle service
//!
//! Drives a logical request through request → staged request → active
//! checkout → return against the remote API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use super::{directory::EquipmentDirectory, profile::ProfileService};
use crate::{
    api::EquipmentApi,
    error::{AppError, AppResult},
    models::{ActiveCheckout, CheckoutRequest, LifecycleEvent, StagedRequest},
};

#[derive(Clone)]
pub struct CheckoutLifecycleService {
    api: Arc<dyn EquipmentApi>,
    directory: EquipmentDirectory,
    profile: ProfileService,
}

impl CheckoutLifecycleService {
    pub fn new(api: Arc<dyn EquipmentApi>, directory: EquipmentDirectory, profile: ProfileService) -> Self {
        Self {
            api,
            directory,
            profile,
        }
    }

    /// Request a unit of `model` for the signed-in user
    pub async fn submit_request(&self, model: &str) -> AppResult<CheckoutRequest> {
        let profile = self
            .profile
            .current()
            .ok_or_else(|| AppError::Validation("Only allowed for logged in users".to_string()))?;

        let request = CheckoutRequest::new(profile.display_name(), model, profile.pid);
        request.validate()?;

        let created = self.api.create_request(&request).await?;
        tracing::info!(pid = created.pid, model = %created.model, "Checkout request submitted");
        Ok(created)
    }

    pub async fn list_requests(&self) -> AppResult<Vec<CheckoutRequest>> {
        self.api.list_requests().await
    }

    pub async fn list_staged_requests(&self) -> AppResult<Vec<StagedRequest>> {
        self.api.list_staged_requests().await
    }

    pub async fn list_active_checkouts(&self) -> AppResult<Vec<ActiveCheckout>> {
        self.api.list_active_checkouts().await
    }

    /// All checkouts, returned ones included
    pub async fn list_checkout_history(&self) -> AppResult<Vec<ActiveCheckout>> {
        self.api.list_checkouts().await
    }

    /// Stage a request with every free unit of its model as candidates.
    ///
    /// The original request is deleted only once the staged record is
    /// persisted. If that deletion then fails, the staged record stays and
    /// the error is returned.
    pub async fn approve_request(&self, request: &CheckoutRequest) -> AppResult<StagedRequest> {
        request.state().transition(LifecycleEvent::Approve)?;

        let candidates = self.directory.available_ids_for_model(&request.model).await?;
        if candidates.is_empty() {
            tracing::warn!(
                pid = request.pid,
                model = %request.model,
                "Staging request with no available units"
            );
        }

        let staged = StagedRequest::from_request(request, candidates);
        let staged = self.api.create_staged_request(&staged).await?;

        if let Err(e) = self.remove_request(request).await {
            tracing::warn!(
                pid = request.pid,
                model = %request.model,
                error = %e,
                "Request staged but original could not be deleted"
            );
            return Err(e);
        }

        tracing::info!(
            pid = staged.pid,
            model = %staged.model,
            candidates = staged.id_choices.len(),
            "Checkout request approved and staged"
        );
        Ok(staged)
    }

    /// Cancel a pending request. Already-deleted requests count as success.
    pub async fn reject_request(&self, request: &CheckoutRequest) -> AppResult<()> {
        request.state().transition(LifecycleEvent::Reject)?;
        self.remove_request(request).await?;
        tracing::info!(pid = request.pid, model = %request.model, "Checkout request rejected");
        Ok(())
    }

    /// Pick the unit to hand out; `equipment_id` must be a candidate
    pub fn select_item(&self, staged: &StagedRequest, equipment_id: i32) -> AppResult<StagedRequest> {
        if !staged.id_choices.contains(&equipment_id) {
            return Err(AppError::Validation(format!(
                "Equipment {} is not a candidate for this {} request",
                equipment_id, staged.model
            )));
        }
        let mut selected = staged.clone();
        selected.selected_id = Some(equipment_id);
        Ok(selected)
    }

    /// Turn a staged request with a selected unit into an active checkout
    pub async fn approve_staged_request(&self, staged: &StagedRequest) -> AppResult<ActiveCheckout> {
        self.approve_staged_request_at(staged, Utc::now()).await
    }

    pub async fn approve_staged_request_at(
        &self,
        staged: &StagedRequest,
        now: DateTime<Utc>,
    ) -> AppResult<ActiveCheckout> {
        staged.state().transition(LifecycleEvent::Approve)?;

        let equipment_id = staged
            .selected_id
            .ok_or_else(|| AppError::Validation("Select a unit before approving".to_string()))?;
        let staged = self.select_item(staged, equipment_id)?;

        // A unit may sit in one active checkout at a time
        let active = self.api.list_active_checkouts().await?;
        if let Some(existing) = active.iter().find(|c| c.equipment_id == equipment_id) {
            return Err(AppError::Conflict(format!(
                "Equipment {} is already checked out to {}",
                equipment_id, existing.user_name
            )));
        }

        let checkout = ActiveCheckout::start(&staged, equipment_id, now);
        let created = self.api.create_checkout(&checkout).await?;

        if let Err(e) = self.remove_staged(&staged).await {
            tracing::warn!(
                pid = staged.pid,
                equipment_id,
                error = %e,
                "Checkout created but staged request could not be deleted"
            );
            return Err(e);
        }

        tracing::info!(
            pid = created.pid,
            equipment_id = created.equipment_id,
            end_at = %created.end_at,
            "Equipment checked out"
        );
        Ok(created)
    }

    /// Drop a staged request. Already-deleted records count as success.
    pub async fn reject_staged_request(&self, staged: &StagedRequest) -> AppResult<()> {
        staged.state().transition(LifecycleEvent::Reject)?;
        self.remove_staged(staged).await?;
        tracing::info!(pid = staged.pid, model = %staged.model, "Staged request rejected");
        Ok(())
    }

    /// Mark a checkout returned. The record stays in the history.
    pub async fn return_checkout(&self, checkout: &ActiveCheckout) -> AppResult<ActiveCheckout> {
        checkout.state().transition(LifecycleEvent::Return)?;

        let returned = self.api.return_checkout(checkout).await?;
        if returned.is_active {
            tracing::warn!(equipment_id = returned.equipment_id, "Backend still reports checkout active");
        }
        tracing::info!(
            pid = returned.pid,
            equipment_id = returned.equipment_id,
            "Equipment returned"
        );
        Ok(returned)
    }

    async fn remove_request(&self, request: &CheckoutRequest) -> AppResult<()> {
        match self.api.delete_request(request).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!(pid = request.pid, model = %request.model, "Request already removed");
                Ok(())
            }
            other => other,
        }
    }

    async fn remove_staged(&self, staged: &StagedRequest) -> AppResult<()> {
        match self.api.delete_staged_request(staged).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!(pid = staged.pid, model = %staged.model, "Staged request already removed");
                Ok(())
            }
            other => other,
        }
    }
}
