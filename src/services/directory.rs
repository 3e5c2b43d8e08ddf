//! Equipment directory service

use std::sync::Arc;

use indexmap::IndexSet;

use crate::{
    api::EquipmentApi,
    error::AppResult,
    models::{EquipmentItem, EquipmentType},
};

/// Read-only catalog of equipment units and models. Every call re-fetches.
#[derive(Clone)]
pub struct EquipmentDirectory {
    api: Arc<dyn EquipmentApi>,
}

impl EquipmentDirectory {
    pub fn new(api: Arc<dyn EquipmentApi>) -> Self {
        Self { api }
    }

    pub async fn list_all_items(&self) -> AppResult<Vec<EquipmentItem>> {
        self.api.list_equipment().await
    }

    pub async fn list_all_models(&self) -> AppResult<Vec<EquipmentType>> {
        self.api.list_equipment_types().await
    }

    /// Units of `model` not currently checked out
    pub async fn list_available_items_for_model(&self, model: &str) -> AppResult<Vec<EquipmentItem>> {
        self.api.available_for_model(model).await
    }

    /// Candidate ids for staging a request of `model`, in backend order
    pub async fn available_ids_for_model(&self, model: &str) -> AppResult<IndexSet<i32>> {
        let items = self.list_available_items_for_model(model).await?;
        Ok(items
            .into_iter()
            // The backend already filters; skip stale rows that slipped through
            .filter(|item| item.model == model && item.is_available())
            .map(|item| item.equipment_id)
            .collect())
    }
}
