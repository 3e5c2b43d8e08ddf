//! Remote equipment API
//!
//! [`EquipmentApi`] is the seam between the lifecycle services and the
//! backend. [`HttpApi`] talks to the real REST endpoints; [`InMemoryApi`]
//! is an in-process backend with the same rules, used by tests and demos.

pub mod http;
pub mod memory;
pub mod routes;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{ActiveCheckout, CheckoutRequest, EquipmentItem, EquipmentType, Profile, StagedRequest},
};

pub use http::HttpApi;
pub use memory::InMemoryApi;

/// Every backend call the client makes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentApi: Send + Sync {
    async fn list_equipment(&self) -> AppResult<Vec<EquipmentItem>>;

    async fn list_equipment_types(&self) -> AppResult<Vec<EquipmentType>>;

    /// Units of `model` that are not currently checked out
    async fn available_for_model(&self, model: &str) -> AppResult<Vec<EquipmentItem>>;

    async fn create_request(&self, request: &CheckoutRequest) -> AppResult<CheckoutRequest>;

    /// Delete by value match
    async fn delete_request(&self, request: &CheckoutRequest) -> AppResult<()>;

    async fn list_requests(&self) -> AppResult<Vec<CheckoutRequest>>;

    async fn create_staged_request(&self, staged: &StagedRequest) -> AppResult<StagedRequest>;

    async fn delete_staged_request(&self, staged: &StagedRequest) -> AppResult<()>;

    async fn list_staged_requests(&self) -> AppResult<Vec<StagedRequest>>;

    async fn create_checkout(&self, checkout: &ActiveCheckout) -> AppResult<ActiveCheckout>;

    async fn list_active_checkouts(&self) -> AppResult<Vec<ActiveCheckout>>;

    /// Every checkout ever made, returned ones included
    async fn list_checkouts(&self) -> AppResult<Vec<ActiveCheckout>>;

    /// Mark the checkout returned; the record itself is kept
    async fn return_checkout(&self, checkout: &ActiveCheckout) -> AppResult<ActiveCheckout>;

    async fn current_profile(&self) -> AppResult<Profile>;

    async fn update_waiver(&self, profile: &Profile) -> AppResult<Profile>;
}
