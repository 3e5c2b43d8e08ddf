//! Checkout request, staged request and active checkout records

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::lifecycle::LifecycleState;
use super::timestamp;

/// Fixed loan period for every checkout
pub const LOAN_PERIOD_DAYS: i64 = 3;

/// A user's request for a unit of some model.
///
/// Carries no id: the backend matches it by value on delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Requester name is required"))]
    pub user_name: String,
    #[validate(length(min = 1, message = "Equipment model is required"))]
    pub model: String,
    pub pid: i32,
}

impl CheckoutRequest {
    pub fn new(user_name: impl Into<String>, model: impl Into<String>, pid: i32) -> Self {
        Self {
            user_name: user_name.into(),
            model: model.into(),
            pid,
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::Requested
    }
}

/// An approved request waiting for an ambassador to pick the unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub user_name: String,
    pub model: String,
    pub pid: i32,
    /// Candidate unit ids, in the order the directory returned them
    #[serde(default, deserialize_with = "nullable_choices")]
    pub id_choices: IndexSet<i32>,
    pub selected_id: Option<i32>,
}

impl StagedRequest {
    /// Stage `request` with the given candidates and nothing selected yet
    pub fn from_request(request: &CheckoutRequest, id_choices: IndexSet<i32>) -> Self {
        Self {
            id: None,
            user_name: request.user_name.clone(),
            model: request.model.clone(),
            pid: request.pid,
            id_choices,
            selected_id: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::Staged
    }

    /// Whether `other` refers to the same staged record
    pub fn same_record(&self, other: &StagedRequest) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.pid == other.pid
                    && self.model == other.model
                    && self.user_name == other.user_name
            }
        }
    }

    /// Whether this staged record was produced from `request`
    pub fn matches_request(&self, request: &CheckoutRequest) -> bool {
        self.pid == request.pid && self.model == request.model && self.user_name == request.user_name
    }
}

// The backend column is nullable
fn nullable_choices<'de, D>(deserializer: D) -> Result<IndexSet<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IndexSet<i32>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A loan record. Never deleted; returning it clears `is_active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCheckout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub user_name: String,
    pub pid: i32,
    pub equipment_id: i32,
    pub model: String,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub started_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_at: DateTime<Utc>,
}

impl ActiveCheckout {
    /// Start a loan of `equipment_id` at `started_at` for the fixed loan period
    pub fn start(staged: &StagedRequest, equipment_id: i32, started_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            user_name: staged.user_name.clone(),
            pid: staged.pid,
            equipment_id,
            model: staged.model.clone(),
            is_active: true,
            started_at,
            end_at: started_at + Duration::days(LOAN_PERIOD_DAYS),
        }
    }

    pub fn state(&self) -> LifecycleState {
        if self.is_active {
            LifecycleState::CheckedOut
        } else {
            LifecycleState::Returned
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.end_at < now
    }
}
