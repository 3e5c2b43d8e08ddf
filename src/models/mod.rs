//! Data models for the checkout client

pub mod board;
pub mod checkout;
pub mod equipment;
pub mod lifecycle;
pub mod profile;
pub mod timestamp;

// Re-export commonly used types
pub use board::BoardSnapshot;
pub use checkout::{ActiveCheckout, CheckoutRequest, StagedRequest, LOAN_PERIOD_DAYS};
pub use equipment::{EquipmentItem, EquipmentType};
pub use lifecycle::{LifecycleEvent, LifecycleState};
pub use profile::Profile;
