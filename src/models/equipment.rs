//! Equipment catalog models

use serde::{Deserialize, Serialize};

/// A single piece of equipment owned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub equipment_id: i32,
    /// Model name shared by every unit of the same kind
    pub model: String,
    /// Set while the unit is out on an active checkout
    #[serde(default)]
    pub is_checked_out: bool,
    #[serde(default)]
    pub equipment_image: Option<String>,
    /// Condition score reported by staff (higher is better)
    #[serde(default)]
    pub condition: Option<i32>,
    #[serde(default)]
    pub condition_notes: Vec<String>,
}

impl EquipmentItem {
    pub fn new(equipment_id: i32, model: impl Into<String>) -> Self {
        Self {
            equipment_id,
            model: model.into(),
            is_checked_out: false,
            equipment_image: None,
            condition: None,
            condition_notes: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        !self.is_checked_out
    }
}

/// Equipment type (model) as listed in the user-facing catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub model: String,
    /// Units of this model not currently checked out
    #[serde(default)]
    pub num_available: i32,
    #[serde(default)]
    pub equipment_image: Option<String>,
}
