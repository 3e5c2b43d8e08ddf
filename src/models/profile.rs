//! Authenticated user profile

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user, as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i32>,
    pub pid: i32,
    #[serde(default)]
    pub onyen: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the user signed the equipment liability waiver
    #[serde(default)]
    pub waiver_signed: bool,
}

impl Profile {
    /// Name shown on checkout requests
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
