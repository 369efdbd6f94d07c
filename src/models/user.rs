use serde::{Deserialize, Serialize};

/// Minimal identifying information for a player, as owned by the user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicUserData {
    pub id: String,
    pub username: String,
}
