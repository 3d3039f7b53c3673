//! Manager (staff account) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role marker stored on every account created through this surface.
pub const MANAGER_ROLE: &str = "manager";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manager {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    /// Unique, stored lowercased.
    pub email: String,
    /// Argon2id PHC hash. Not set at creation; only via update.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub status: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateManager {
    pub name: String,
    pub surname: String,
    pub email: String,
}

/// Partial patch: `None` leaves the stored field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateManager {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    /// Raw password; hashed before storage.
    pub password: Option<String>,
    pub status: Option<String>,
    pub is_active: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
}

/// The acting authenticated manager, as supplied by the identity
/// context. Used for order-claim authorization and comment audit
/// fields.
#[derive(Debug, Clone)]
pub struct ActingManager {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
}

impl ActingManager {
    /// Comment author rendering: `"<name> <surname>"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}
