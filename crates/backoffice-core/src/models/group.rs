//! Group (named cohort) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named cohort an order can be assigned into. Names are unique;
/// groups are created on demand when an order references a name that
/// does not exist yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
