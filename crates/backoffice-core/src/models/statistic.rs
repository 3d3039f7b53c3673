//! Per-status order count aggregates.

use serde::{Deserialize, Serialize};

/// Counts of orders assigned to one manager, broken down by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStatistic {
    pub total: u64,
    pub in_work: u64,
    pub agree: u64,
    pub disagree: u64,
    pub dubbing: u64,
}

/// Global order counts; adds the `new` bucket (stored-NULL status).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistic {
    pub total: u64,
    pub in_work: u64,
    pub agree: u64,
    pub disagree: u64,
    pub dubbing: u64,
    pub new: u64,
}
