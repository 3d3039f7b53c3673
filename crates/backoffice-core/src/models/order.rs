//! Order (customer lead/enrollment) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an order.
///
/// `New` is stored as NULL in the database; the variant is the typed
/// sentinel for that representation. The only implicit transition is
/// `New` -> `InWork` on first comment; any status may be set
/// explicitly via edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    New,
    InWork,
    Agree,
    Disagree,
    Dubbing,
}

impl OrderStatus {
    /// Stored representation: `None` for `New`, the variant name
    /// otherwise.
    pub fn as_stored(&self) -> Option<&'static str> {
        match self {
            Self::New => None,
            Self::InWork => Some("InWork"),
            Self::Agree => Some("Agree"),
            Self::Disagree => Some("Disagree"),
            Self::Dubbing => Some("Dubbing"),
        }
    }

    /// Inverse of [`as_stored`](Self::as_stored). Unknown strings map
    /// to `None` (not an error); absent values mean `New`.
    pub fn from_stored(stored: Option<&str>) -> Option<Self> {
        match stored {
            None => Some(Self::New),
            Some("New") => Some(Self::New),
            Some("InWork") => Some(Self::InWork),
            Some("Agree") => Some(Self::Agree),
            Some("Disagree") => Some(Self::Disagree),
            Some("Dubbing") => Some(Self::Dubbing),
            Some(_) => None,
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_stored(Some(s)).ok_or(())
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_stored().unwrap_or("New"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub course: Option<String>,
    pub course_type: Option<String>,
    pub course_format: Option<String>,
    pub sum: Option<i64>,
    pub already_paid: Option<i64>,
    pub status: OrderStatus,
    /// Group assignment by name.
    pub group: Option<String>,
    /// Assigned manager; `None` until the order is claimed.
    pub manager_id: Option<Uuid>,
    pub utm: Option<String>,
    pub msg: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// An order may be edited or commented only while unassigned or
    /// by its assigned manager.
    pub fn is_actionable_by(&self, manager_id: Uuid) -> bool {
        self.manager_id.is_none() || self.manager_id == Some(manager_id)
    }
}

/// Lead intake payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrder {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub course: Option<String>,
    pub course_type: Option<String>,
    pub course_format: Option<String>,
    pub sum: Option<i64>,
    pub already_paid: Option<i64>,
    pub utm: Option<String>,
    pub msg: Option<String>,
}

/// Partial patch: `None` leaves the stored field unchanged. The
/// manager assignment is never patched directly; it is set by the
/// claim logic on edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrder {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub course: Option<String>,
    pub course_type: Option<String>,
    pub course_format: Option<String>,
    pub sum: Option<i64>,
    pub already_paid: Option<i64>,
    pub status: Option<OrderStatus>,
    pub group: Option<String>,
}

/// An order joined with its assigned manager's display name, as
/// rendered in list envelopes and the spreadsheet export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithManager {
    #[serde(flatten)]
    pub order: Order,
    pub manager: Option<ManagerRef>,
}

/// Minimal manager projection embedded in order rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerRef {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
}
