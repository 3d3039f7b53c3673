//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups return `Option` so
//! that absence handling (404 vs. "claim it") stays with the caller;
//! mutations on missing records fail with `NotFound`.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::BackofficeResult;
use crate::models::{
    comment::{Comment, CreateComment},
    group::Group,
    manager::{CreateManager, Manager, UpdateManager},
    order::{CreateOrder, Order, OrderStatus, UpdateOrder},
};

// ---------------------------------------------------------------------------
// Managers
// ---------------------------------------------------------------------------

pub trait ManagerRepository: Send + Sync {
    /// Persist a new manager account. Email must be unique; the
    /// password is unset at creation.
    fn create(&self, input: CreateManager) -> impl Future<Output = BackofficeResult<Manager>> + Send;

    fn find_by_id(&self, id: Uuid) -> impl Future<Output = BackofficeResult<Option<Manager>>> + Send;

    /// Case-insensitive: the stored email is lowercased, so callers
    /// must pass a lowercased key.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = BackofficeResult<Option<Manager>>> + Send;

    /// Partial patch; a raw `password` in the patch is hashed before
    /// storage. Fails with `NotFound` for a missing id.
    fn update(
        &self,
        id: Uuid,
        input: UpdateManager,
    ) -> impl Future<Output = BackofficeResult<Manager>> + Send;

    /// Page of accounts with role `manager`, plus the total count.
    fn list(
        &self,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = BackofficeResult<(Vec<Manager>, u64)>> + Send;
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

pub trait OrderRepository: Send + Sync {
    fn create(&self, input: CreateOrder) -> impl Future<Output = BackofficeResult<Order>> + Send;

    fn find_by_id(&self, id: Uuid) -> impl Future<Output = BackofficeResult<Option<Order>>> + Send;

    /// Lookup by customer email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = BackofficeResult<Option<Order>>> + Send;

    /// Filtered, sorted slice of orders. The filter map is translated
    /// into a query predicate; invalid filter values fail with
    /// `BadRequest`. `manager_id` is ANDed in when present.
    fn search(
        &self,
        filter: &BTreeMap<String, Vec<String>>,
        sort: &[(String, String)],
        offset: u64,
        limit: u64,
        manager_id: Option<Uuid>,
    ) -> impl Future<Output = BackofficeResult<Vec<Order>>> + Send;

    /// Count under the same predicate as [`search`](Self::search).
    fn count(
        &self,
        filter: &BTreeMap<String, Vec<String>>,
        manager_id: Option<Uuid>,
    ) -> impl Future<Output = BackofficeResult<u64>> + Send;

    /// Count one status bucket (`Some(New)` counts stored-NULL rows),
    /// optionally scoped to a manager. `None` counts everything.
    fn count_by_status(
        &self,
        status: Option<OrderStatus>,
        manager_id: Option<Uuid>,
    ) -> impl Future<Output = BackofficeResult<u64>> + Send;

    /// Apply a patch and claim the order for `manager_id` in one
    /// conditional update: succeeds only while the order is unassigned
    /// or already assigned to `manager_id`. Returns `None` when the
    /// guard rejects the write (claimed by someone else).
    fn update_claimed(
        &self,
        id: Uuid,
        input: UpdateOrder,
        manager_id: Uuid,
    ) -> impl Future<Output = BackofficeResult<Option<Order>>> + Send;
}

// ---------------------------------------------------------------------------
// Groups & Comments
// ---------------------------------------------------------------------------

pub trait GroupRepository: Send + Sync {
    fn create(&self, name: &str) -> impl Future<Output = BackofficeResult<Group>> + Send;

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = BackofficeResult<Option<Group>>> + Send;

    fn list(&self) -> impl Future<Output = BackofficeResult<Vec<Group>>> + Send;
}

pub trait CommentRepository: Send + Sync {
    fn create(&self, input: CreateComment) -> impl Future<Output = BackofficeResult<Comment>> + Send;

    fn list_by_order(
        &self,
        order_id: Uuid,
    ) -> impl Future<Output = BackofficeResult<Vec<Comment>>> + Send;
}
