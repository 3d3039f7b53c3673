//! Order directory — filter-driven listing, claim-guarded editing,
//! comment threads, groups, statistics, and spreadsheet export.

use std::collections::HashMap;

use backoffice_core::error::{BackofficeError, BackofficeResult};
use backoffice_core::identifier::Identifier;
use backoffice_core::models::comment::{Comment, CreateComment};
use backoffice_core::models::group::Group;
use backoffice_core::models::manager::ActingManager;
use backoffice_core::models::order::{
    CreateOrder, ManagerRef, Order, OrderStatus, OrderWithManager, UpdateOrder,
};
use backoffice_core::models::statistic::OrderStatistic;
use backoffice_core::query::{ORDER_PAGE_LIMIT, OrderListQuery, Page};
use backoffice_core::repository::{
    CommentRepository, GroupRepository, ManagerRepository, OrderRepository,
};
use tracing::debug;
use uuid::Uuid;

use crate::export;

/// Order directory service.
///
/// Generic over repository implementations so that the directory
/// layer has no dependency on the database crate.
pub struct OrderDirectory<O, G, C, M>
where
    O: OrderRepository,
    G: GroupRepository,
    C: CommentRepository,
    M: ManagerRepository,
{
    orders: O,
    groups: G,
    comments: C,
    managers: M,
}

impl<O, G, C, M> OrderDirectory<O, G, C, M>
where
    O: OrderRepository,
    G: GroupRepository,
    C: CommentRepository,
    M: ManagerRepository,
{
    pub fn new(orders: O, groups: G, comments: C, managers: M) -> Self {
        Self {
            orders,
            groups,
            comments,
            managers,
        }
    }

    /// Persist a new lead. Status starts as `New` (stored NULL) and
    /// the order is unassigned.
    pub async fn create(&self, input: CreateOrder) -> BackofficeResult<Order> {
        self.orders.create(input).await
    }

    /// Filtered, sorted, paginated listing. `manager_id` scopes the
    /// result to one manager's orders independently of the filter map.
    pub async fn list(
        &self,
        query: &OrderListQuery,
        manager_id: Option<Uuid>,
    ) -> BackofficeResult<Page<OrderWithManager>> {
        let (page, limit) = query.page.resolve(ORDER_PAGE_LIMIT);
        let offset = (page - 1) * limit;

        let total = self.orders.count(&query.filter, manager_id).await?;
        let rows = self
            .orders
            .search(&query.filter, &query.sort_by, offset, limit, manager_id)
            .await?;
        let data = self.attach_managers(rows).await?;

        Ok(Page::new(data, page, limit, total))
    }

    /// The caller's own orders.
    pub async fn my_orders(
        &self,
        manager_id: Uuid,
        query: &OrderListQuery,
    ) -> BackofficeResult<Page<OrderWithManager>> {
        self.list(query, Some(manager_id)).await
    }

    /// Render the full (unpaginated) result set as an xlsx document:
    /// count first, then fetch exactly that many rows.
    pub async fn list_as_spreadsheet(
        &self,
        use_mine: bool,
        query: &OrderListQuery,
        manager_id: Option<Uuid>,
    ) -> BackofficeResult<Vec<u8>> {
        let scope = if use_mine { manager_id } else { None };

        let total = self.orders.count(&query.filter, scope).await?;
        let rows = if total == 0 {
            Vec::new()
        } else {
            self.orders
                .search(&query.filter, &query.sort_by, 0, total, scope)
                .await?
        };
        let data = self.attach_managers(rows).await?;

        debug!(rows = data.len(), "Rendering order export");
        export::orders_to_xlsx(&data)
    }

    pub async fn get_by_id(&self, id: Uuid) -> BackofficeResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| BackofficeError::not_found("Order", id.to_string()))
    }

    /// Polymorphic id-or-email lookup (customer email). Absence is
    /// `None`, not an error.
    pub async fn get_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> BackofficeResult<Option<Order>> {
        match identifier {
            Identifier::Email(email) => self.orders.find_by_email(email).await,
            Identifier::Id(id) => self.orders.find_by_id(*id).await,
            Identifier::Unknown(_) => Ok(None),
        }
    }

    /// Resolve an order or fail with `NotFound`.
    pub async fn check_order(&self, identifier: &Identifier) -> BackofficeResult<Order> {
        self.get_by_identifier(identifier)
            .await?
            .ok_or_else(|| BackofficeError::not_found("Order", identifier.to_string()))
    }

    /// Apply a patch to an order on behalf of the acting manager.
    ///
    /// A group name in the patch must already exist and is resolved
    /// to its stored name. Editing is permitted while the order is
    /// unassigned or assigned to the acting manager; success
    /// (re)assigns the order to the acting manager. The guard and
    /// the claim execute as one conditional update, so a concurrent
    /// claim by another manager loses cleanly instead of racing.
    pub async fn edit(
        &self,
        identifier: &Identifier,
        mut patch: UpdateOrder,
        acting: &ActingManager,
    ) -> BackofficeResult<Order> {
        if let Some(group_name) = &patch.group {
            let group = self
                .check_group(group_name)
                .await?
                .ok_or_else(|| BackofficeError::not_found("Group", group_name.clone()))?;
            patch.group = Some(group.name);
        }

        let Some(order) = self.get_by_identifier(identifier).await? else {
            return Err(BackofficeError::forbidden(
                "You do not have permission to edit this order",
            ));
        };
        if !order.is_actionable_by(acting.id) {
            return Err(BackofficeError::forbidden(
                "You do not have permission to edit this order",
            ));
        }

        match self.orders.update_claimed(order.id, patch, acting.id).await? {
            Some(updated) => Ok(updated),
            // The conditional update found the order claimed by
            // someone else in the meantime.
            None => Err(BackofficeError::forbidden(
                "You do not have permission to edit this order",
            )),
        }
    }

    /// Append a comment on behalf of the acting manager.
    ///
    /// Commenting follows the same authorization rule as editing. A
    /// comment on a `New` order transitions it to `InWork` through
    /// the edit path, which also claims the order; commenting on a
    /// non-New unassigned order leaves it unclaimed.
    pub async fn add_comment(
        &self,
        identifier: &Identifier,
        text: String,
        acting: &ActingManager,
    ) -> BackofficeResult<Comment> {
        let order = self.check_order(identifier).await?;

        if !order.is_actionable_by(acting.id) {
            return Err(BackofficeError::forbidden("You can not add comment"));
        }

        if order.status == OrderStatus::New {
            self.edit(
                identifier,
                UpdateOrder {
                    status: Some(OrderStatus::InWork),
                    ..UpdateOrder::default()
                },
                acting,
            )
            .await?;
        }

        self.comments
            .create(CreateComment {
                order_id: order.id,
                author: acting.display_name(),
                text,
            })
            .await
    }

    /// Get-or-create a group by its unique name.
    pub async fn create_group(&self, name: &str) -> BackofficeResult<Group> {
        match self.check_group(name).await? {
            Some(group) => Ok(group),
            None => self.groups.create(name).await,
        }
    }

    /// Lookup-only by unique name.
    pub async fn check_group(&self, name: &str) -> BackofficeResult<Option<Group>> {
        self.groups.find_by_name(name).await
    }

    pub async fn list_comments(&self, order_id: Uuid) -> BackofficeResult<Vec<Comment>> {
        self.comments.list_by_order(order_id).await
    }

    pub async fn list_groups(&self) -> BackofficeResult<Vec<Group>> {
        self.groups.list().await
    }

    /// Count one status bucket, optionally scoped to a manager.
    pub async fn count_orders(
        &self,
        status: Option<OrderStatus>,
        manager_id: Option<Uuid>,
    ) -> BackofficeResult<u64> {
        self.orders.count_by_status(status, manager_id).await
    }

    /// Global per-status counts, including the `new` (stored-NULL)
    /// bucket.
    pub async fn statistic(&self) -> BackofficeResult<OrderStatistic> {
        let total = self.orders.count_by_status(None, None).await?;
        let in_work = self
            .orders
            .count_by_status(Some(OrderStatus::InWork), None)
            .await?;
        let agree = self
            .orders
            .count_by_status(Some(OrderStatus::Agree), None)
            .await?;
        let disagree = self
            .orders
            .count_by_status(Some(OrderStatus::Disagree), None)
            .await?;
        let dubbing = self
            .orders
            .count_by_status(Some(OrderStatus::Dubbing), None)
            .await?;
        let new = self
            .orders
            .count_by_status(Some(OrderStatus::New), None)
            .await?;

        Ok(OrderStatistic {
            total,
            in_work,
            agree,
            disagree,
            dubbing,
            new,
        })
    }

    /// Join each order with its assigned manager's projection. One
    /// lookup per distinct manager id on the page.
    async fn attach_managers(
        &self,
        orders: Vec<Order>,
    ) -> BackofficeResult<Vec<OrderWithManager>> {
        let mut cache: HashMap<Uuid, Option<ManagerRef>> = HashMap::new();

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let manager = match order.manager_id {
                Some(id) => {
                    if !cache.contains_key(&id) {
                        let fetched = self.managers.find_by_id(id).await?.map(|m| ManagerRef {
                            id: m.id,
                            name: m.name,
                            surname: m.surname,
                        });
                        cache.insert(id, fetched);
                    }
                    cache[&id].clone()
                }
                None => None,
            };
            result.push(OrderWithManager { order, manager });
        }

        Ok(result)
    }
}
