//! Manager directory — CRUD over staff accounts plus per-manager
//! order statistics.

use backoffice_core::error::{BackofficeError, BackofficeResult};
use backoffice_core::identifier::Identifier;
use backoffice_core::models::manager::{CreateManager, Manager, UpdateManager};
use backoffice_core::models::order::OrderStatus;
use backoffice_core::models::statistic::ManagerStatistic;
use backoffice_core::query::{MANAGER_PAGE_LIMIT, Page, PageQuery};
use backoffice_core::repository::{ManagerRepository, OrderRepository};
use uuid::Uuid;

/// Manager directory service.
///
/// Generic over repository implementations so that the directory
/// layer has no dependency on the database crate.
pub struct ManagerDirectory<M: ManagerRepository, O: OrderRepository> {
    managers: M,
    orders: O,
}

impl<M: ManagerRepository, O: OrderRepository> ManagerDirectory<M, O> {
    pub fn new(managers: M, orders: O) -> Self {
        Self { managers, orders }
    }

    /// Page of staff accounts (role `manager` only).
    pub async fn list(&self, query: PageQuery) -> BackofficeResult<Page<Manager>> {
        let (page, limit) = query.resolve(MANAGER_PAGE_LIMIT);
        let offset = (page - 1) * limit;

        let (items, total) = self.managers.list(offset, limit).await?;
        Ok(Page::new(items, page, limit, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> BackofficeResult<Manager> {
        self.managers
            .find_by_id(id)
            .await?
            .ok_or_else(|| BackofficeError::not_found("User", id.to_string()))
    }

    /// Polymorphic id-or-email lookup. Absence is `None`, not an
    /// error; callers decide whether it is fatal.
    pub async fn get_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> BackofficeResult<Option<Manager>> {
        match identifier {
            Identifier::Email(email) => self.managers.find_by_email(email).await,
            Identifier::Id(id) => self.managers.find_by_id(*id).await,
            Identifier::Unknown(_) => Ok(None),
        }
    }

    /// Create a staff account. The email must not be registered to
    /// any existing account (case-insensitive); it is stored
    /// lowercased. No password is set at creation.
    pub async fn create(&self, mut input: CreateManager) -> BackofficeResult<Manager> {
        let identifier = Identifier::parse(&input.email);
        if self.get_by_identifier(&identifier).await?.is_some() {
            return Err(BackofficeError::bad_request("Email is already in use."));
        }

        input.email = input.email.to_lowercase();
        self.managers.create(input).await
    }

    /// Partial patch; a supplied raw password is hashed by the
    /// repository before storage.
    pub async fn update(&self, id: Uuid, input: UpdateManager) -> BackofficeResult<Manager> {
        self.managers.update(id, input).await
    }

    /// Per-status counts of orders assigned to the resolved manager.
    pub async fn statistic(
        &self,
        identifier: &Identifier,
    ) -> BackofficeResult<ManagerStatistic> {
        let manager = self
            .get_by_identifier(identifier)
            .await?
            .ok_or_else(|| BackofficeError::not_found("Manager", identifier.to_string()))?;

        let scope = Some(manager.id);
        let total = self.orders.count_by_status(None, scope).await?;
        let in_work = self
            .orders
            .count_by_status(Some(OrderStatus::InWork), scope)
            .await?;
        let agree = self
            .orders
            .count_by_status(Some(OrderStatus::Agree), scope)
            .await?;
        let disagree = self
            .orders
            .count_by_status(Some(OrderStatus::Disagree), scope)
            .await?;
        let dubbing = self
            .orders
            .count_by_status(Some(OrderStatus::Dubbing), scope)
            .await?;

        Ok(ManagerStatistic {
            total,
            in_work,
            agree,
            disagree,
            dubbing,
        })
    }
}
