//! SurrealDB implementation of [`OrderRepository`].
//!
//! The list/count predicate comes from [`crate::filter`]; the claim
//! logic is an atomic conditional update so two managers cannot both
//! claim the same order.

use std::collections::BTreeMap;

use backoffice_core::error::BackofficeResult;
use backoffice_core::models::order::{CreateOrder, Order, OrderStatus, UpdateOrder};
use backoffice_core::repository::OrderRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::filter::{BindValue, build_predicate, order_by_clause};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrderRow {
    name: Option<String>,
    surname: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    age: Option<i64>,
    course: Option<String>,
    course_type: Option<String>,
    course_format: Option<String>,
    sum: Option<i64>,
    already_paid: Option<i64>,
    status: Option<String>,
    group_name: Option<String>,
    manager_id: Option<String>,
    utm: Option<String>,
    msg: Option<String>,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrderRowWithId {
    record_id: String,
    name: Option<String>,
    surname: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    age: Option<i64>,
    course: Option<String>,
    course_type: Option<String>,
    course_format: Option<String>,
    sum: Option<i64>,
    already_paid: Option<i64>,
    status: Option<String>,
    group_name: Option<String>,
    manager_id: Option<String>,
    utm: Option<String>,
    msg: Option<String>,
    created_at: DateTime<Utc>,
}

fn parse_status(stored: Option<&str>) -> Result<OrderStatus, DbError> {
    OrderStatus::from_stored(stored).ok_or_else(|| {
        DbError::Corrupt(format!(
            "unknown order status: {}",
            stored.unwrap_or("NONE")
        ))
    })
}

fn parse_manager_id(stored: Option<String>) -> Result<Option<Uuid>, DbError> {
    stored
        .map(|raw| {
            Uuid::parse_str(&raw)
                .map_err(|e| DbError::Corrupt(format!("invalid manager UUID: {e}")))
        })
        .transpose()
}

impl OrderRow {
    fn into_order(self, id: Uuid) -> Result<Order, DbError> {
        Ok(Order {
            id,
            name: self.name,
            surname: self.surname,
            email: self.email,
            phone: self.phone,
            age: self.age,
            course: self.course,
            course_type: self.course_type,
            course_format: self.course_format,
            sum: self.sum,
            already_paid: self.already_paid,
            status: parse_status(self.status.as_deref())?,
            group: self.group_name,
            manager_id: parse_manager_id(self.manager_id)?,
            utm: self.utm,
            msg: self.msg,
            created_at: self.created_at,
        })
    }
}

impl OrderRowWithId {
    fn try_into_order(self) -> Result<Order, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(Order {
            id,
            name: self.name,
            surname: self.surname,
            email: self.email,
            phone: self.phone,
            age: self.age,
            course: self.course,
            course_type: self.course_type,
            course_format: self.course_format,
            sum: self.sum,
            already_paid: self.already_paid,
            status: parse_status(self.status.as_deref())?,
            group: self.group_name,
            manager_id: parse_manager_id(self.manager_id)?,
            utm: self.utm,
            msg: self.msg,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Order repository.
#[derive(Clone)]
pub struct SurrealOrderRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrderRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrderRepository for SurrealOrderRepository<C> {
    async fn create(&self, input: CreateOrder) -> BackofficeResult<Order> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // status stays NONE (New); the order is unassigned at intake.
        let result = self
            .db
            .query(
                "CREATE type::record('orders', $id) SET \
                 name = $name, surname = $surname, \
                 email = $email, phone = $phone, age = $age, \
                 course = $course, course_type = $course_type, \
                 course_format = $course_format, \
                 sum = $sum, already_paid = $already_paid, \
                 utm = $utm, msg = $msg",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("surname", input.surname))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("age", input.age))
            .bind(("course", input.course))
            .bind(("course_type", input.course_type))
            .bind(("course_format", input.course_format))
            .bind(("sum", input.sum))
            .bind(("already_paid", input.already_paid))
            .bind(("utm", input.utm))
            .bind(("msg", input.msg))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Order".into(),
            id: id_str,
        })?;

        Ok(row.into_order(id)?)
    }

    async fn find_by_id(&self, id: Uuid) -> BackofficeResult<Option<Order>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('orders', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_order(id)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> BackofficeResult<Option<Order>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM orders \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrderRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_order()?)),
            None => Ok(None),
        }
    }

    async fn search(
        &self,
        filter: &BTreeMap<String, Vec<String>>,
        sort: &[(String, String)],
        offset: u64,
        limit: u64,
        manager_id: Option<Uuid>,
    ) -> BackofficeResult<Vec<Order>> {
        let predicate = build_predicate(filter, manager_id)?;

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM orders{}{} \
             LIMIT $limit START $offset",
            predicate.where_clause(),
            order_by_clause(sort),
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("limit", limit))
            .bind(("offset", offset));
        for (name, value) in predicate.binds {
            builder = match value {
                BindValue::Str(v) => builder.bind((name, v)),
                BindValue::Int(v) => builder.bind((name, v)),
                BindValue::Ints(v) => builder.bind((name, v)),
                BindValue::DateTime(v) => builder.bind((name, v)),
            };
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<OrderRowWithId> = result.take(0).map_err(DbError::from)?;

        let orders = rows
            .into_iter()
            .map(|row| row.try_into_order())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(orders)
    }

    async fn count(
        &self,
        filter: &BTreeMap<String, Vec<String>>,
        manager_id: Option<Uuid>,
    ) -> BackofficeResult<u64> {
        let predicate = build_predicate(filter, manager_id)?;

        let query = format!(
            "SELECT count() AS total FROM orders{} GROUP ALL",
            predicate.where_clause(),
        );

        let mut builder = self.db.query(&query);
        for (name, value) in predicate.binds {
            builder = match value {
                BindValue::Str(v) => builder.bind((name, v)),
                BindValue::Int(v) => builder.bind((name, v)),
                BindValue::Ints(v) => builder.bind((name, v)),
                BindValue::DateTime(v) => builder.bind((name, v)),
            };
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn count_by_status(
        &self,
        status: Option<OrderStatus>,
        manager_id: Option<Uuid>,
    ) -> BackofficeResult<u64> {
        let mut clauses: Vec<&str> = Vec::new();
        match status {
            None => {}
            Some(OrderStatus::New) => clauses.push("status = NONE"),
            Some(_) => clauses.push("status = $status"),
        }
        if manager_id.is_some() {
            clauses.push("manager_id = $manager_id");
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let query = format!("SELECT count() AS total FROM orders{where_clause} GROUP ALL");

        let mut builder = self.db.query(&query);
        if let Some(stored) = status.and_then(|s| s.as_stored()) {
            builder = builder.bind(("status", stored.to_string()));
        }
        if let Some(id) = manager_id {
            builder = builder.bind(("manager_id", id.to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn update_claimed(
        &self,
        id: Uuid,
        input: UpdateOrder,
        manager_id: Uuid,
    ) -> BackofficeResult<Option<Order>> {
        let id_str = id.to_string();

        // The claim is part of the same statement as the guard, so a
        // concurrent claim by another manager cannot interleave.
        let mut sets = vec!["manager_id = $acting_id"];
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.surname.is_some() {
            sets.push("surname = $surname");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.age.is_some() {
            sets.push("age = $age");
        }
        if input.course.is_some() {
            sets.push("course = $course");
        }
        if input.course_type.is_some() {
            sets.push("course_type = $course_type");
        }
        if input.course_format.is_some() {
            sets.push("course_format = $course_format");
        }
        if input.sum.is_some() {
            sets.push("sum = $sum");
        }
        if input.already_paid.is_some() {
            sets.push("already_paid = $already_paid");
        }
        if input.group.is_some() {
            sets.push("group_name = $group_name");
        }
        match input.status {
            Some(OrderStatus::New) => sets.push("status = NONE"),
            Some(_) => sets.push("status = $status"),
            None => {}
        }

        let query = format!(
            "UPDATE type::record('orders', $id) SET {} \
             WHERE manager_id = NONE OR manager_id = $acting_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str))
            .bind(("acting_id", manager_id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(surname) = input.surname {
            builder = builder.bind(("surname", surname));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(age) = input.age {
            builder = builder.bind(("age", age));
        }
        if let Some(course) = input.course {
            builder = builder.bind(("course", course));
        }
        if let Some(course_type) = input.course_type {
            builder = builder.bind(("course_type", course_type));
        }
        if let Some(course_format) = input.course_format {
            builder = builder.bind(("course_format", course_format));
        }
        if let Some(sum) = input.sum {
            builder = builder.bind(("sum", sum));
        }
        if let Some(already_paid) = input.already_paid {
            builder = builder.bind(("already_paid", already_paid));
        }
        if let Some(group) = input.group {
            builder = builder.bind(("group_name", group));
        }
        if let Some(stored) = input.status.and_then(|s| s.as_stored()) {
            builder = builder.bind(("status", stored.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_order(id)?)),
            None => Ok(None),
        }
    }
}
