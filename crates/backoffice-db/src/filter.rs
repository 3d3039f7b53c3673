//! Translation of the free-form order filter map into a SurrealQL
//! predicate.
//!
//! Each supported filter key is one entry in a declarative table
//! mapping key -> builder; the table is iterated once, so adding a
//! new filter key is a one-line change. Unknown keys are ignored.

use std::collections::BTreeMap;

use backoffice_core::error::{BackofficeError, BackofficeResult};
use backoffice_core::models::order::OrderStatus;
use backoffice_core::query::SortDirection;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

/// A typed bind value paired with a `$` placeholder in the query.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Str(String),
    Int(i64),
    Ints(Vec<i64>),
    DateTime(DateTime<Utc>),
}

/// An assembled WHERE predicate: conjunctive clause fragments plus
/// their bind values.
#[derive(Debug, Default)]
pub struct OrderPredicate {
    pub clauses: Vec<String>,
    pub binds: Vec<(String, BindValue)>,
}

impl OrderPredicate {
    /// Render the `WHERE` section, or an empty string when the
    /// predicate is unconstrained.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    fn push(&mut self, clause: impl Into<String>) {
        self.clauses.push(clause.into());
    }

    fn bind(&mut self, name: impl Into<String>, value: BindValue) {
        self.binds.push((name.into(), value));
    }
}

/// How a filter key is turned into a predicate fragment.
enum FilterKind {
    /// Lower bound on `created_at`.
    StartDate,
    /// Upper bound on `created_at`.
    EndDate,
    /// Case-insensitive substring match on the named column.
    Contains(&'static str),
    /// Exact match on the named column.
    Equals(&'static str),
    /// Exact status match with the New -> stored-NULL special case.
    Status,
    /// Exact match on the assigned manager's name.
    ManagerName,
    /// Integer equality or set membership; unparseable values fail.
    Age,
}

/// The supported filter keys. Order here fixes clause order, which
/// keeps generated queries deterministic.
const FILTER_TABLE: &[(&str, FilterKind)] = &[
    ("start_date", FilterKind::StartDate),
    ("end_date", FilterKind::EndDate),
    ("name", FilterKind::Contains("name")),
    ("surname", FilterKind::Contains("surname")),
    ("email", FilterKind::Contains("email")),
    ("phone", FilterKind::Contains("phone")),
    ("course", FilterKind::Equals("course")),
    ("course_type", FilterKind::Equals("course_type")),
    ("course_format", FilterKind::Equals("course_format")),
    ("group", FilterKind::Equals("group_name")),
    ("status", FilterKind::Status),
    ("manager", FilterKind::ManagerName),
    ("age", FilterKind::Age),
];

/// Build the predicate for an order query. `manager_id` (the "my
/// orders" scope) is ANDed in independently of the filter map.
pub fn build_predicate(
    filter: &BTreeMap<String, Vec<String>>,
    manager_id: Option<Uuid>,
) -> BackofficeResult<OrderPredicate> {
    let mut predicate = OrderPredicate::default();

    for (key, kind) in FILTER_TABLE {
        let Some(values) = filter.get(*key) else {
            continue;
        };
        // Multi-valued inputs take only the first value, except for
        // age where an array means set membership.
        let Some(first) = values.first() else {
            continue;
        };

        match kind {
            FilterKind::StartDate => {
                let ts = parse_date(first)?;
                predicate.push("created_at >= $f_start_date");
                predicate.bind("f_start_date", BindValue::DateTime(ts));
            }
            FilterKind::EndDate => {
                let ts = parse_date(first)?;
                predicate.push("created_at <= $f_end_date");
                predicate.bind("f_end_date", BindValue::DateTime(ts));
            }
            FilterKind::Contains(column) => {
                let bind_name = format!("f_{key}");
                predicate.push(format!(
                    "({column} != NONE AND \
                     string::contains(string::lowercase({column}), ${bind_name}))"
                ));
                predicate.bind(bind_name, BindValue::Str(first.to_lowercase()));
            }
            FilterKind::Equals(column) => {
                let bind_name = format!("f_{key}");
                predicate.push(format!("{column} = ${bind_name}"));
                predicate.bind(bind_name, BindValue::Str(first.clone()));
            }
            FilterKind::Status => match first.parse::<OrderStatus>() {
                Ok(OrderStatus::New) => predicate.push("status = NONE"),
                Ok(status) => {
                    predicate.push("status = $f_status");
                    predicate.bind(
                        "f_status",
                        BindValue::Str(status.to_string()),
                    );
                }
                // Unknown status strings match nothing rather than
                // failing, mirroring a plain equality filter.
                Err(()) => {
                    predicate.push("status = $f_status");
                    predicate.bind("f_status", BindValue::Str(first.clone()));
                }
            },
            FilterKind::ManagerName => {
                predicate.push(
                    "manager_id IN (SELECT VALUE meta::id(id) FROM manager \
                     WHERE name = $f_manager)",
                );
                predicate.bind("f_manager", BindValue::Str(first.clone()));
            }
            FilterKind::Age => {
                if values.len() > 1 {
                    let ages = values
                        .iter()
                        .map(|v| parse_age(v))
                        .collect::<BackofficeResult<Vec<i64>>>()?;
                    predicate.push("age IN $f_age");
                    predicate.bind("f_age", BindValue::Ints(ages));
                } else {
                    let age = parse_age(first)?;
                    predicate.push("age = $f_age");
                    predicate.bind("f_age", BindValue::Int(age));
                }
            }
        }
    }

    if let Some(id) = manager_id {
        predicate.push("manager_id = $scope_manager_id");
        predicate.bind("scope_manager_id", BindValue::Str(id.to_string()));
    }

    Ok(predicate)
}

fn parse_age(raw: &str) -> BackofficeResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| BackofficeError::bad_request("Invalid age value"))
}

fn parse_date(raw: &str) -> BackofficeResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(BackofficeError::bad_request("Invalid date value"))
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sortable columns: exposed name -> stored column.
const SORT_COLUMNS: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("surname", "surname"),
    ("email", "email"),
    ("phone", "phone"),
    ("age", "age"),
    ("course", "course"),
    ("course_type", "course_type"),
    ("course_format", "course_format"),
    ("sum", "sum"),
    ("already_paid", "already_paid"),
    ("status", "status"),
    ("group", "group_name"),
    ("created_at", "created_at"),
];

/// Render the `ORDER BY` section. Unrecognized columns are skipped;
/// unrecognized directions fall back to descending. An empty result
/// gets the default sort, `id` descending.
pub fn order_by_clause(sort: &[(String, String)]) -> String {
    let mut terms = Vec::new();
    for (column, direction) in sort {
        let Some((_, stored)) = SORT_COLUMNS.iter().find(|(name, _)| name == column) else {
            continue;
        };
        let direction = SortDirection::parse(direction);
        terms.push(format!("{stored} {}", direction.as_sql()));
    }
    if terms.is_empty() {
        terms.push("id DESC".to_string());
    }
    format!(" ORDER BY {}", terms.join(", "))
}
