//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Order status is stored as an option
//! string where NONE represents the New state; the ASSERT constraint
//! admits NONE plus the named statuses.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Managers (staff accounts)
-- =======================================================================
DEFINE TABLE manager SCHEMAFULL;
DEFINE FIELD name ON TABLE manager TYPE string;
DEFINE FIELD surname ON TABLE manager TYPE string;
DEFINE FIELD email ON TABLE manager TYPE string;
DEFINE FIELD password_hash ON TABLE manager TYPE option<string>;
DEFINE FIELD status ON TABLE manager TYPE option<string>;
DEFINE FIELD is_active ON TABLE manager TYPE bool DEFAULT false;
DEFINE FIELD last_login ON TABLE manager TYPE option<datetime>;
DEFINE FIELD role ON TABLE manager TYPE string DEFAULT 'manager';
DEFINE FIELD created_at ON TABLE manager TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_manager_email ON TABLE manager COLUMNS email UNIQUE;

-- =======================================================================
-- Orders (customer leads)
-- =======================================================================
DEFINE TABLE orders SCHEMAFULL;
DEFINE FIELD name ON TABLE orders TYPE option<string>;
DEFINE FIELD surname ON TABLE orders TYPE option<string>;
DEFINE FIELD email ON TABLE orders TYPE option<string>;
DEFINE FIELD phone ON TABLE orders TYPE option<string>;
DEFINE FIELD age ON TABLE orders TYPE option<int>;
DEFINE FIELD course ON TABLE orders TYPE option<string>;
DEFINE FIELD course_type ON TABLE orders TYPE option<string>;
DEFINE FIELD course_format ON TABLE orders TYPE option<string>;
DEFINE FIELD sum ON TABLE orders TYPE option<int>;
DEFINE FIELD already_paid ON TABLE orders TYPE option<int>;
-- NONE means status New.
DEFINE FIELD status ON TABLE orders TYPE option<string> \
    ASSERT $value = NONE OR $value IN \
    ['InWork', 'Agree', 'Disagree', 'Dubbing'];
DEFINE FIELD group_name ON TABLE orders TYPE option<string>;
DEFINE FIELD manager_id ON TABLE orders TYPE option<string>;
DEFINE FIELD utm ON TABLE orders TYPE option<string>;
DEFINE FIELD msg ON TABLE orders TYPE option<string>;
DEFINE FIELD created_at ON TABLE orders TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_orders_manager ON TABLE orders COLUMNS manager_id;
DEFINE INDEX idx_orders_status ON TABLE orders COLUMNS status;

-- =======================================================================
-- Groups (named cohorts)
-- =======================================================================
DEFINE TABLE order_group SCHEMAFULL;
DEFINE FIELD name ON TABLE order_group TYPE string;
DEFINE FIELD created_at ON TABLE order_group TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_order_group_name ON TABLE order_group \
    COLUMNS name UNIQUE;

-- =======================================================================
-- Comments (per-order threads)
-- =======================================================================
DEFINE TABLE comment SCHEMAFULL;
DEFINE FIELD order_id ON TABLE comment TYPE string;
DEFINE FIELD author ON TABLE comment TYPE string;
DEFINE FIELD text ON TABLE comment TYPE string;
DEFINE FIELD created_at ON TABLE comment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_comment_order ON TABLE comment COLUMNS order_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
