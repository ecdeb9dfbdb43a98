//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. The expediente estado is stored as a
//! string with an ASSERT constraint over the closed state set.

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
-- Usuarios
-- =======================================================================
DEFINE TABLE usuario SCHEMAFULL;
DEFINE FIELD nombre ON TABLE usuario TYPE string;
DEFINE FIELD email ON TABLE usuario TYPE string;
DEFINE FIELD password_hash ON TABLE usuario TYPE string;
DEFINE FIELD activo ON TABLE usuario TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE usuario TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_usuario_email ON TABLE usuario \
    COLUMNS email UNIQUE;

-- =======================================================================
-- Roles
-- =======================================================================
DEFINE TABLE rol SCHEMAFULL;
DEFINE FIELD nombre ON TABLE rol TYPE string;
DEFINE FIELD created_at ON TABLE rol TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_rol_nombre ON TABLE rol COLUMNS nombre UNIQUE;

-- =======================================================================
-- Permisos
-- =======================================================================
DEFINE TABLE permiso SCHEMAFULL;
DEFINE FIELD nombre ON TABLE permiso TYPE string;
DEFINE FIELD created_at ON TABLE permiso TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_permiso_nombre ON TABLE permiso \
    COLUMNS nombre UNIQUE;

-- =======================================================================
-- Expedientes
-- =======================================================================
DEFINE TABLE expediente SCHEMAFULL;
DEFINE FIELD numero ON TABLE expediente TYPE string;
DEFINE FIELD descripcion ON TABLE expediente TYPE option<string>;
DEFINE FIELD fecha_registro ON TABLE expediente TYPE datetime;
DEFINE FIELD tecnico_id ON TABLE expediente TYPE string;
DEFINE FIELD estado ON TABLE expediente TYPE string \
    ASSERT $value IN ['REGISTRADO', 'PARA REVISAR', 'APROBADO', \
    'RECHAZADO', 'CORREGIDO'];
DEFINE FIELD created_at ON TABLE expediente TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_expediente_numero ON TABLE expediente \
    COLUMNS numero UNIQUE;
DEFINE INDEX idx_expediente_estado ON TABLE expediente \
    COLUMNS estado;

-- =======================================================================
-- Rechazos (append-only)
-- =======================================================================
DEFINE TABLE rechazo SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD expediente_id ON TABLE rechazo TYPE string;
DEFINE FIELD usuario_id ON TABLE rechazo TYPE string;
DEFINE FIELD justificacion ON TABLE rechazo TYPE string;
DEFINE FIELD fecha ON TABLE rechazo TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_rechazo_expediente ON TABLE rechazo \
    COLUMNS expediente_id;

-- =======================================================================
-- Indicios
-- =======================================================================
DEFINE TABLE indicio SCHEMAFULL;
DEFINE FIELD expediente_id ON TABLE indicio TYPE string;
DEFINE FIELD objeto ON TABLE indicio TYPE option<string>;
DEFINE FIELD descripcion ON TABLE indicio TYPE string;
DEFINE FIELD color ON TABLE indicio TYPE option<string>;
DEFINE FIELD tamano ON TABLE indicio TYPE option<string>;
-- Fixed-point weight kept exact as text at the persistence boundary.
DEFINE FIELD peso ON TABLE indicio TYPE option<string>;
DEFINE FIELD ubicacion ON TABLE indicio TYPE option<string>;
DEFINE FIELD tecnico_id ON TABLE indicio TYPE string;
DEFINE FIELD created_at ON TABLE indicio TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_indicio_expediente ON TABLE indicio \
    COLUMNS expediente_id;

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- Usuario -> Rol assignment
DEFINE TABLE tiene_rol TYPE RELATION SCHEMAFULL;

-- Rol -> Permiso grants
DEFINE TABLE otorga TYPE RELATION SCHEMAFULL;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Bring the schema up to the latest version.
///
/// The `_migration` table records what has already been applied;
/// anything newer runs in version order. Both the tracking DDL and
/// the schema DDL are idempotent, so calling this at every startup
/// is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let applied: Vec<MigrationRecord> = result.take(0)?;
    let at_version = applied.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS.iter().filter(|m| m.version > at_version) {
        info!(
            version = migration.version,
            name = migration.name,
            "aplicando migración de esquema"
        );

        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "la migración v{} '{}' falló: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "no se pudo registrar la migración v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "migración aplicada");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
