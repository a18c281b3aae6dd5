//! SQLite database connection management
//!
//! Persists namespaced settings as JSON text, one row per (namespace, field).

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::backend::{KeyValueBackend, StorageKey};
use super::error::StorageError;

/// Database wrapper for SQLite connection management
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize schema
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Create an in-memory database (tests and throwaway sessions)
    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueBackend for Database {
    fn get(&self, key: &StorageKey) -> Result<Option<Value>, StorageError> {
        let raw: Option<String> = match key {
            StorageKey::Legacy(field) => self
                .conn
                .query_row(
                    "SELECT value FROM legacy_settings WHERE field = ?1",
                    params![field.as_str()],
                    |row| row.get(0),
                )
                .optional()?,
            StorageKey::Scoped { namespace, field } => self
                .conn
                .query_row(
                    "SELECT value FROM settings WHERE namespace = ?1 AND field = ?2",
                    params![namespace.as_str(), field.as_str()],
                    |row| row.get(0),
                )
                .optional()?,
        };

        raw.map(|text| serde_json::from_str(&text).map_err(StorageError::from))
            .transpose()
    }

    fn set(&mut self, key: &StorageKey, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        match key {
            StorageKey::Legacy(field) => {
                self.conn.execute(
                    "INSERT INTO legacy_settings (field, value) VALUES (?1, ?2)
                     ON CONFLICT(field) DO UPDATE SET value = excluded.value",
                    params![field.as_str(), text],
                )?;
            }
            StorageKey::Scoped { namespace, field } => {
                self.conn.execute(
                    "INSERT INTO settings (namespace, field, value) VALUES (?1, ?2, ?3)
                     ON CONFLICT(namespace, field) DO UPDATE SET
                        value = excluded.value,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                    params![namespace.as_str(), field.as_str(), text],
                )?;
            }
        }
        Ok(())
    }

    fn delete(&mut self, key: &StorageKey) -> Result<(), StorageError> {
        match key {
            StorageKey::Legacy(field) => {
                self.conn.execute(
                    "DELETE FROM legacy_settings WHERE field = ?1",
                    params![field.as_str()],
                )?;
            }
            StorageKey::Scoped { namespace, field } => {
                self.conn.execute(
                    "DELETE FROM settings WHERE namespace = ?1 AND field = ?2",
                    params![namespace.as_str(), field.as_str()],
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, Namespace};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_database_creation() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("settings.db");

        let db = Database::new(&db_path);
        assert!(db.is_ok(), "Database creation failed: {:?}", db.err());
        assert!(db_path.exists());
    }

    #[test]
    fn test_schema_initialization() {
        let db = Database::new_in_memory().unwrap();

        let tables: Vec<String> = db
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"settings".to_string()));
        assert!(tables.contains(&"legacy_settings".to_string()));
    }

    #[test]
    fn test_scoped_set_overwrites() {
        let mut db = Database::new_in_memory().unwrap();
        let key = StorageKey::scoped(&Namespace::new("android"), Field::ReferenceTime);

        db.set(&key, &json!(1)).unwrap();
        db.set(&key, &json!(1_323_129_600_000i64)).unwrap();

        assert_eq!(db.get(&key).unwrap(), Some(json!(1_323_129_600_000i64)));
    }

    #[test]
    fn test_legacy_roundtrip_and_delete() {
        let mut db = Database::new_in_memory().unwrap();
        let key = StorageKey::Legacy(Field::ReferenceTag);

        db.set(&key, &json!("android-2.3_r1")).unwrap();
        assert_eq!(db.get(&key).unwrap(), Some(json!("android-2.3_r1")));

        db.delete(&key).unwrap();
        assert!(db.get(&key).unwrap().is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("settings.db");
        let key = StorageKey::scoped(&Namespace::new("chromium"), Field::ReferenceBranch);

        {
            let mut db = Database::new(&db_path).unwrap();
            db.set(&key, &json!("refs/branch-heads/4044")).unwrap();
        }

        let db = Database::new(&db_path).unwrap();
        assert_eq!(db.get(&key).unwrap(), Some(json!("refs/branch-heads/4044")));
    }

    #[test]
    fn test_corrupt_value_is_reported() {
        let db = Database::new_in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO settings (namespace, field, value) VALUES ('android', 'referenceTag', '{oops')",
                [],
            )
            .unwrap();

        let key = StorageKey::scoped(&Namespace::new("android"), Field::ReferenceTag);
        assert!(matches!(db.get(&key), Err(StorageError::Serialization(_))));
    }
}
