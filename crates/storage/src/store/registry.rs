#![forbid(unsafe_code)]

use super::{StoreError, StoreLayout};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;

/// Resolves a logical type name to the discriminator stored in the entity table.
pub trait TypeRegistry: std::fmt::Debug {
    fn discriminator(&self, conn: &Connection, type_name: &str)
    -> Result<Option<i64>, StoreError>;
}

/// Reads the registry table of the open store on every lookup.
#[derive(Clone, Debug)]
pub struct StoreTypeRegistry {
    sql: String,
}

impl StoreTypeRegistry {
    pub fn for_layout(layout: &StoreLayout) -> Self {
        let registry = &layout.type_registry;
        Self {
            sql: format!(
                "SELECT {} FROM {} WHERE {} = ?1 LIMIT 1",
                registry.discriminator_column, registry.table, registry.name_column
            ),
        }
    }
}

impl TypeRegistry for StoreTypeRegistry {
    fn discriminator(
        &self,
        conn: &Connection,
        type_name: &str,
    ) -> Result<Option<i64>, StoreError> {
        Ok(conn
            .query_row(&self.sql, params![type_name], |row| row.get::<_, i64>(0))
            .optional()?)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FixedTypeRegistry {
    entries: BTreeMap<String, i64>,
}

impl FixedTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, type_name: impl Into<String>, discriminator: i64) -> Self {
        self.entries.insert(type_name.into(), discriminator);
        self
    }
}

impl TypeRegistry for FixedTypeRegistry {
    fn discriminator(
        &self,
        _conn: &Connection,
        type_name: &str,
    ) -> Result<Option<i64>, StoreError> {
        Ok(self.entries.get(type_name).copied())
    }
}
