#![forbid(unsafe_code)]

use super::*;
use mw_core::global_id::new_global_id;
use mw_core::timestamp::now_reference_seconds;
use rusqlite::types::Value;

const DEFAULT_OPTION_FLAG: i64 = 1;

/// Column values for one entity row, kept in insertion order.
///
/// Keys compare case-insensitively, like SQLite column names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets `column`, replacing an existing entry for the same column.
    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(column))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.entries
            .iter()
            .any(|(existing, _)| existing.eq_ignore_ascii_case(column))
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(column, _)| column.as_str())
    }

    fn set_default(&mut self, column: &str, value: impl FnOnce() -> Value) {
        if !self.contains(column) {
            self.entries.push((column.to_string(), value()));
        }
    }

    fn into_validated(self) -> Result<(Vec<String>, Vec<Value>), StoreError> {
        let mut columns = Vec::with_capacity(self.entries.len());
        let mut values = Vec::with_capacity(self.entries.len());
        for (column, value) in self.entries {
            columns.push(identifier(&column)?.into_string());
            values.push(value);
        }
        Ok((columns, values))
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (column, value) in iter {
            fields.insert(column.as_ref(), value);
        }
        fields
    }
}

impl Session {
    /// Inserts a row of logical type `type_name` into the entity table.
    ///
    /// Absent system columns get defaults: the type's discriminator, option
    /// flag 1, a fresh upper-case UUID and the current reference-epoch time.
    /// Returns the new surrogate key in apply mode; a preview has none.
    pub fn insert(&mut self, type_name: &str, fields: FieldMap) -> Result<Option<i64>, StoreError> {
        let discriminator = self
            .registry
            .discriminator(&self.conn, type_name)?
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))?;

        let entity = &self.layout.entity;
        let mut data = fields;
        data.set_default(&entity.discriminator_column, || {
            Value::Integer(discriminator)
        });
        data.set_default(&entity.option_column, || {
            Value::Integer(DEFAULT_OPTION_FLAG)
        });
        data.set_default(&entity.global_id_column, || Value::Text(new_global_id()));
        data.set_default(&entity.creation_date_column, || {
            Value::Real(now_reference_seconds())
        });

        let (columns, values) = data.into_validated()?;
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            entity.table,
            columns.join(", "),
            numbered_placeholders(values.len())
        );
        let counter = self.layout.bump_type_counter.then(|| {
            let registry = &self.layout.type_registry;
            PlannedStatement::with_params(
                format!(
                    "UPDATE {table} SET {max} = MAX(IFNULL({max}, 0), (SELECT IFNULL(MAX({pk}), 0) FROM {entity})) WHERE {ent} = ?1",
                    table = registry.table,
                    max = registry.max_id_column,
                    pk = entity.primary_key_column,
                    entity = entity.table,
                    ent = registry.discriminator_column,
                ),
                vec![Value::Integer(discriminator)],
            )
        });

        let inserted = self.exec(PlannedStatement::with_params(sql, values))?;
        let new_id = inserted.map(|_| self.conn.last_insert_rowid());
        if let Some(counter) = counter {
            self.exec(counter)?;
        }
        Ok(new_id)
    }

    /// Sets `fields` on the row with surrogate key `id`. An empty map plans nothing.
    ///
    /// Returns the affected-row count when the statement was executed.
    pub fn update(&mut self, id: i64, fields: FieldMap) -> Result<Option<usize>, StoreError> {
        if fields.is_empty() {
            return Ok(None);
        }
        let (columns, mut values) = fields.into_validated()?;
        let sets = columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let entity = &self.layout.entity;
        let sql = format!(
            "UPDATE {} SET {sets} WHERE {} = ?{}",
            entity.table,
            entity.primary_key_column,
            values.len() + 1
        );
        values.push(Value::Integer(id));
        self.exec(PlannedStatement::with_params(sql, values))
    }

    /// Deletes the row unconditionally; see [`Session::safe_delete`] for the guarded form.
    pub fn delete(&mut self, id: i64) -> Result<Option<usize>, StoreError> {
        let entity = &self.layout.entity;
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            entity.table, entity.primary_key_column
        );
        self.exec(PlannedStatement::with_params(sql, vec![Value::Integer(id)]))
    }

    /// Deletes the row only when nothing references it.
    ///
    /// An empty result means the delete was planned; otherwise the returned
    /// hits are what blocked it and no statement was planned.
    pub fn safe_delete(&mut self, id: i64) -> Result<Vec<ReferenceHit>, StoreError> {
        let hits = self.find_references(id)?;
        if hits.is_empty() {
            self.delete(id)?;
        } else {
            debug!(id, hits = hits.len(), "delete blocked by references");
        }
        Ok(hits)
    }
}
