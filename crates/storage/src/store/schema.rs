#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;

/// One column as reported by the store's own catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    /// 1-based position within the primary key, 0 when not part of it.
    pub primary_key_position: u32,
}

impl ColumnInfo {
    pub fn is_integer_like(&self) -> bool {
        self.declared_type.to_ascii_uppercase().contains("INT")
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key_position > 0
    }
}

impl Session {
    /// Data-bearing tables in catalog order, minus the excluded bookkeeping tables.
    pub fn tables(&self) -> Result<Vec<String>, StoreError> {
        let pattern = format!("{}%", escape_like(&self.layout.data_table_prefix));
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name LIKE ?1 ESCAPE '\\'",
        )?;
        let rows = stmt.query_map(params![pattern], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for name in rows {
            let name = name?;
            if !self.layout.is_excluded_table(&name) {
                out.push(name);
            }
        }
        Ok(out)
    }

    pub fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1)")?;
        let rows = stmt.query_map(params![table], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                declared_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                not_null: row.get::<_, i64>(2)? != 0,
                primary_key_position: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Integer columns of `table` that may hold a reference to another row.
    pub fn integer_columns(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let columns = self.columns(table)?;
        Ok(reference_columns(&columns, &self.layout))
    }

    pub fn has_column(&self, table: &str, column: &str) -> Result<bool, StoreError> {
        Ok(self
            .columns(table)?
            .iter()
            .any(|info| info.name.eq_ignore_ascii_case(column)))
    }

    /// The first of `candidates` that structurally exists on `table`.
    pub fn first_existing_column(
        &self,
        table: &str,
        candidates: &[String],
    ) -> Result<Option<String>, StoreError> {
        let columns = self.columns(table)?;
        Ok(first_present(&columns, candidates))
    }
}

/// Primary-key columns are skipped so a row never references itself. With
/// `scan_composite_key_members` the members of a multi-column key are kept.
pub(crate) fn reference_columns(columns: &[ColumnInfo], layout: &StoreLayout) -> Vec<String> {
    let key_width = columns.iter().filter(|c| c.is_primary_key()).count();
    let keep_key_members = layout.scan_composite_key_members && key_width > 1;
    let entity = &layout.entity;
    columns
        .iter()
        .filter(|c| c.is_integer_like())
        .filter(|c| keep_key_members || !c.is_primary_key())
        .filter(|c| {
            !c.name.eq_ignore_ascii_case(&entity.discriminator_column)
                && !c.name.eq_ignore_ascii_case(&entity.option_column)
        })
        .map(|c| c.name.clone())
        .collect()
}

pub(crate) fn first_present(columns: &[ColumnInfo], candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| {
            columns
                .iter()
                .any(|info| info.name.eq_ignore_ascii_case(candidate))
        })
        .cloned()
}

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
