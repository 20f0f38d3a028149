#![forbid(unsafe_code)]

use super::*;

impl Session {
    /// Writes `new_name` into the row's display-name column.
    ///
    /// Without an explicit `name_column` the layout's name candidates are
    /// tried in order against the entity table and the first existing one
    /// is used.
    pub fn rename(
        &mut self,
        id: i64,
        new_name: &str,
        name_column: Option<&str>,
    ) -> Result<Option<usize>, StoreError> {
        let column = match name_column {
            Some(column) => identifier(column)?.into_string(),
            None => self.resolve_name_column()?,
        };
        self.update(id, FieldMap::new().with(&column, new_name.to_string()))
    }

    pub fn resolve_name_column(&self) -> Result<String, StoreError> {
        let table = &self.layout.entity.table;
        self.first_existing_column(table, &self.layout.name_candidates)?
            .ok_or_else(|| {
                StoreError::Configuration(format!(
                    "could not determine a name column on {table} (tried {}); pass the name column explicitly",
                    self.layout.name_candidates.join(", ")
                ))
            })
    }
}
