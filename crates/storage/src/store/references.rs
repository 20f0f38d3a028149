#![forbid(unsafe_code)]

use super::schema::{first_present, reference_columns};
use super::*;
use mw_core::ids::quote_identifier;
use rusqlite::params;
use rusqlite::types::Value;

pub const MAX_REFERENCE_SAMPLES: usize = 5;

/// Rows of `table` whose `column` holds the scanned id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceHit {
    pub table: String,
    pub column: String,
    pub count: u64,
    pub sample_ids: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Counted { count: u64, sample_ids: Vec<i64> },
    Skipped { reason: String },
}

/// Result of probing one column, or a whole table when `column` is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceProbe {
    pub table: String,
    pub column: Option<String>,
    pub outcome: ProbeOutcome,
}

impl Session {
    /// Every rows-that-hold-`id` probe, including the ones that had to be skipped.
    ///
    /// Only enumerating the tables can fail the scan; a table or column that
    /// cannot be queried yields a `Skipped` probe instead.
    pub fn probe_references(&self, id: i64) -> Result<Vec<ReferenceProbe>, StoreError> {
        let mut probes = Vec::new();
        for table in self.tables()? {
            let columns = match self.columns(&table) {
                Ok(columns) => columns,
                Err(err) => {
                    debug!(table = %table, error = %err, "reference probe skipped table");
                    probes.push(ReferenceProbe {
                        table,
                        column: None,
                        outcome: ProbeOutcome::Skipped {
                            reason: err.to_string(),
                        },
                    });
                    continue;
                }
            };
            let candidates = reference_columns(&columns, &self.layout);
            if candidates.is_empty() {
                continue;
            }
            let row_id_column = first_present(&columns, &self.layout.row_id_candidates);

            for column in candidates {
                let outcome = match self.probe_column(&table, &column, row_id_column.as_deref(), id)
                {
                    Ok((count, sample_ids)) => ProbeOutcome::Counted { count, sample_ids },
                    Err(err) => {
                        debug!(
                            table = %table,
                            column = %column,
                            error = %err,
                            "reference probe skipped column"
                        );
                        ProbeOutcome::Skipped {
                            reason: err.to_string(),
                        }
                    }
                };
                probes.push(ReferenceProbe {
                    table: table.clone(),
                    column: Some(column),
                    outcome,
                });
            }
        }
        Ok(probes)
    }

    /// Rows anywhere in the store that hold `id` in a reference-capable column.
    pub fn find_references(&self, id: i64) -> Result<Vec<ReferenceHit>, StoreError> {
        Ok(collect_hits(self.probe_references(id)?))
    }

    fn probe_column(
        &self,
        table: &str,
        column: &str,
        row_id_column: Option<&str>,
        id: i64,
    ) -> Result<(u64, Vec<i64>), StoreError> {
        let table = quote_identifier(table);
        let column = quote_identifier(column);

        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1"),
            params![id],
            |row| row.get::<_, i64>(0),
        )?;
        let count = u64::try_from(count).map_err(|_| StoreError::InvalidInput("negative row count"))?;
        if count == 0 {
            return Ok((0, Vec::new()));
        }

        let Some(row_id_column) = row_id_column else {
            return Ok((count, Vec::new()));
        };
        // The count is authoritative; samples are best-effort.
        let sample_ids = match self.sample_row_ids(&table, &column, row_id_column, id) {
            Ok(sample_ids) => sample_ids,
            Err(err) => {
                debug!(table = %table, column = %column, error = %err, "reference samples unavailable");
                Vec::new()
            }
        };
        Ok((count, sample_ids))
    }

    /// Integer row ids of up to [`MAX_REFERENCE_SAMPLES`] matching rows; other value types are dropped.
    fn sample_row_ids(
        &self,
        table: &str,
        column: &str,
        row_id_column: &str,
        id: i64,
    ) -> Result<Vec<i64>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {table} WHERE {column} = ?1 LIMIT {MAX_REFERENCE_SAMPLES}",
            quote_identifier(row_id_column)
        ))?;
        let values = stmt
            .query_map(params![id], |row| row.get::<_, Value>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Value::Integer(row_id) => Some(row_id),
                _ => None,
            })
            .collect())
    }
}

/// Keeps the columns that matched at least one row, in probe order.
pub(crate) fn collect_hits(probes: Vec<ReferenceProbe>) -> Vec<ReferenceHit> {
    probes
        .into_iter()
        .filter_map(|probe| match (probe.column, probe.outcome) {
            (Some(column), ProbeOutcome::Counted { count, sample_ids }) if count > 0 => {
                Some(ReferenceHit {
                    table: probe.table,
                    column,
                    count,
                    sample_ids,
                })
            }
            _ => None,
        })
        .collect()
}
