#![forbid(unsafe_code)]

use super::*;
use rusqlite::types::Value;

impl Session {
    /// One category-assignment row per `(category_id, amount)` split, in order.
    pub fn assign_categories<I>(&mut self, transaction_id: i64, splits: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let target = &self.layout.category_assignments;
        let sql = format!(
            "INSERT INTO {} ({}, {}, {}) VALUES (?1, ?2, ?3)",
            target.table, target.transaction_column, target.category_column, target.amount_column
        );
        for (category_id, amount) in splits {
            self.exec(PlannedStatement::with_params(
                sql.clone(),
                vec![
                    Value::Integer(transaction_id),
                    Value::Integer(category_id),
                    Value::Real(amount),
                ],
            ))?;
        }
        Ok(())
    }

    pub fn assign_tags<I>(&mut self, transaction_id: i64, tag_ids: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = i64>,
    {
        let target = &self.layout.tag_assignments;
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
            target.table, target.transaction_column, target.tag_column
        );
        for tag_id in tag_ids {
            self.exec(PlannedStatement::with_params(
                sql.clone(),
                vec![Value::Integer(transaction_id), Value::Integer(tag_id)],
            ))?;
        }
        Ok(())
    }

    /// Links a refund to the withdrawal it reverses.
    pub fn link_refund(
        &mut self,
        refund_transaction_id: i64,
        original_withdraw_id: i64,
    ) -> Result<(), StoreError> {
        let target = &self.layout.refund_links;
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
            target.table, target.refund_column, target.withdraw_column
        );
        self.exec(PlannedStatement::with_params(
            sql,
            vec![
                Value::Integer(refund_transaction_id),
                Value::Integer(original_withdraw_id),
            ],
        ))?;
        Ok(())
    }
}
