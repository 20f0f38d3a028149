#![forbid(unsafe_code)]

use super::*;

impl Session {
    /// Opens an explicit transaction. Nested transactions are rejected.
    ///
    /// In apply mode SQLite holds every statement until `COMMIT`, so a
    /// `ROLLBACK` discards all of them.
    pub fn begin(&mut self) -> Result<(), StoreError> {
        if self.in_transaction {
            return Err(StoreError::TransactionActive);
        }
        let result = self.exec(PlannedStatement::bare("BEGIN"));
        self.sync_transaction_state(result.is_ok());
        result.map(|_| ())
    }

    pub fn commit(&mut self) -> Result<(), StoreError> {
        if !self.in_transaction {
            return Err(StoreError::NoTransaction);
        }
        let result = self.exec(PlannedStatement::bare("COMMIT"));
        self.sync_transaction_state(result.is_err());
        result.map(|_| ())
    }

    pub fn rollback(&mut self) -> Result<(), StoreError> {
        if !self.in_transaction {
            return Err(StoreError::NoTransaction);
        }
        let result = self.exec(PlannedStatement::bare("ROLLBACK"));
        self.sync_transaction_state(false);
        result.map(|_| ())
    }

    /// Runs `body` between `BEGIN` and `COMMIT`.
    ///
    /// If `body` (or the commit) fails, the transaction is rolled back and
    /// the original error is returned unchanged.
    pub fn with_transaction<T, E, F>(&mut self, body: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.begin()?;
        let outcome = match body(self) {
            Ok(value) => self.commit().map(|()| value).map_err(E::from),
            Err(err) => Err(err),
        };
        if outcome.is_err()
            && self.in_transaction
            && let Err(rollback_err) = self.rollback()
        {
            warn!(error = %rollback_err, "rollback after failed transaction body also failed");
        }
        outcome
    }

    /// Preview sessions track the state they would have; apply sessions ask SQLite.
    fn sync_transaction_state(&mut self, preview_state: bool) {
        self.in_transaction = if self.mode.is_preview() {
            preview_state
        } else {
            !self.conn.is_autocommit()
        };
    }
}
