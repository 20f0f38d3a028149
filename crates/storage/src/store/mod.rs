#![forbid(unsafe_code)]

mod associations;
mod entities;
mod error;
mod layout;
mod plan;
mod references;
mod registry;
mod rename;
mod schema;
mod transaction;

pub use entities::FieldMap;
pub use error::StoreError;
pub use layout::*;
pub use plan::PlannedStatement;
pub use references::{MAX_REFERENCE_SAMPLES, ProbeOutcome, ReferenceHit, ReferenceProbe};
pub use registry::{FixedTypeRegistry, StoreTypeRegistry, TypeRegistry};
pub use schema::ColumnInfo;

use mw_core::ids::SqlIdentifier;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A write session over one existing store file.
///
/// Every mutating call is appended to the plan log first. In
/// [`WriteMode::Apply`] the statement is then executed; in
/// [`WriteMode::Preview`] nothing further happens, so the plan log is the
/// same in both modes.
#[derive(Debug)]
pub struct Session {
    conn: Connection,
    path: PathBuf,
    mode: WriteMode,
    layout: StoreLayout,
    registry: Box<dyn TypeRegistry>,
    planned: Vec<PlannedStatement>,
    in_transaction: bool,
}

impl Session {
    pub fn open(path: impl AsRef<Path>, mode: WriteMode) -> Result<Self, StoreError> {
        Self::open_with(path, SessionOptions::default().with_mode(mode))
    }

    pub fn open_with(path: impl AsRef<Path>, options: SessionOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        options.layout.validate()?;
        if !path.is_file() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("store not found: {}", path.display()),
            )));
        }

        let access = match options.mode {
            WriteMode::Preview => OpenFlags::SQLITE_OPEN_READ_ONLY,
            WriteMode::Apply => OpenFlags::SQLITE_OPEN_READ_WRITE,
        };
        let conn = Connection::open_with_flags(
            &path,
            access | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(options.busy_timeout)?;

        info!(path = %path.display(), mode = options.mode.as_str(), "write session opened");
        let registry = Box::new(StoreTypeRegistry::for_layout(&options.layout));
        Ok(Self {
            conn,
            path,
            mode: options.mode,
            layout: options.layout,
            registry,
            planned: Vec::new(),
            in_transaction: false,
        })
    }

    /// Replaces the live registry lookup, e.g. with a [`FixedTypeRegistry`].
    pub fn with_type_registry(mut self, registry: impl TypeRegistry + 'static) -> Self {
        self.registry = Box::new(registry);
        self
    }

    pub fn close(self) -> Result<(), StoreError> {
        if self.in_transaction {
            warn!(
                path = %self.path.display(),
                "closing write session with an open transaction; uncommitted statements are discarded"
            );
        }
        let path = self.path;
        self.conn.close().map_err(|(_, err)| StoreError::Sql(err))?;
        info!(path = %path.display(), "write session closed");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    pub fn is_preview(&self) -> bool {
        self.mode.is_preview()
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub fn planned_statements(&self) -> &[PlannedStatement] {
        &self.planned
    }

    /// Drains the plan log; later statements start a fresh log.
    pub fn take_plan(&mut self) -> Vec<PlannedStatement> {
        std::mem::take(&mut self.planned)
    }

    pub fn plan_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.planned.iter().map(PlannedStatement::to_json).collect())
    }

    /// Records `statement`, then runs it unless this is a preview session.
    ///
    /// Returns the affected-row count, or `None` when nothing was executed.
    fn exec(&mut self, statement: PlannedStatement) -> Result<Option<usize>, StoreError> {
        debug!(mode = self.mode.as_str(), sql = %statement.sql, "planned statement");
        self.planned.push(statement);
        if self.mode.is_preview() {
            return Ok(None);
        }

        let Some(statement) = self.planned.last() else {
            return Ok(None);
        };
        let affected = match statement.params.as_deref() {
            None => self.conn.execute(&statement.sql, [])?,
            Some(params) => self
                .conn
                .execute(&statement.sql, rusqlite::params_from_iter(params.iter()))?,
        };
        Ok(Some(affected))
    }
}

fn identifier(value: &str) -> Result<SqlIdentifier, StoreError> {
    SqlIdentifier::try_new(value).map_err(|err| StoreError::InvalidIdentifier {
        value: value.to_string(),
        reason: err.message(),
    })
}

fn numbered_placeholders(count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}
