#![forbid(unsafe_code)]

use super::StoreError;
use mw_core::ids::SqlIdentifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Plan every statement, execute none.
    Preview,
    Apply,
}

impl WriteMode {
    pub fn from_apply(apply: bool) -> Self {
        if apply { Self::Apply } else { Self::Preview }
    }

    pub fn is_preview(self) -> bool {
        matches!(self, Self::Preview)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Apply => "apply",
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub mode: WriteMode,
    pub busy_timeout: Duration,
    pub layout: StoreLayout,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: WriteMode::Preview,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            layout: StoreLayout::default(),
        }
    }
}

impl SessionOptions {
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_layout(mut self, layout: StoreLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Names of every table and column the write engine touches.
///
/// The defaults describe the MoneyWiz Core Data schema. A layout can be
/// loaded from JSON; keys that are absent keep their default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLayout {
    pub entity: EntityTable,
    pub type_registry: TypeRegistryTable,
    /// Only tables whose name starts with this prefix carry user data.
    pub data_table_prefix: String,
    pub excluded_tables: Vec<String>,
    /// Row identifier columns used for reference samples, tried in order.
    pub row_id_candidates: Vec<String>,
    /// Display-name columns tried in order when a rename names no column.
    pub name_candidates: Vec<String>,
    pub category_assignments: CategoryAssignmentTable,
    pub tag_assignments: TagAssignmentTable,
    pub refund_links: RefundLinkTable,
    /// Follow each entity insert with an update of the registry's max-id counter.
    pub bump_type_counter: bool,
    /// Scan members of a composite primary key, e.g. the foreign ids of `Z_36TAGS`.
    /// Off by default: every primary-key column is skipped.
    pub scan_composite_key_members: bool,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            entity: EntityTable::default(),
            type_registry: TypeRegistryTable::default(),
            data_table_prefix: "Z".to_string(),
            excluded_tables: vec!["Z_PRIMARYKEY".to_string()],
            row_id_candidates: strings(&["Z_PK", "ZID", "Z_ID"]),
            name_candidates: strings(&["ZNAME", "ZDESC2", "ZTITLE2"]),
            category_assignments: CategoryAssignmentTable::default(),
            tag_assignments: TagAssignmentTable::default(),
            refund_links: RefundLinkTable::default(),
            bump_type_counter: false,
            scan_composite_key_members: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTable {
    pub table: String,
    pub primary_key_column: String,
    pub discriminator_column: String,
    pub option_column: String,
    pub global_id_column: String,
    pub creation_date_column: String,
}

impl Default for EntityTable {
    fn default() -> Self {
        Self {
            table: "ZSYNCOBJECT".to_string(),
            primary_key_column: "Z_PK".to_string(),
            discriminator_column: "Z_ENT".to_string(),
            option_column: "Z_OPT".to_string(),
            global_id_column: "ZGID".to_string(),
            creation_date_column: "ZOBJECTCREATIONDATE".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRegistryTable {
    pub table: String,
    pub name_column: String,
    pub discriminator_column: String,
    pub max_id_column: String,
}

impl Default for TypeRegistryTable {
    fn default() -> Self {
        Self {
            table: "Z_PRIMARYKEY".to_string(),
            name_column: "Z_NAME".to_string(),
            discriminator_column: "Z_ENT".to_string(),
            max_id_column: "Z_MAX".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryAssignmentTable {
    pub table: String,
    pub transaction_column: String,
    pub category_column: String,
    pub amount_column: String,
}

impl Default for CategoryAssignmentTable {
    fn default() -> Self {
        Self {
            // The application schema spells it this way.
            table: "ZCATEGORYASSIGMENT".to_string(),
            transaction_column: "ZTRANSACTION".to_string(),
            category_column: "ZCATEGORY".to_string(),
            amount_column: "ZAMOUNT".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagAssignmentTable {
    pub table: String,
    pub transaction_column: String,
    pub tag_column: String,
}

impl Default for TagAssignmentTable {
    fn default() -> Self {
        Self {
            table: "Z_36TAGS".to_string(),
            transaction_column: "Z_36TRANSACTIONS".to_string(),
            tag_column: "Z_35TAGS".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundLinkTable {
    pub table: String,
    pub refund_column: String,
    pub withdraw_column: String,
}

impl Default for RefundLinkTable {
    fn default() -> Self {
        Self {
            table: "ZWITHDRAWREFUNDTRANSACTIONLINK".to_string(),
            refund_column: "ZREFUNDTRANSACTION".to_string(),
            withdraw_column: "ZWITHDRAWTRANSACTION".to_string(),
        }
    }
}

impl StoreLayout {
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        let layout: Self =
            serde_json::from_str(text).map_err(|err| StoreError::InvalidLayout(err.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Every configured name must be splice-safe; statement text is built from them.
    pub fn validate(&self) -> Result<(), StoreError> {
        let entity = &self.entity;
        let registry = &self.type_registry;
        let categories = &self.category_assignments;
        let tags = &self.tag_assignments;
        let refunds = &self.refund_links;

        let mut names: Vec<(&'static str, &str)> = vec![
            ("entity.table", entity.table.as_str()),
            ("entity.primary_key_column", entity.primary_key_column.as_str()),
            ("entity.discriminator_column", entity.discriminator_column.as_str()),
            ("entity.option_column", entity.option_column.as_str()),
            ("entity.global_id_column", entity.global_id_column.as_str()),
            ("entity.creation_date_column", entity.creation_date_column.as_str()),
            ("type_registry.table", registry.table.as_str()),
            ("type_registry.name_column", registry.name_column.as_str()),
            ("type_registry.discriminator_column", registry.discriminator_column.as_str()),
            ("type_registry.max_id_column", registry.max_id_column.as_str()),
            ("category_assignments.table", categories.table.as_str()),
            ("category_assignments.transaction_column", categories.transaction_column.as_str()),
            ("category_assignments.category_column", categories.category_column.as_str()),
            ("category_assignments.amount_column", categories.amount_column.as_str()),
            ("tag_assignments.table", tags.table.as_str()),
            ("tag_assignments.transaction_column", tags.transaction_column.as_str()),
            ("tag_assignments.tag_column", tags.tag_column.as_str()),
            ("refund_links.table", refunds.table.as_str()),
            ("refund_links.refund_column", refunds.refund_column.as_str()),
            ("refund_links.withdraw_column", refunds.withdraw_column.as_str()),
        ];
        if !self.data_table_prefix.is_empty() {
            names.push(("data_table_prefix", self.data_table_prefix.as_str()));
        }
        names.extend(self.excluded_tables.iter().map(|v| ("excluded_tables", v.as_str())));
        names.extend(self.row_id_candidates.iter().map(|v| ("row_id_candidates", v.as_str())));
        names.extend(self.name_candidates.iter().map(|v| ("name_candidates", v.as_str())));

        for (key, value) in names {
            if let Err(err) = SqlIdentifier::try_new(value) {
                return Err(StoreError::InvalidLayout(format!(
                    "{key} = {value:?}: {}",
                    err.message()
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn is_excluded_table(&self, table: &str) -> bool {
        self.excluded_tables
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(table))
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
