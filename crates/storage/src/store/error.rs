#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    InvalidIdentifier {
        value: String,
        reason: &'static str,
    },
    InvalidLayout(String),
    /// The logical type name has no row in the type registry.
    UnknownType(String),
    Configuration(String),
    TransactionActive,
    NoTransaction,
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQLITE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Self::InvalidLayout(_) => "INVALID_LAYOUT",
            Self::UnknownType(_) => "NOT_FOUND",
            Self::Configuration(_) => "CONFIGURATION",
            Self::TransactionActive => "TRANSACTION_ACTIVE",
            Self::NoTransaction => "NO_TRANSACTION",
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidIdentifier { value, reason } => {
                write!(f, "invalid identifier {value:?}: {reason}")
            }
            Self::InvalidLayout(message) => write!(f, "invalid store layout: {message}"),
            Self::UnknownType(type_name) => {
                write!(f, "unknown type name {type_name:?} in the type registry")
            }
            Self::Configuration(message) => write!(f, "configuration: {message}"),
            Self::TransactionActive => write!(f, "a transaction is already active"),
            Self::NoTransaction => write!(f, "no transaction is active"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sql(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
