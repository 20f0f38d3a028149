#![forbid(unsafe_code)]

const MAX_IDENTIFIER_LEN: usize = 128;

/// A table or column name that is safe to splice into statement text unquoted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, SqlIdentifierError> {
        let value = value.into();
        validate_identifier(&value)?;
        Ok(Self(value))
    }

    /// SQLite resolves column names case-insensitively.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl std::fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlIdentifierError {
    Empty,
    TooLong,
    InvalidFirstChar,
    InvalidChar { ch: char, index: usize },
}

impl SqlIdentifierError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "identifier must not be empty",
            Self::TooLong => "identifier is too long",
            Self::InvalidFirstChar => "identifier must start with an ASCII letter or '_'",
            Self::InvalidChar { .. } => "identifier may only contain ASCII letters, digits and '_'",
        }
    }
}

fn validate_identifier(value: &str) -> Result<(), SqlIdentifierError> {
    if value.is_empty() {
        return Err(SqlIdentifierError::Empty);
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(SqlIdentifierError::TooLong);
    }
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Err(SqlIdentifierError::Empty);
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(SqlIdentifierError::InvalidFirstChar);
    }
    for (index, ch) in value.chars().enumerate().skip(1) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            continue;
        }
        return Err(SqlIdentifierError::InvalidChar { ch, index });
    }
    Ok(())
}

/// Double-quotes a name read back from the store's own catalog.
pub fn quote_identifier(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
