//! Configuration error types.

/// Errors that can occur when loading, resolving, or saving a scenario configuration.
///
/// Syntax, variable, and coercion errors stop at the first occurrence. Dangling
/// references and missing fields are collected and reported together.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A line is malformed or out of place.
    #[error("syntax error on line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    /// A `$NAME` placeholder has no binding in the environment.
    #[error("unresolved variable `{variable}` in [{section}] {key}")]
    UnresolvedVariableError {
        section: String,
        key: String,
        variable: String,
    },

    /// A value could not be converted to the type its key requires.
    #[error("cannot coerce [{section}] {key} = `{value}` to {expected}")]
    TypeCoercionError {
        section: String,
        key: String,
        value: String,
        expected: &'static str,
    },

    /// A value lies outside the set of accepted names.
    #[error("invalid value `{value}` for [{section}] {key}, expected one of: {}", allowed.join(", "))]
    InvalidEnumValueError {
        section: String,
        key: String,
        value: String,
        allowed: Vec<&'static str>,
    },

    /// One or more `parts.<name>` references point at parts that are not declared.
    #[error("target objects reference undeclared parts: {}", names.join(", "))]
    DanglingReferenceError { names: Vec<String> },

    /// One or more required `section.key` entries are absent.
    #[error("missing required fields: {}", fields.join(", "))]
    MissingFieldError { fields: Vec<String> },

    /// A command-line override is not of the form `section.key=value`.
    #[error("invalid override `{0}`, expected section.key=value")]
    InvalidOverride(String),
}

impl ConfigError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            line,
            message: message.into(),
        }
    }
}
