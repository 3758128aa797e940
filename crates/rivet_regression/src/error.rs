//! Error types for registry and runner lookups.

/// Errors raised when registering or selecting regression cases.
#[derive(Debug, thiserror::Error)]
pub enum RegressionError {
    /// A case with this id is already registered.
    #[error("duplicate test case id '{0}'")]
    DuplicateCase(String),

    /// No case has this id.
    #[error("unknown test case '{0}'")]
    UnknownCase(String),

    /// No suite has this name.
    #[error("unknown suite '{0}'")]
    UnknownSuite(String),
}
