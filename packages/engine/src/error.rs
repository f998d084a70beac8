use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Parse,
    ArgumentCountMismatch,
    UnsupportedArgumentType,
    InvalidPlaceholder,
    RenumberingInconsistency,
    Config,
    Metadata,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "DIALECT_ERROR_PARSE",
            Self::ArgumentCountMismatch => "DIALECT_ERROR_ARGUMENT_COUNT_MISMATCH",
            Self::UnsupportedArgumentType => "DIALECT_ERROR_UNSUPPORTED_ARGUMENT_TYPE",
            Self::InvalidPlaceholder => "DIALECT_ERROR_INVALID_PLACEHOLDER",
            Self::RenumberingInconsistency => "DIALECT_ERROR_RENUMBERING_INCONSISTENCY",
            Self::Config => "DIALECT_ERROR_CONFIG",
            Self::Metadata => "DIALECT_ERROR_METADATA",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Parse,
            Self::ArgumentCountMismatch,
            Self::UnsupportedArgumentType,
            Self::InvalidPlaceholder,
            Self::RenumberingInconsistency,
            Self::Config,
            Self::Metadata,
        ]
    }
}

/// Errors surfaced to callers of the converter, rewrite engine and formatter.
///
/// Inapplicable rewrites are not errors: they fall back to pass-through and are
/// reported through [`crate::RewriteOutcome::Fallback`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DialectError {
    /// The upstream parser rejected the statement text.
    #[error("parse error: {0}")]
    Parse(String),

    /// Placeholder count and argument count disagree.
    #[error("argument count mismatch: statement expects {expected} arguments, got {actual}")]
    ArgumentCountMismatch { expected: usize, actual: usize },

    /// An argument has no literal rendering.
    #[error("unsupported argument type: {0}")]
    UnsupportedArgumentType(&'static str),

    /// A placeholder token the formatter cannot resolve to an ordinal.
    #[error("invalid placeholder '{0}'")]
    InvalidPlaceholder(String),

    /// A rewritten statement references an argument that does not exist.
    /// Unreachable unless the rewrite itself is broken.
    #[error("placeholder renumbering inconsistency: {0}")]
    RenumberingInconsistency(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("schema metadata error: {0}")]
    Metadata(String),
}

impl DialectError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(_) => ErrorCode::Parse,
            Self::ArgumentCountMismatch { .. } => ErrorCode::ArgumentCountMismatch,
            Self::UnsupportedArgumentType(_) => ErrorCode::UnsupportedArgumentType,
            Self::InvalidPlaceholder(_) => ErrorCode::InvalidPlaceholder,
            Self::RenumberingInconsistency(_) => ErrorCode::RenumberingInconsistency,
            Self::Config(_) => ErrorCode::Config,
            Self::Metadata(_) => ErrorCode::Metadata,
        }
    }
}

impl From<sqlparser::parser::ParserError> for DialectError {
    fn from(error: sqlparser::parser::ParserError) -> Self {
        Self::Parse(error.to_string())
    }
}
