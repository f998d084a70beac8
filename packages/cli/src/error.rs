use std::fmt::{Display, Formatter};

use sqlproxy_dialect::DialectError;

#[derive(Debug)]
pub enum CliError {
    InvalidArgs(&'static str),
    Message(String),
    Dialect(DialectError),
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

impl CliError {
    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgs(message) => write!(f, "invalid arguments: {message}"),
            Self::Message(message) => write!(f, "{message}"),
            Self::Dialect(error) => write!(f, "{} ({})", error, error.code().as_str()),
            Self::Io { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<DialectError> for CliError {
    fn from(error: DialectError) -> Self {
        Self::Dialect(error)
    }
}
