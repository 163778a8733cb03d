use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("IO error: {0}")]
    Io(io::Error),

    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid charset: {0}")]
    InvalidCharset(String),

    #[error("Invalid word list: {0}")]
    InvalidWordList(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Regex parse error: {0}")]
    Regex(#[from] regex_syntax::Error),

    #[error("Unsupported regex construct: {0}")]
    UnsupportedRegex(String),

    #[error("Character class `{0}` contains no usable code point")]
    EmptyClass(String),

    #[error("Password error: {0}")]
    Generic(String),
}

impl From<io::Error> for PasswordError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            _ => Self::Io(err),
        }
    }
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err($err); }`.
#[macro_export]
macro_rules! pw_ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
}

/// Construct a generic error from a format string.
#[macro_export]
macro_rules! pw_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::core::PasswordError::Generic(format!($fmt $(, $arg)*))
    };
}

/// Return early with an error.
#[macro_export]
macro_rules! pw_bail {
    ($err:expr $(,)?) => {
        return ::core::result::Result::Err($err)
    };
}
