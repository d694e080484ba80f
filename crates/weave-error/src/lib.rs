use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

#[cfg(feature = "backtrace")]
use std::backtrace::Backtrace;

pub type WeaveResult<T> = Result<T, WeaveError>;

/// The six error kinds named by the simulation's error-handling policy.
/// `UnknownAgent`, `DuplicateConnection` and `SelfConnection` are recovered
/// at the call site (callers see `None`/an idempotent return, never an
/// `Err`) and exist here mainly so a persistence sink or a lower-level
/// query can still construct one when it needs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidGenome,
    UnknownAgent,
    DuplicateConnection,
    SelfConnection,
    PersistenceFailure,
    ConfigError,
    Io,
    Serde,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrString(Cow<'static, str>);

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<Cow<'static, str>>> From<T> for ErrString {
    fn from(v: T) -> Self {
        Self(v.into())
    }
}

#[derive(Debug)]
pub enum WeaveError {
    InvalidGenome {
        message: ErrString,
    },
    UnknownAgent {
        agent_id: ErrString,
    },
    DuplicateConnection {
        from: ErrString,
        to: ErrString,
    },
    SelfConnection {
        agent_id: ErrString,
    },
    PersistenceFailure {
        message: ErrString,
    },
    ConfigError {
        message: ErrString,
    },
    Io {
        message: ErrString,
    },
    Serde {
        message: ErrString,
    },
    Context {
        context: ErrorContext,
        source: Box<WeaveError>,
        #[cfg(feature = "backtrace")]
        backtrace: Backtrace,
    },
}

impl WeaveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidGenome { .. } => ErrorCode::InvalidGenome,
            Self::UnknownAgent { .. } => ErrorCode::UnknownAgent,
            Self::DuplicateConnection { .. } => ErrorCode::DuplicateConnection,
            Self::SelfConnection { .. } => ErrorCode::SelfConnection,
            Self::PersistenceFailure { .. } => ErrorCode::PersistenceFailure,
            Self::ConfigError { .. } => ErrorCode::ConfigError,
            Self::Io { .. } => ErrorCode::Io,
            Self::Serde { .. } => ErrorCode::Serde,
            Self::Context { .. } => ErrorCode::Context,
        }
    }

    pub fn with_context(self, msg: impl Into<String>) -> Self {
        WeaveError::Context {
            context: ErrorContext::new(msg),
            source: Box::new(self),
            #[cfg(feature = "backtrace")]
            backtrace: Backtrace::capture(),
        }
    }
}

impl Display for WeaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGenome { message } => write!(f, "invalid genome: {}", message),
            Self::UnknownAgent { agent_id } => write!(f, "unknown agent: {}", agent_id),
            Self::DuplicateConnection { from, to } => {
                write!(f, "duplicate connection: {} -> {}", from, to)
            }
            Self::SelfConnection { agent_id } => {
                write!(f, "self connection rejected: {}", agent_id)
            }
            Self::PersistenceFailure { message } => write!(f, "persistence failure: {}", message),
            Self::ConfigError { message } => write!(f, "invalid configuration: {}", message),
            Self::Io { message } => write!(f, "io error: {}", message),
            Self::Serde { message } => write!(f, "serialization error: {}", message),
            Self::Context {
                context, source, ..
            } => write!(f, "{}\ncaused by: {}", context, source),
        }
    }
}

impl std::error::Error for WeaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Context { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WeaveError {
    fn from(err: std::io::Error) -> Self {
        WeaveError::Io {
            message: err.to_string().into(),
        }
    }
}

impl From<serde_json::Error> for WeaveError {
    fn from(err: serde_json::Error) -> Self {
        WeaveError::Serde {
            message: err.to_string().into(),
        }
    }
}

#[derive(Debug)]
pub struct ErrorContext {
    message: String,
}

impl ErrorContext {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ErrorContext {}

pub trait ResultExt<T> {
    fn context(self, msg: impl Into<String>) -> WeaveResult<T>;
    fn with_context<F: FnOnce() -> String>(self, f: F) -> WeaveResult<T>;
}

impl<T, E: Into<WeaveError>> ResultExt<T> for Result<T, E> {
    fn context(self, msg: impl Into<String>) -> WeaveResult<T> {
        self.map_err(|e| e.into().with_context(msg))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> WeaveResult<T> {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[doc(hidden)]
pub mod __private {
    #[inline]
    #[cold]
    #[must_use]
    pub fn must_use<E>(e: E) -> E {
        e
    }
}

#[macro_export]
macro_rules! weave_err {
    (InvalidGenome: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use($crate::WeaveError::InvalidGenome { message: format!($fmt, $($arg),*).into() })
    };
    (PersistenceFailure: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use($crate::WeaveError::PersistenceFailure { message: format!($fmt, $($arg),*).into() })
    };
    (ConfigError: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use($crate::WeaveError::ConfigError { message: format!($fmt, $($arg),*).into() })
    };
    ($variant:ident: $msg:expr $(,)?) => {{
        $crate::__private::must_use($crate::WeaveError::ConfigError { message: $msg.into() })
    }};
}

#[macro_export]
macro_rules! weave_bail {
    ($($tt:tt)+) => { return Err($crate::weave_err!($($tt)+)) };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond { $crate::weave_bail!($($tt)+); }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        let err = weave_err!(ConfigError: "population_size must be >= 1");
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }

    #[test]
    fn context_wraps_source() {
        let err = weave_err!(InvalidGenome: "missing domain {}", "limbo").with_context("genesis failed");
        assert_eq!(err.code(), ErrorCode::Context);
        assert!(err.to_string().contains("genesis failed"));
        assert!(err.to_string().contains("missing domain limbo"));
    }
}
