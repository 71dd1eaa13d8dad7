//! Error type shared by every Ferrow crate.
//!
//! Errors are raised through the [`ferrow_err!`], [`ferrow_bail!`] and
//! [`ferrow_ensure!`] macros so that call sites read the same everywhere:
//!
//! ```
//! use ferrow_error::{ferrow_bail, ferrow_ensure, FerrowResult};
//!
//! fn check_width(expected: usize, got: usize) -> FerrowResult<()> {
//!     ferrow_ensure!(expected == got, TypeMismatch: "expected width {}, got {}", expected, got);
//!     Ok(())
//! }
//!
//! fn always_fails() -> FerrowResult<()> {
//!     ferrow_bail!(WriterClosed: "writer is closed");
//! }
//! # assert!(check_width(8, 8).is_ok());
//! # assert!(always_fails().is_err());
//! ```
use std::borrow::Cow;
use std::collections::TryReserveError;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::sync::{Arc, LazyLock};
use std::{env, io};

enum ErrorStrategy {
    Panic,
    WithBacktrace,
    Normal,
}

static ERROR_STRATEGY: LazyLock<ErrorStrategy> = LazyLock::new(|| {
    if env::var("FERROW_PANIC_ON_ERR").as_deref() == Ok("1") {
        ErrorStrategy::Panic
    } else if env::var("FERROW_BACKTRACE_IN_ERR").as_deref() == Ok("1") {
        ErrorStrategy::WithBacktrace
    } else {
        ErrorStrategy::Normal
    }
});

/// Message carried by most [`FerrowError`] variants.
#[derive(Debug, Clone)]
pub struct ErrString(Cow<'static, str>);

impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        match &*ERROR_STRATEGY {
            ErrorStrategy::Panic => panic!("{}", msg.into()),
            ErrorStrategy::WithBacktrace => ErrString(Cow::Owned(format!(
                "{}\n\nRust backtrace:\n{}",
                msg.into(),
                std::backtrace::Backtrace::force_capture()
            ))),
            ErrorStrategy::Normal => ErrString(msg.into()),
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FerrowError {
    /// Growing a buffer failed because the allocator could not satisfy the request.
    #[error("out of memory: {0}")]
    OutOfMemory(ErrString),
    /// Writing to or flushing a sink failed.
    #[error("{}", match msg {
        Some(msg) => format!("{}", msg),
        None => format!("{}", error),
    })]
    IO {
        error: Arc<io::Error>,
        msg: Option<ErrString>,
    },
    #[error("schema mismatch: {0}")]
    SchemaMismatch(ErrString),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(ErrString),
    /// A non-optional read hit a null slot.
    #[error("null value: {0}")]
    NullValue(ErrString),
    /// Two vectors (or a vector and a value) disagree on element width or logical type.
    #[error("type mismatch: {0}")]
    TypeMismatch(ErrString),
    #[error("writer closed: {0}")]
    WriterClosed(ErrString),
    #[error("out of bounds: {0}")]
    OutOfBounds(ErrString),
    #[error("{0}")]
    ComputeError(ErrString),
    #[error("{error}\n\nerror context: {msg}")]
    Context {
        error: Box<FerrowError>,
        msg: ErrString,
    },
}

impl From<io::Error> for FerrowError {
    fn from(value: io::Error) -> Self {
        FerrowError::IO {
            error: Arc::new(value),
            msg: None,
        }
    }
}

impl From<TryReserveError> for FerrowError {
    fn from(value: TryReserveError) -> Self {
        FerrowError::OutOfMemory(format!("{value}").into())
    }
}

impl FerrowError {
    /// Wraps `self` with an additional context message.
    pub fn context(self, msg: ErrString) -> Self {
        FerrowError::Context {
            error: Box::new(self),
            msg,
        }
    }

    /// Strips any [`FerrowError::Context`] layers.
    pub fn root(&self) -> &FerrowError {
        match self {
            FerrowError::Context { error, .. } => error.root(),
            err => err,
        }
    }

    /// Returns `true` if the root cause is an I/O failure of the sink.
    pub fn is_io(&self) -> bool {
        matches!(self.root(), FerrowError::IO { .. })
    }
}

pub type FerrowResult<T> = Result<T, FerrowError>;

#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    pub fn must_use(error: crate::FerrowError) -> crate::FerrowError {
        error
    }
}

#[macro_export]
macro_rules! ferrow_err {
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use(
            $crate::FerrowError::$variant(format!($fmt, $($arg),*).into())
        )
    };
    ($variant:ident: $err:expr $(,)?) => {
        $crate::__private::must_use(
            $crate::FerrowError::$variant($err.into())
        )
    };
    (width = $expected:expr, got = $got:expr) => {
        $crate::ferrow_err!(
            TypeMismatch: "element width mismatch: expected {} bytes, got {} bytes", $expected, $got
        )
    };
    (oob = $idx:expr, $len:expr) => {
        $crate::ferrow_err!(OutOfBounds: "index {} is out of bounds for length {}", $idx, $len)
    };
}

#[macro_export]
macro_rules! ferrow_bail {
    ($($tt:tt)+) => {
        return Err($crate::ferrow_err!($($tt)+))
    };
}

#[macro_export]
macro_rules! ferrow_ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond {
            $crate::ferrow_bail!($($tt)+);
        }
    };
}
