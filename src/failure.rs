//! Invocation failures and where they happened.
//!
//! A wrapped callable fails either by returning `Err(Failure)` or by
//! panicking. Both carry a source location: a [`Failure`] records the caller
//! of its constructor (or of the `?` that converted another error into it),
//! and a panic records the location the panic hook reports.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::Once;

/// An error raised by a wrapped callable.
///
/// Like `anyhow::Error`, `Failure` does not implement `std::error::Error`
/// itself, which lets any error type convert into it with `?`.
pub struct Failure {
    message: String,
    file: String,
    line: u32,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Failure {
    /// A failure with a plain message, located at the caller.
    #[track_caller]
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::at(message.to_string(), Location::caller())
    }

    fn at(message: String, location: &Location<'_>) -> Self {
        Self {
            message,
            file: location.file().to_string(),
            line: location.line(),
            source: None,
        }
    }

    pub(crate) fn panicked(message: String, file: String, line: u32) -> Self {
        Self {
            message,
            file,
            line,
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// The error this failure was converted from, if any.
    pub fn source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl<E> From<E> for Failure
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: E) -> Self {
        let mut failure = Self::at(error.to_string(), Location::caller());
        failure.source = Some(Box::new(error));
        failure
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.message, self.file, self.line)
    }
}

/// Return early with a [`Failure`] built from a format string.
///
/// ```
/// use simple_cli_args::{Failure, fail};
///
/// fn check(count: usize) -> Result<(), Failure> {
///     if count == 0 {
///         fail!("nothing to do");
///     }
///     Ok(())
/// }
///
/// assert_eq!(check(0).unwrap_err().message(), "nothing to do");
/// ```
#[macro_export]
macro_rules! fail {
    ($($arg:tt)*) => {
        return ::std::result::Result::Err($crate::Failure::msg(::std::format!($($arg)*)))
    };
}

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<(String, u32)>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Install a panic hook that records panic locations on guarded threads and
/// defers to the previous hook everywhere else.
fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARDED.with(Cell::get) {
                let location = info.location().map(|l| (l.file().to_string(), l.line()));
                LAST_PANIC.with(|slot| *slot.borrow_mut() = location);
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning a panic into a [`Failure`] located where it panicked.
pub(crate) fn catch<R>(f: impl FnOnce() -> Result<R, Failure>) -> Result<R, Failure> {
    install_hook();
    let was_guarded = GUARDED.with(|g| g.replace(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    GUARDED.with(|g| g.set(was_guarded));

    outcome.unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panicked".to_string());
        let (file, line) = LAST_PANIC
            .with(|slot| slot.borrow_mut().take())
            .unwrap_or_else(|| ("<unknown>".to_string(), 0));
        Err(Failure::panicked(message, file, line))
    })
}
