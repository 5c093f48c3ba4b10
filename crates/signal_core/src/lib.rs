//! Operation results with accumulated feedback.
//!
//! An operation returns a [`Signal`] (or a [`TypedSignal`] when it also
//! produces a value). Each signal holds an ordered list of
//! [`FeedbackEntry`] values and the worst [`SignalLevel`] seen among them.
//! Callers merge the signals of the operations they ran and check
//! `success()` / `failure()` instead of unwinding on ordinary failures.
//!
//! ```ignore
//! use signal_core::{logger, Signal};
//!
//! logger::init_tracing_logger()?;
//!
//! let mut scan = Signal::new();
//! scan.log_warning("disk low", None)?;
//!
//! let mut job = Signal::start(None);
//! if job.merge_and_check_failure([&scan]) {
//!     return Ok(job);
//! }
//! ```

pub mod entry;
pub mod error;
pub mod level;
pub mod logger;
pub mod signal;
pub mod typed;

pub use entry::{CausingError, EntryKey, FeedbackEntry};
pub use error::SignalError;
pub use level::{SignalLevel, SignalNature};
pub use logger::{
    global_logger, has_logger, init_tracing_logger, install_logger, LogBucket, LoggedRecord,
    MemoryLogger, SignalLogger, TracingLogger,
};
pub use signal::{Signal, EMPTY_LEVEL, FAILURE_LEVEL, SUCCESS_LEVEL};
pub use typed::TypedSignal;
