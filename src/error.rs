//! Fault kinds, the error type and the outcome of a script run.

use std::fmt;

use thiserror::Error;

/// The kind of fault a buffer or script operation ran into.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Backing storage for the slots could not be reserved.
    AllocationFault,
    /// An append found no free slot.
    BufferFull,
    /// A removal found no stored element.
    BufferEmpty,
    /// The script could not be opened, read or parsed.
    InputFileFault,
    /// Listed elements could not be written out.
    OutputFault,
}

impl ErrorKind {
    /// Human-readable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match *self {
            ErrorKind::AllocationFault => "Allocation Fault",
            ErrorKind::BufferFull => "Buffer Full",
            ErrorKind::BufferEmpty => "Buffer Empty",
            ErrorKind::InputFileFault => "Input File Fault",
            ErrorKind::OutputFault => "Output Fault",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fault together with a message describing where it happened.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("Status is {kind} --- {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    /// Creates an error of `kind` with the given context.
    pub fn new<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Error {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for an `AllocationFault`.
    pub fn allocation<M: Into<String>>(message: M) -> Self {
        Error::new(ErrorKind::AllocationFault, message)
    }

    /// Shorthand for a `BufferFull`.
    pub fn full<M: Into<String>>(message: M) -> Self {
        Error::new(ErrorKind::BufferFull, message)
    }

    /// Shorthand for a `BufferEmpty`.
    pub fn empty<M: Into<String>>(message: M) -> Self {
        Error::new(ErrorKind::BufferEmpty, message)
    }

    /// Shorthand for an `InputFileFault`.
    pub fn input<M: Into<String>>(message: M) -> Self {
        Error::new(ErrorKind::InputFileFault, message)
    }

    /// Shorthand for an `OutputFault`.
    pub fn output<M: Into<String>>(message: M) -> Self {
        Error::new(ErrorKind::OutputFault, message)
    }

    /// The kind of this fault.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The context message, possibly empty.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of every fallible buffer and script operation; `Ok` is Success.
pub type Result<T = ()> = std::result::Result<T, Error>;

/// Final outcome of running a script.
///
/// `Quit` is the normal way for a script to end and is never treated as an
/// error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Status {
    /// Finished without reaching a `Q` command or a fault.
    Success,
    /// Stopped on a `Q` command.
    Quit,
    /// Stopped on the first fault.
    Fault(Error),
}

impl Status {
    /// True for `Status::Success`.
    pub fn is_success(&self) -> bool {
        *self == Status::Success
    }

    /// True for `Status::Quit`.
    pub fn is_quit(&self) -> bool {
        *self == Status::Quit
    }

    /// True for a fault. `Quit` is not one.
    pub fn is_error(&self) -> bool {
        match *self {
            Status::Fault(_) => true,
            Status::Success | Status::Quit => false,
        }
    }

    /// The fault, if any.
    pub fn error(&self) -> Option<&Error> {
        match *self {
            Status::Fault(ref err) => Some(err),
            Status::Success | Status::Quit => None,
        }
    }

    /// Process exit code: 0 unless a fault stopped the run.
    pub fn exit_code(&self) -> u8 {
        if self.is_error() {
            1
        } else {
            0
        }
    }
}

impl From<Result> for Status {
    fn from(result: Result) -> Status {
        match result {
            Ok(()) => Status::Success,
            Err(err) => Status::Fault(err),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Status::Success => f.write_str("Status is Success --- "),
            Status::Quit => f.write_str("Status is Quit --- "),
            Status::Fault(ref err) => write!(f, "{}", err),
        }
    }
}
