use crate::{frame::FrameError, ll};
use core::fmt;

/// An error that can occur when talking to the Pozyx
pub enum Error<T>
where
    T: ll::Transport,
{
    /// Error occured while exchanging frames with the module
    Bus(ll::Error<T>),

    /// A response frame could not be decoded, or a request frame could not be
    /// built
    Frame(FrameError),

    /// The module refused a register function call
    Rejected {
        /// The opcode of the refused function
        opcode: u8,
        /// The success flag the module answered with
        flag: u8,
    },

    /// The error code register contained a value that is not a known error
    UnknownErrorCode(u8),

    /// A parameter was outside of the range the module accepts
    ///
    /// Contains the name of the offending parameter. Nothing was sent.
    InvalidParameter(&'static str),

    /// The interrupt pin must be `0` or `1`
    ///
    /// Nothing was sent.
    InvalidInterruptPin(u8),
}

/// Coarse classification of [`Error`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The bus could not complete the exchange
    Transport,

    /// The module answered with something the driver could not make sense of,
    /// or refused the call
    Decode,

    /// The call was refused by the driver before anything was sent
    Validation,
}

impl<T> Error<T>
where
    T: ll::Transport,
{
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Bus(ll::Error::Transport(_)) => ErrorKind::Transport,
            Error::Bus(ll::Error::ResponseLength { .. }) => ErrorKind::Decode,
            Error::Frame(FrameError::Incomplete) => ErrorKind::Decode,
            Error::Frame(FrameError::Overflow) => ErrorKind::Validation,
            Error::Rejected { .. } => ErrorKind::Decode,
            Error::UnknownErrorCode(_) => ErrorKind::Decode,
            Error::InvalidParameter(_) => ErrorKind::Validation,
            Error::InvalidInterruptPin(_) => ErrorKind::Validation,
        }
    }
}

impl<T> From<ll::Error<T>> for Error<T>
where
    T: ll::Transport,
{
    fn from(error: ll::Error<T>) -> Self {
        Error::Bus(error)
    }
}

impl<T> From<FrameError> for Error<T>
where
    T: ll::Transport,
{
    fn from(error: FrameError) -> Self {
        Error::Frame(error)
    }
}

// We can't derive this implementation, as `Debug` is only implemented
// conditionally for `ll::Error`.
impl<T> fmt::Debug for Error<T>
where
    T: ll::Transport,
    T::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Bus(error) => write!(f, "Bus({:?})", error),
            Error::Frame(error) => write!(f, "Frame({:?})", error),
            Error::Rejected { opcode, flag } => write!(
                f,
                "Rejected {{ opcode: {:#04x}, flag: {:#04x} }}",
                opcode, flag,
            ),
            Error::UnknownErrorCode(code) => write!(f, "UnknownErrorCode({:#04x})", code),
            Error::InvalidParameter(name) => write!(f, "InvalidParameter({:?})", name),
            Error::InvalidInterruptPin(pin) => write!(f, "InvalidInterruptPin({:?})", pin),
        }
    }
}

impl<T> fmt::Display for Error<T>
where
    T: ll::Transport,
    T::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Bus(error) => write!(f, "{}", error),
            Error::Frame(error) => write!(f, "{}", error),
            Error::Rejected { opcode, flag } => write!(
                f,
                "function {:#04x} was refused (flag {:#04x})",
                opcode, flag,
            ),
            Error::UnknownErrorCode(code) => write!(f, "unknown error code {:#04x}", code),
            Error::InvalidParameter(name) => write!(f, "parameter `{}` is out of range", name),
            Error::InvalidInterruptPin(pin) => {
                write!(f, "invalid interrupt pin {}, must be 0 or 1", pin)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<T> std::error::Error for Error<T>
where
    T: ll::Transport,
    T::Error: fmt::Debug,
{
}
