//! Encoding and decoding of register function frames
//!
//! Register functions are invoked by sending the function's opcode followed by
//! its parameters. The module answers with a success flag, followed by the
//! function's result. All multi-byte values are little-endian.
//!
//! [`Request`] builds the outgoing frame, [`Response`] walks over the received
//! bytes.

use byte::{ctx::Endian, BytesExt as _, TryRead, TryWrite};
use core::fmt;

/// The byte order used by the module for all multi-byte values
pub const WIRE_ORDER: Endian = Endian::Little;

/// The largest request frame the driver ever sends
///
/// The largest function frame is the device list addition: opcode, network
/// id, flag and three coordinates.
pub const MAX_REQUEST_LEN: usize = 16;

/// Value of the success flag when the module accepted a function call
pub const SUCCESS: u8 = 1;

/// An error that can occur while building or reading a frame
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameError {
    /// The response ended before the requested value
    Incomplete,

    /// The request does not fit into [`MAX_REQUEST_LEN`] bytes
    Overflow,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FrameError::Incomplete => write!(f, "response frame is incomplete"),
            FrameError::Overflow => write!(f, "request frame is too long"),
        }
    }
}

/// An outgoing function frame
///
/// # Example
///
/// ``` rust
/// use pozyx::frame::Request;
///
/// let request = Request::new(0xC8).push(1015u16)?.push(49u8)?;
/// assert_eq!(request.as_bytes(), &[0xC8, 0xF7, 0x03, 0x31]);
/// # Ok::<(), pozyx::frame::FrameError>(())
/// ```
#[derive(Clone)]
pub struct Request {
    buf: [u8; MAX_REQUEST_LEN],
    len: usize,
}

impl Request {
    /// Start a frame with the given opcode
    pub fn new(opcode: u8) -> Self {
        let mut buf = [0; MAX_REQUEST_LEN];
        buf[0] = opcode;

        Request { buf, len: 1 }
    }

    /// Append a parameter in the module's byte order
    pub fn push<V>(mut self, value: V) -> Result<Self, FrameError>
    where
        V: TryWrite<Endian>,
    {
        self.buf[..]
            .write_with(&mut self.len, value, WIRE_ORDER)
            .map_err(|_| FrameError::Overflow)?;

        Ok(self)
    }

    /// The opcode this frame starts with
    pub fn opcode(&self) -> u8 {
        self.buf[0]
    }

    /// The encoded frame
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Request({:02x?})", self.as_bytes())
    }
}

/// A received function frame
pub struct Response<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Response<'a> {
    /// Wrap the bytes received from the module
    pub fn new(bytes: &'a [u8]) -> Self {
        Response { bytes, offset: 0 }
    }

    /// Read the success flag
    ///
    /// Returns `Ok(true)` if the module accepted the call. Must be called
    /// before reading any of the function's results.
    pub fn accepted(&mut self) -> Result<bool, FrameError> {
        Ok(self.read::<u8>()? == SUCCESS)
    }

    /// Read the next value
    pub fn read<V>(&mut self) -> Result<V, FrameError>
    where
        V: TryRead<'a, Endian>,
    {
        let bytes: &'a [u8] = self.bytes;
        bytes
            .read_with(&mut self.offset, WIRE_ORDER)
            .map_err(|_| FrameError::Incomplete)
    }

    /// The number of bytes that have not been read yet
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_little_endian() {
        let request = Request::new(0xC4)
            .push(5u16)
            .and_then(|r| r.push(1u8))
            .and_then(|r| r.push(100i32))
            .and_then(|r| r.push(-200i32))
            .and_then(|r| r.push(0i32))
            .unwrap();

        assert_eq!(
            request.as_bytes(),
            &[
                0xC4, 0x05, 0x00, 0x01, 0x64, 0x00, 0x00, 0x00, 0x38, 0xff, 0xff, 0xff, 0x00,
                0x00, 0x00, 0x00,
            ][..],
        );
        assert_eq!(request.as_bytes().len(), 16);
        assert_eq!(request.opcode(), 0xC4);
    }

    #[test]
    fn request_overflow_is_reported() {
        let request = Request::new(0x00)
            .push(0u64)
            .and_then(|r| r.push(0u32))
            .and_then(|r| r.push(0u16))
            .and_then(|r| r.push(0u8));
        assert!(request.is_ok());

        let request = request.and_then(|r| r.push(0u8));
        assert_eq!(request.err(), Some(FrameError::Overflow));
    }

    #[test]
    fn response_reads_values_in_order() {
        let bytes = [0x01, 0x38, 0xff, 0xff, 0xff, 0x02, 0x00, 0xff];
        let mut response = Response::new(&bytes);

        assert_eq!(response.accepted(), Ok(true));
        assert_eq!(response.read::<i32>(), Ok(-200));
        assert_eq!(response.read::<u16>(), Ok(2));
        assert_eq!(response.read::<u8>(), Ok(0xff));
        assert_eq!(response.remaining(), 0);
        assert_eq!(response.read::<u8>(), Err(FrameError::Incomplete));
    }

    #[test]
    fn response_flag_other_than_one_is_refusal() {
        assert_eq!(Response::new(&[0x00]).accepted(), Ok(false));
        assert_eq!(Response::new(&[0x02]).accepted(), Ok(false));
        assert_eq!(Response::new(&[]).accepted(), Err(FrameError::Incomplete));
    }
}
