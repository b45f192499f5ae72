//! High-level interface to the Pozyx
//!
//! The entry point to this API is the [Pozyx] struct. Please refer to the
//! documentation there for more details.
//!
//! This module implements a high-level interface to the Pozyx. This is the
//! recommended way to access the Pozyx using this crate, unless you need the
//! greater flexibility provided by the [register-level interface].
//!
//! [register-level interface]: ../ll/index.html

use core::fmt;

use embedded_hal::i2c::I2c;

use crate::{
    frame::{Request, Response},
    ll::{self, I2cTransport, Transport},
};

pub use error::*;

// Generates one read method per plain register, returning the register's
// `value` field.
macro_rules! impl_register_reads {
    (
        $(
            #[$doc:meta]
            $name:ident -> $ty:ty;
        )*
    ) => {
        impl<T> Pozyx<T>
        where
            T: Transport,
        {
            $(
                #[$doc]
                pub fn $name(&mut self) -> Result<$ty, Error<T>> {
                    Ok(self.ll.$name().read()?.value())
                }
            )*
        }
    };
}

mod cir;
mod device_list;
mod error;
mod positioning;
mod sensors;
mod status;

/// Entry point to the Pozyx driver API
///
/// Every method performs one or more blocking request/response round trips
/// over the transport. The driver keeps no state of its own: the device list,
/// the positioning mode and the calibration state live on the module.
pub struct Pozyx<T> {
    ll: ll::Pozyx<T>,
}

impl<T> Pozyx<T> {
    /// Create a new instance of `Pozyx`
    ///
    /// Requires a transport that is connected to the module.
    pub fn new(transport: T) -> Self {
        Pozyx {
            ll: ll::Pozyx::new(transport),
        }
    }

    /// Provides direct access to the register-level API
    ///
    /// Be aware that by using the register-level API, you can bypass the
    /// parameter checks of the high-level API. Don't use the register-level
    /// and high-level APIs in tandem, unless you know what you're doing.
    pub fn ll(&mut self) -> &mut ll::Pozyx<T> {
        &mut self.ll
    }

    /// Release the transport
    pub fn free(self) -> T {
        self.ll.free()
    }
}

impl<I2C> Pozyx<I2cTransport<I2C>>
where
    I2C: I2c,
{
    /// Create a driver for a module at the default address on an I2C bus
    pub fn from_i2c(i2c: I2C) -> Self {
        Pozyx::new(I2cTransport::new(i2c))
    }
}

impl<T> Pozyx<T>
where
    T: Transport,
{
    /// Send an arbitrary frame and read `response.len()` bytes back
    ///
    /// This is meant for diagnostics. No success flag is checked.
    pub fn request(&mut self, frame: &[u8], response: &mut [u8]) -> Result<(), Error<T>> {
        if frame.is_empty() {
            return Err(Error::InvalidParameter("frame"));
        }

        self.ll.exchange(frame, response)?;

        Ok(())
    }

    /// Invoke a register function and check the success flag
    ///
    /// On success, returns the response positioned right after the flag.
    pub(crate) fn call<'r>(
        &mut self,
        request: &Request,
        response: &'r mut [u8],
    ) -> Result<Response<'r>, Error<T>> {
        self.ll.exchange(request.as_bytes(), response)?;

        let response: &'r [u8] = response;
        let mut frame = Response::new(response);

        if !frame.accepted()? {
            let flag = response.first().copied().unwrap_or_default();
            log::debug!(
                "function {:#04x} refused with flag {:#04x}",
                request.opcode(),
                flag,
            );
            return Err(Error::Rejected {
                opcode: request.opcode(),
                flag,
            });
        }

        Ok(frame)
    }

    /// Invoke a register function that returns nothing but the success flag
    pub(crate) fn call_flag(&mut self, request: &Request) -> Result<(), Error<T>> {
        let mut response = [0; 1];
        self.call(request, &mut response)?;

        Ok(())
    }
}

// Can't be derived without putting requirements on `T`.
impl<T> fmt::Debug for Pozyx<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pozyx {{ .. }}")
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::{collections::VecDeque, vec::Vec};

    use crate::ll::Transport;

    /// The fault the scripted transport reports
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct BusFault;

    /// A transport that replays a fixed conversation
    ///
    /// Responses are delivered as scripted, even if they are shorter or longer
    /// than what the driver asked for.
    #[derive(Default)]
    pub struct ScriptedTransport {
        script: VecDeque<(Vec<u8>, Result<Vec<u8>, BusFault>)>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn expect(mut self, request: &[u8], response: &[u8]) -> Self {
            self.script
                .push_back((request.to_vec(), Ok(response.to_vec())));
            self
        }

        pub fn fail(mut self, request: &[u8]) -> Self {
            self.script.push_back((request.to_vec(), Err(BusFault)));
            self
        }

        pub fn done(&self) {
            assert!(
                self.script.is_empty(),
                "{} scripted exchanges left",
                self.script.len()
            );
        }
    }

    impl Transport for ScriptedTransport {
        type Error = BusFault;

        fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<usize, BusFault> {
            let (expected, result) = self
                .script
                .pop_front()
                .expect("unexpected exchange");
            assert_eq!(request, &expected[..]);

            let data = result?;
            let len = data.len().min(response.len());
            response[..len].copy_from_slice(&data[..len]);

            Ok(data.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{BusFault, ScriptedTransport};
    use super::*;

    #[test]
    fn raw_request_passes_bytes_through() {
        let mut pozyx = Pozyx::new(ScriptedTransport::new().expect(&[0x18, 0x01, 0xf4], &[7, 9]));

        let mut response = [0; 2];
        pozyx.request(&[0x18, 0x01, 0xf4], &mut response).unwrap();
        assert_eq!(response, [7, 9]);

        pozyx.free().done();
    }

    #[test]
    fn raw_request_rejects_empty_frames() {
        let mut pozyx = Pozyx::new(ScriptedTransport::new());

        let err = pozyx.request(&[], &mut [0; 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        pozyx.free().done();
    }

    #[test]
    fn call_surfaces_refusal() {
        let mut pozyx = Pozyx::new(ScriptedTransport::new().expect(&[0xB6], &[0]));

        let err = pozyx.call_flag(&Request::new(0xB6)).unwrap_err();
        match &err {
            Error::Rejected { opcode, flag } => {
                assert_eq!(*opcode, 0xB6);
                assert_eq!(*flag, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.kind(), ErrorKind::Decode);

        pozyx.free().done();
    }

    #[test]
    fn transport_fault_is_not_a_zero_reading() {
        let mut pozyx = Pozyx::new(ScriptedTransport::new().fail(&[0x30]));

        match pozyx.pos_x() {
            Err(Error::Bus(ll::Error::Transport(BusFault))) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        pozyx.free().done();
    }

    #[test]
    fn transport_fault_during_function_call() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .fail(&[0xC0, 0, 3])
                .fail(&[0xC8, 0x00, 0x00, 1]),
        );

        let err = pozyx.device_ids(0, Some(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        match err {
            Error::Bus(ll::Error::Transport(BusFault)) => {}
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(pozyx.cir(0, 1).unwrap_err().kind(), ErrorKind::Transport);

        pozyx.free().done();
    }

    #[test]
    fn empty_response_is_a_decode_fault() {
        let mut pozyx = Pozyx::new(ScriptedTransport::new().expect(&[0x04], &[]));

        let err = pozyx.error_code().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        match err {
            Error::Bus(ll::Error::ResponseLength { expected, actual }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        pozyx.free().done();
    }

    #[test]
    fn oversized_response_is_a_decode_fault() {
        let mut pozyx = Pozyx::new(ScriptedTransport::new().expect(&[0x04], &[0x01, 0x02]));

        match pozyx.error_code() {
            Err(Error::Bus(ll::Error::ResponseLength {
                expected: 1,
                actual: 2,
            })) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        pozyx.free().done();
    }
}
