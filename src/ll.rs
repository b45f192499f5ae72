//! Low-level interface to the Pozyx module
//!
//! This module implements a register-level interface to the Pozyx. Users of
//! this library should typically not need to use this. Please consider using
//! the [high-level interface] instead.
//!
//! The Pozyx is addressed through a single byte-oriented channel: every
//! exchange writes a frame that starts with an opcode (a register address or
//! a register function) and reads back a fixed number of bytes. The
//! [`Transport`] trait abstracts that channel, [`I2cTransport`] implements it
//! on top of an `embedded-hal` I2C bus.
//!
//! **NOTE**: Many field access methods accept types that have a larger number
//! of bits than the field actually consists of. If you use such a method to
//! pass a value that is too large to be written to the field, it will be
//! silently truncated.
//!
//! [high-level interface]: ../hl/index.html

use core::{fmt, marker::PhantomData};

use embedded_hal::i2c::I2c;

/// The I2C address the Pozyx answers to out of the box
pub const DEFAULT_ADDRESS: u8 = 0x4B;

/// A request/response channel to the Pozyx
///
/// Implementations send `request` and fill `response` with the module's
/// answer. The number of bytes actually received is returned, so the driver
/// can tell a short read apart from a successful one.
pub trait Transport {
    /// The error reported by the underlying bus
    type Error;

    /// Send a request frame and receive the response into `response`
    fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<usize, Self::Error> {
        T::exchange(self, request, response)
    }
}

/// [`Transport`] implementation for I2C buses
///
/// Uses a write-read transaction when a response is expected, and a plain
/// write otherwise.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cTransport<I2C> {
    /// Create a transport talking to the module at [`DEFAULT_ADDRESS`]
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a transport talking to the module at the given address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        I2cTransport { i2c, address }
    }

    /// The address of the module
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the I2C bus
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Transport for I2cTransport<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<usize, Self::Error> {
        if response.is_empty() {
            self.i2c.write(self.address, request)?;
        } else {
            self.i2c.write_read(self.address, request, response)?;
        }

        Ok(response.len())
    }
}

/// Entry point to the Pozyx driver's low-level API
///
/// Please consider using [hl::Pozyx] instead.
///
/// [hl::Pozyx]: ../hl/struct.Pozyx.html
pub struct Pozyx<T> {
    transport: T,
}

impl<T> Pozyx<T> {
    /// Create a new instance of `Pozyx`
    ///
    /// Requires the transport that is connected to the module.
    pub fn new(transport: T) -> Self {
        Pozyx { transport }
    }

    /// Allows for an access to the transport
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport
    pub fn free(self) -> T {
        self.transport
    }
}

impl<T> Pozyx<T>
where
    T: Transport,
{
    /// Send a frame and read exactly `response.len()` bytes back
    ///
    /// A transport that delivers fewer (or more) bytes than requested results
    /// in [`Error::ResponseLength`].
    pub fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<(), Error<T>> {
        log::trace!(
            "exchange: opcode {:#04x}, {} request bytes, {} response bytes",
            request.first().copied().unwrap_or_default(),
            request.len(),
            response.len(),
        );

        let received = match self.transport.exchange(request, response) {
            Ok(received) => received,
            Err(err) => {
                log::warn!("transport fault on opcode {:#04x}", request.first().copied().unwrap_or_default());
                return Err(Error::Transport(err));
            }
        };

        if received != response.len() {
            log::warn!(
                "expected {} response bytes, received {}",
                response.len(),
                received,
            );
            return Err(Error::ResponseLength {
                expected: response.len(),
                actual: received,
            });
        }

        Ok(())
    }
}

/// Provides access to a register
///
/// You can get an instance for a given register using one of the methods on
/// [`Pozyx`].
pub struct RegAccessor<'s, R, T>(&'s mut Pozyx<T>, PhantomData<R>);

impl<'s, R, T> RegAccessor<'s, R, T>
where
    T: Transport,
{
    /// Read from the register
    pub fn read(&mut self) -> Result<R::Read, Error<T>>
    where
        R: Register + Readable,
    {
        let mut r = R::read();
        let buffer = R::buffer(&mut r);

        self.0.exchange(&[R::OPCODE], buffer)?;

        Ok(r)
    }

    /// Write to the register
    ///
    /// The module answers a register write with a single byte, which is read
    /// and discarded.
    pub fn write<F>(&mut self, f: F) -> Result<(), Error<T>>
    where
        R: Register + Writable,
        F: FnOnce(&mut R::Write) -> &mut R::Write,
    {
        let mut w = R::write();
        f(&mut w);

        let buffer = <R as Writable>::buffer(&mut w);
        buffer[0] = R::OPCODE;

        let mut ack = [0; 1];
        self.0.exchange(buffer, &mut ack)?;

        Ok(())
    }
}

/// An error that can occur when exchanging frames with the Pozyx
pub enum Error<T>
where
    T: Transport,
{
    /// The transport reported a fault
    Transport(T::Error),

    /// The transport delivered a different number of bytes than requested
    ResponseLength {
        /// The number of bytes that were requested
        expected: usize,
        /// The number of bytes that were received
        actual: usize,
    },
}

// We can't derive this implementation, as the compiler will complain that the
// associated error type doesn't implement `Debug`.
impl<T> fmt::Debug for Error<T>
where
    T: Transport,
    T::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(error) => write!(f, "Transport({:?})", error),
            Error::ResponseLength { expected, actual } => write!(
                f,
                "ResponseLength {{ expected: {:?}, actual: {:?} }}",
                expected, actual,
            ),
        }
    }
}

impl<T> fmt::Display for Error<T>
where
    T: Transport,
    T::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(error) => write!(f, "transport fault: {:?}", error),
            Error::ResponseLength { expected, actual } => write!(
                f,
                "expected {} response bytes, received {}",
                expected, actual,
            ),
        }
    }
}

/// Implemented for all registers
///
/// This is a mostly internal trait that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
///
/// The Pozyx register overview specifies what the values of the constants
/// should be for each register.
pub trait Register {
    /// The register address, sent as the first byte of every frame
    const OPCODE: u8;

    /// The length of the register in bytes
    const LEN: usize;
}

/// Marker trait for registers that can be read from
///
/// This is a mostly internal trait that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
pub trait Readable {
    /// The type that is used to read from the register
    type Read;

    /// Return the read type for this register
    fn read() -> Self::Read;

    /// Return the read type's internal buffer
    fn buffer(r: &mut Self::Read) -> &mut [u8];
}

/// Marker trait for registers that can be written to
///
/// This is a mostly internal trait that should not be implemented or used
/// directly by users of this crate. It is exposed through the public API
/// though, so it can't be made private.
pub trait Writable {
    /// The type that is used to write to the register
    type Write;

    /// Return the write type for this register
    fn write() -> Self::Write;

    /// Return the write type's internal buffer, including the opcode byte
    fn buffer(w: &mut Self::Write) -> &mut [u8];
}

/// Generates register implementations
macro_rules! impl_register {
    (
        $(
            $opcode:expr,
            $len:expr,
            $rw:tt,
            $name:ident($name_lower:ident) {
            #[$doc:meta]
            $(
                $field:ident,
                $first_bit:expr,
                $last_bit:expr,
                $ty:ty;
                #[$field_doc:meta]
            )*
            }
        )*
    ) => {
        $(
            #[$doc]
            #[allow(non_camel_case_types)]
            pub struct $name;

            impl Register for $name {
                const OPCODE: u8    = $opcode;
                const LEN:    usize = $len;
            }

            #[$doc]
            pub mod $name_lower {
                use core::fmt;


                /// Used to read from the register
                pub struct R(pub(crate) [u8; $len]);

                impl R {
                    $(
                        #[$field_doc]
                        pub fn $field(&self) -> $ty {
                            use crate::ll::FromBytes;

                            // Registers are at most 4 bytes wide, so the whole
                            // register fits into a `u32`.
                            let raw = <u32 as FromBytes>::from_bytes(&self.0);

                            const SIZE_IN_BITS: usize =
                                $last_bit - $first_bit + 1;
                            const MASK: u32 =
                                ((1u64 << SIZE_IN_BITS) - 1) as u32;

                            ((raw >> $first_bit) & MASK) as $ty
                        }
                    )*
                }

                impl fmt::Debug for R {
                    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                        write!(f, "0x")?;
                        for i in (0 .. $len).rev() {
                            write!(f, "{:02x}", self.0[i])?;
                        }

                        Ok(())
                    }
                }


                /// Used to write to the register
                ///
                /// The first byte is reserved for the opcode.
                pub struct W(pub(crate) [u8; 1 + $len]);

                impl W {
                    $(
                        #[$field_doc]
                        pub fn $field(&mut self, value: $ty) -> &mut Self {
                            use crate::ll::{FromBytes, ToBytes};

                            const SIZE_IN_BITS: usize =
                                $last_bit - $first_bit + 1;
                            const MASK: u32 =
                                ((1u64 << SIZE_IN_BITS) - 1) as u32;

                            let mut raw =
                                <u32 as FromBytes>::from_bytes(&self.0[1..]);
                            raw &= !(MASK << $first_bit);
                            raw |= ((value as u32) & MASK) << $first_bit;

                            let bytes = <u32 as ToBytes>::to_bytes(raw);
                            self.0[1..].copy_from_slice(&bytes[..$len]);

                            self
                        }
                    )*
                }
            }

            impl_rw!($rw, $name, $name_lower, $len);
        )*


        impl<T> Pozyx<T> {
            $(
                #[$doc]
                pub fn $name_lower(&mut self) -> RegAccessor<'_, $name, T> {
                    RegAccessor(self, PhantomData)
                }
            )*
        }
    }
}

// Helper macro, used internally by `impl_register!`
macro_rules! impl_rw {
    (RO, $name:ident, $name_lower:ident, $len:expr) => {
        impl_rw!(@R, $name, $name_lower, $len);
    };
    (RW, $name:ident, $name_lower:ident, $len:expr) => {
        impl_rw!(@R, $name, $name_lower, $len);
        impl_rw!(@W, $name, $name_lower, $len);
    };

    (@R, $name:ident, $name_lower:ident, $len:expr) => {
        impl Readable for $name {
            type Read = $name_lower::R;

            fn read() -> Self::Read {
                $name_lower::R([0; $len])
            }

            fn buffer(r: &mut Self::Read) -> &mut [u8] {
                &mut r.0
            }
        }
    };
    (@W, $name:ident, $name_lower:ident, $len:expr) => {
        impl Writable for $name {
            type Write = $name_lower::W;

            fn write() -> Self::Write {
                $name_lower::W([0; 1 + $len])
            }

            fn buffer(w: &mut Self::Write) -> &mut [u8] {
                &mut w.0
            }
        }
    };
}

// All registers are implemented in this macro invocation. It follows the
// following syntax:
// <opcode>, <size-bytes>, <RO/RW>, <name-upper>(name-lower) { /// <doc>
//     <field 1>
//     <field 2>
//     ...
// }
//
// Each field follows the following syntax:
// <name>, <first-bit-index>, <last-bit-index>, <type>; /// <doc>
impl_register! {
    0x01, 1, RO, FIRMWARE_VER(firmware_ver) { /// Firmware version
        minor, 0, 4, u8; /// Minor version
        major, 4, 7, u8; /// Major version
        value, 0, 7, u8; /// Raw register value
    }
    0x03, 1, RO, ST_RESULT(st_result) { /// Self-test result
        acc,   0, 0, u8; /// Accelerometer healthy
        magn,  1, 1, u8; /// Magnetometer healthy
        gyro,  2, 2, u8; /// Gyroscope healthy
        imu,   3, 3, u8; /// IMU healthy
        press, 4, 4, u8; /// Pressure sensor healthy
        uwb,   5, 5, u8; /// UWB transceiver healthy
        value, 0, 7, u8; /// Raw register value
    }
    0x04, 1, RO, ERRORCODE(errorcode) { /// Error code
        value, 0, 7, u8; /// Error code
    }
    0x05, 1, RO, INT_STATUS(int_status) { /// Interrupt status
        err,     0, 0, u8; /// An error occured
        pos,     1, 1, u8; /// A new position estimate is available
        imu,     2, 2, u8; /// A new IMU measurement is available
        rx_data, 3, 3, u8; /// Data was received over the UWB link
        func,    4, 4, u8; /// A register function call has finished
        value,   0, 7, u8; /// Raw register value
    }
    0x06, 1, RO, CALIB_STATUS(calib_status) { /// Calibration status
        mag,   0, 1, u8; /// Magnetometer calibration
        acc,   2, 3, u8; /// Accelerometer calibration
        gyr,   4, 5, u8; /// Gyroscope calibration
        sys,   6, 7, u8; /// System calibration
        value, 0, 7, u8; /// Raw register value
    }
    0x10, 1, RW, INT_MASK(int_mask) { /// Interrupt mask
        err,     0, 0, u8; /// Interrupt on errors
        pos,     1, 1, u8; /// Interrupt on new position estimates
        imu,     2, 2, u8; /// Interrupt on new IMU measurements
        rx_data, 3, 3, u8; /// Interrupt on received UWB data
        func,    4, 4, u8; /// Interrupt on finished register functions
        pin,     7, 7, u8; /// Interrupt pin selection
        value,   0, 7, u8; /// Raw register value
    }
    0x18, 2, RW, POS_INTERVAL(pos_interval) { /// Positioning update interval
        value, 0, 15, u16; /// Interval in milliseconds
    }
    0x30, 4, RO, POS_X(pos_x) { /// Position, x-coordinate
        value, 0, 31, i32; /// x-coordinate in mm
    }
    0x34, 4, RO, POS_Y(pos_y) { /// Position, y-coordinate
        value, 0, 31, i32; /// y-coordinate in mm
    }
    0x38, 4, RO, POS_Z(pos_z) { /// Position, z-coordinate
        value, 0, 31, i32; /// z-coordinate in mm
    }
    0x3C, 2, RO, POS_ERR_X(pos_err_x) { /// Position error covariance, x
        value, 0, 15, i16; /// Covariance of x
    }
    0x3E, 2, RO, POS_ERR_Y(pos_err_y) { /// Position error covariance, y
        value, 0, 15, i16; /// Covariance of y
    }
    0x40, 2, RO, POS_ERR_Z(pos_err_z) { /// Position error covariance, z
        value, 0, 15, i16; /// Covariance of z
    }
    0x42, 2, RO, POS_ERR_XY(pos_err_xy) { /// Position error covariance, xy
        value, 0, 15, i16; /// Covariance of xy
    }
    0x44, 2, RO, POS_ERR_XZ(pos_err_xz) { /// Position error covariance, xz
        value, 0, 15, i16; /// Covariance of xz
    }
    0x46, 2, RO, POS_ERR_YZ(pos_err_yz) { /// Position error covariance, yz
        value, 0, 15, i16; /// Covariance of yz
    }
    0x4E, 2, RO, MAX_LIN_ACC(max_lin_acc) { /// Maximum linear acceleration
        value, 0, 15, u16; /// Norm in mg, reset after reading
    }
    0x50, 4, RO, PRESSURE(pressure) { /// Pressure
        value, 0, 31, u32; /// Pressure in mPa
    }
    0x54, 2, RO, ACCEL_X(accel_x) { /// Acceleration, x-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x56, 2, RO, ACCEL_Y(accel_y) { /// Acceleration, y-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x58, 2, RO, ACCEL_Z(accel_z) { /// Acceleration, z-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x5A, 2, RO, MAGN_X(magn_x) { /// Magnetic field strength, x-axis
        value, 0, 15, i16; /// 1 µT = 16
    }
    0x5C, 2, RO, MAGN_Y(magn_y) { /// Magnetic field strength, y-axis
        value, 0, 15, i16; /// 1 µT = 16
    }
    0x5E, 2, RO, MAGN_Z(magn_z) { /// Magnetic field strength, z-axis
        value, 0, 15, i16; /// 1 µT = 16
    }
    0x60, 2, RO, GYRO_X(gyro_x) { /// Angular velocity, x-axis
        value, 0, 15, i16; /// 1 degree/s = 16
    }
    0x62, 2, RO, GYRO_Y(gyro_y) { /// Angular velocity, y-axis
        value, 0, 15, i16; /// 1 degree/s = 16
    }
    0x64, 2, RO, GYRO_Z(gyro_z) { /// Angular velocity, z-axis
        value, 0, 15, i16; /// 1 degree/s = 16
    }
    0x66, 2, RO, EUL_HEADING(eul_heading) { /// Euler angles, heading (yaw)
        value, 0, 15, i16; /// 1 degree = 16
    }
    0x68, 2, RO, EUL_ROLL(eul_roll) { /// Euler angles, roll
        value, 0, 15, i16; /// 1 degree = 16
    }
    0x6A, 2, RO, EUL_PITCH(eul_pitch) { /// Euler angles, pitch
        value, 0, 15, i16; /// 1 degree = 16
    }
    0x6C, 2, RO, QUAT_W(quat_w) { /// Quaternion, weight
        value, 0, 15, i16; /// 1.0 = 2^14
    }
    0x6E, 2, RO, QUAT_X(quat_x) { /// Quaternion, x
        value, 0, 15, i16; /// 1.0 = 2^14
    }
    0x70, 2, RO, QUAT_Y(quat_y) { /// Quaternion, y
        value, 0, 15, i16; /// 1.0 = 2^14
    }
    0x72, 2, RO, QUAT_Z(quat_z) { /// Quaternion, z
        value, 0, 15, i16; /// 1.0 = 2^14
    }
    0x74, 2, RO, LIA_X(lia_x) { /// Linear acceleration, x-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x76, 2, RO, LIA_Y(lia_y) { /// Linear acceleration, y-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x78, 2, RO, LIA_Z(lia_z) { /// Linear acceleration, z-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x7A, 2, RO, GRAV_X(grav_x) { /// Gravity vector, x-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x7C, 2, RO, GRAV_Y(grav_y) { /// Gravity vector, y-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x7E, 2, RO, GRAV_Z(grav_z) { /// Gravity vector, z-axis
        value, 0, 15, i16; /// 1 mg = 16
    }
    0x80, 1, RO, TEMPERATURE(temperature) { /// Chip temperature
        value, 0, 7, i8; /// Degrees Celsius
    }
    0x81, 1, RO, DEVICE_LIST_SIZE(device_list_size) { /// Device list size
        value, 0, 7, u8; /// Number of devices in the list
    }
    0x82, 2, RO, RX_NETWORK_ID(rx_network_id) { /// Sender of the latest message
        value, 0, 15, u16; /// Network id
    }
    0x84, 1, RO, RX_DATA_LEN(rx_data_len) { /// Length of the latest message
        value, 0, 7, u8; /// Length in bytes
    }
    0x85, 1, RO, GPIO1(gpio1) { /// GPIO pin 1
        value, 0, 7, u8; /// Digital state
    }
    0x86, 1, RO, GPIO2(gpio2) { /// GPIO pin 2
        value, 0, 7, u8; /// Digital state
    }
    0x87, 1, RO, GPIO3(gpio3) { /// GPIO pin 3
        value, 0, 7, u8; /// Digital state
    }
    0x88, 1, RO, GPIO4(gpio4) { /// GPIO pin 4
        value, 0, 7, u8; /// Digital state
    }
}

/// Internal trait used by `impl_registers!`
trait FromBytes {
    fn from_bytes(bytes: &[u8]) -> Self;
}

/// Internal trait used by `impl_registers!`
trait ToBytes {
    type Bytes;

    fn to_bytes(self) -> Self::Bytes;
}

/// Internal macro used to implement `FromBytes`/`ToBytes`
macro_rules! impl_bytes {
    ($($ty:ty,)*) => {
        $(
            impl FromBytes for $ty {
                fn from_bytes(bytes: &[u8]) -> Self {
                    let mut val = 0;

                    for (i, &b) in bytes.iter().enumerate() {
                        val |= (b as $ty) << (i * 8);
                    }

                    val
                }
            }

            impl ToBytes for $ty {
                type Bytes = [u8; ::core::mem::size_of::<$ty>()];

                fn to_bytes(self) -> Self::Bytes {
                    let mut bytes = [0; ::core::mem::size_of::<$ty>()];

                    for (i, b) in bytes.iter_mut().enumerate() {
                        let shift = 8 * i;
                        let mask  = 0xff << shift;

                        *b = ((self & mask) >> shift) as u8;
                    }

                    bytes
                }
            }
        )*
    }
}

impl_bytes! {
    u16,
    u32,
}
