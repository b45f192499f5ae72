//! Driver crate for the Pozyx UWB positioning module
//!
//! The Pozyx measures distances to other Pozyx devices over ultra-wideband
//! radio, computes its own position from the ranges to a set of anchors, and
//! carries an IMU as well as a pressure sensor. The host talks to it over I2C:
//! registers are read by sending their address, register functions are
//! invoked by sending an opcode with parameters and reading back a response
//! that starts with a success flag.
//!
//! The entry point to the API is [`Pozyx`]. It works with any [`Transport`],
//! [`I2cTransport`] connects it to an `embedded-hal` I2C bus.
//!
//! ``` rust,ignore
//! use pozyx::{configs::DiscoverConfig, Pozyx};
//!
//! let mut pozyx = Pozyx::from_i2c(i2c);
//!
//! pozyx.discover(&DiscoverConfig::default())?;
//! pozyx.start_positioning()?;
//! let position = pozyx.position()?;
//! ```


#![cfg_attr(not(any(test, feature = "std")), no_std)]

#![deny(missing_docs)]


pub mod configs;
pub mod error_code;
pub mod flags;
pub mod frame;
pub mod hl;
pub mod ll;
pub mod types;


pub use hl::{
    Error,
    ErrorKind,
    Pozyx,
};
pub use ll::{
    I2cTransport,
    Transport,
    DEFAULT_ADDRESS,
};
pub use types::{
    CirCoefficient,
    Device,
    DeviceType,
    EulerAngles,
    FirmwareVersion,
    NetworkId,
    Position,
    PositionError,
    Quaternion,
    RangeInfo,
    Vector3,
};
