//! Values decoded from the Pozyx's responses


use core::fmt;

use fixed::types::{I12F4, I2F14};
use serde::{Deserialize, Serialize};


/// Network address of a Pozyx device
///
/// Transmitted as a little-endian 16-bit value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct NetworkId(pub u16);

impl NetworkId {
    /// The id pair that terminates the anchor list
    pub const TERMINATOR: NetworkId = NetworkId(0);
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<u16> for NetworkId {
    fn from(id: u16) -> Self {
        NetworkId(id)
    }
}


/// A position in millimeters
///
/// The default value is the origin. Since every read either returns a
/// position or an error, the origin always is a real reading.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Position {
    /// x-coordinate in mm
    pub x: i32,
    /// y-coordinate in mm
    pub y: i32,
    /// z-coordinate in mm
    pub z: i32,
}

impl Position {
    /// Create a position from its coordinates
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Position { x, y, z }
    }
}


/// An entry of the module's device list
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Device {
    /// Network address of the device
    pub id: NetworkId,
    /// Special flag describing the device
    pub flag: u8,
    /// Coordinates of the device
    pub position: Position,
}


/// The result of the latest range measurement to a device
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct RangeInfo {
    /// Time of the measurement, in the module's clock
    pub timestamp: i32,
    /// The last measurement reported by the module
    pub last_measurement: i32,
    /// Received signal strength in dBm
    pub signal_strength: i16,
}


/// The kind of devices a discovery looks for
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum DeviceType {
    /// Only anchors
    Anchors = 0,
    /// Only tags
    Tags = 1,
    /// Anchors and tags
    All = 2,
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Anchors
    }
}


/// The firmware version of the module
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct FirmwareVersion {
    /// Major version, the upper 4 bits of the register
    pub major: u8,
    /// Minor version, the lower 5 bits of the register
    pub minor: u8,
}

impl FirmwareVersion {
    /// Decode the firmware version register
    pub fn from_bits(bits: u8) -> Self {
        FirmwareVersion {
            major: bits >> 4,
            minor: bits & 0x1f,
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}


/// A raw three-axis sensor reading
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Vector3 {
    /// x-axis
    pub x: i16,
    /// y-axis
    pub y: i16,
    /// z-axis
    pub z: i16,
}


/// Estimated error covariances of the latest position
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct PositionError {
    /// Covariance of x
    pub x: i16,
    /// Covariance of y
    pub y: i16,
    /// Covariance of z
    pub z: i16,
    /// Covariance of xy
    pub xy: i16,
    /// Covariance of xz
    pub xz: i16,
    /// Covariance of yz
    pub yz: i16,
}


/// Orientation as a unit quaternion
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Quaternion {
    /// Weight
    pub w: I2F14,
    /// x
    pub x: I2F14,
    /// y
    pub y: I2F14,
    /// z
    pub z: I2F14,
}

impl Quaternion {
    /// Build a quaternion from raw register values (1.0 = 2^14)
    pub fn from_raw(w: i16, x: i16, y: i16, z: i16) -> Self {
        Quaternion {
            w: I2F14::from_bits(w),
            x: I2F14::from_bits(x),
            y: I2F14::from_bits(y),
            z: I2F14::from_bits(z),
        }
    }
}


/// Orientation as Euler angles, in degrees
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EulerAngles {
    /// Heading (yaw)
    pub heading: I12F4,
    /// Roll
    pub roll: I12F4,
    /// Pitch
    pub pitch: I12F4,
}

impl EulerAngles {
    /// Build Euler angles from raw register values (1 degree = 16)
    pub fn from_raw(heading: i16, roll: i16, pitch: i16) -> Self {
        EulerAngles {
            heading: I12F4::from_bits(heading),
            roll: I12F4::from_bits(roll),
            pitch: I12F4::from_bits(pitch),
        }
    }
}


/// A complex coefficient of the channel impulse response
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct CirCoefficient {
    /// Real part
    pub real: i16,
    /// Imaginary part
    pub imaginary: i16,
}
